use crate::error::DlaError;

/// Lattice coordinate `(x, y)`
pub type Point = (usize, usize);

/// Moore neighbourhood offsets (orthogonal + diagonal)
static MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Tightest axis-aligned box around the cluster plus the circle that covers it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterExtent {
    pub x_bounds: (usize, usize),
    pub y_bounds: (usize, usize),
    pub center: Point,
    pub radius: usize,
}

impl ClusterExtent {
    /// Extent collapsed onto a single cell, radius 0
    pub fn point((x, y): Point) -> Self {
        Self {
            x_bounds: (x, x),
            y_bounds: (y, y),
            center: (x, y),
            radius: 0,
        }
    }

    /// Grow the bounding box to include `(x, y)` and refresh center/radius
    pub fn include(&mut self, (x, y): Point) {
        let (xmin, xmax) = self.x_bounds;
        let (ymin, ymax) = self.y_bounds;
        self.x_bounds = (xmin.min(x), xmax.max(x));
        self.y_bounds = (ymin.min(y), ymax.max(y));
        self.recompute();
    }

    fn recompute(&mut self) {
        let (xmin, xmax) = self.x_bounds;
        let (ymin, ymax) = self.y_bounds;
        let cx = (xmax + xmin) / 2;
        let cy = (ymax + ymin) / 2;
        self.center = (cx, cy);
        // Truncation puts the center on the low side, so the (xmax, ymax) corner is the farthest.
        self.radius = covering_radius(xmax - cx, ymax - cy);
    }
}

/// Smallest integer strictly greater than `sqrt(dx^2 + dy^2)`
pub fn covering_radius(dx: usize, dy: usize) -> usize {
    isqrt(dx * dx + dy * dy) + 1
}

fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Square occupancy grid, stored row-major, plus the cluster extent it implies
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
    extent: ClusterExtent,
    occupied: usize,
}

impl Grid {
    /// Empty grid with only the center cell occupied
    pub fn new(size: usize) -> Result<Self, DlaError> {
        if size == 0 {
            return Err(DlaError::InvalidConfig("grid size must be positive".into()));
        }
        let center = (size / 2, size / 2);
        let mut cells = vec![false; size * size];
        cells[center.1 * size + center.0] = true;
        Ok(Self {
            size,
            cells,
            extent: ClusterExtent::point(center),
            occupied: 1,
        })
    }

    /// Rebuild a grid from raw occupancy, recomputing the extent from the occupied cells
    pub fn from_cells(size: usize, cells: Vec<bool>) -> Result<Self, DlaError> {
        if size == 0 {
            return Err(DlaError::InvalidSnapshot("grid size must be positive".into()));
        }
        if cells.len() != size * size {
            return Err(DlaError::InvalidSnapshot(format!(
                "expected {} cells for a {size}x{size} grid, found {}",
                size * size,
                cells.len()
            )));
        }

        let mut extent: Option<ClusterExtent> = None;
        let mut occupied = 0;
        for (idx, &cell) in cells.iter().enumerate() {
            if !cell {
                continue;
            }
            let p = (idx % size, idx / size);
            match extent.as_mut() {
                Some(e) => e.include(p),
                None => extent = Some(ClusterExtent::point(p)),
            }
            occupied += 1;
        }

        // A lone occupied cell keeps the radius-0 extent a fresh grid starts with.
        let extent =
            extent.ok_or_else(|| DlaError::InvalidSnapshot("grid has no occupied cells".into()))?;

        Ok(Self {
            size,
            cells,
            extent,
            occupied,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn extent(&self) -> &ClusterExtent {
        &self.extent
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Whether signed coordinates fall inside the grid
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    pub fn occupied(&self, x: usize, y: usize) -> Result<bool, DlaError> {
        if x >= self.size || y >= self.size {
            return Err(DlaError::CoordinateOutOfRange {
                x: x as i64,
                y: y as i64,
                size: self.size,
            });
        }
        Ok(self.cells[y * self.size + x])
    }

    /// Moore neighbours of `(x, y)` that lie inside the grid
    pub fn moore_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = Point> + '_ {
        MOORE_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.contains(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// `(in-grid neighbours, occupied neighbours)` of `(x, y)`
    pub fn neighbor_counts(&self, x: usize, y: usize) -> (usize, usize) {
        self.moore_neighbors(x, y)
            .fold((0, 0), |(total, occupied), (nx, ny)| {
                (total + 1, occupied + self.cells[ny * self.size + nx] as usize)
            })
    }

    /// Occupied cells in row-major order
    pub fn occupied_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell)
            .map(|(idx, _)| (idx % self.size, idx / self.size))
    }

    /// Mark `(x, y)` occupied and grow the extent. Returns false if it already was.
    pub fn deposit(&mut self, (x, y): Point) -> Result<bool, DlaError> {
        if self.occupied(x, y)? {
            return Ok(false);
        }
        self.cells[y * self.size + x] = true;
        self.occupied += 1;
        self.extent.include((x, y));
        Ok(true)
    }

    /// Rows of the grid, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_has_single_center_cell() {
        for size in [1, 2, 7, 20, 21] {
            let grid = Grid::new(size).unwrap();
            let c = size / 2;
            assert_eq!(grid.occupied_count(), 1);
            assert!(grid.occupied(c, c).unwrap());
            let ext = grid.extent();
            assert_eq!(ext.radius, 0);
            assert_eq!(ext.x_bounds, (c, c));
            assert_eq!(ext.y_bounds, (c, c));
            assert_eq!(ext.center, (c, c));
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Grid::new(0), Err(DlaError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_range_query() {
        let grid = Grid::new(10).unwrap();
        assert!(matches!(
            grid.occupied(10, 3),
            Err(DlaError::CoordinateOutOfRange { x: 10, y: 3, size: 10 })
        ));
        assert!(grid.occupied(3, 10).is_err());
        assert!(!grid.occupied(9, 9).unwrap());
    }

    #[test]
    fn test_moore_neighbors_clipped() {
        let grid = Grid::new(5).unwrap();
        assert_eq!(grid.moore_neighbors(2, 2).count(), 8);
        assert_eq!(grid.moore_neighbors(0, 0).count(), 3);
        assert_eq!(grid.moore_neighbors(4, 2).count(), 5);
        assert!(grid.moore_neighbors(0, 4).all(|(x, y)| x < 5 && y < 5));
    }

    #[test]
    fn test_deposit_updates_extent() {
        let mut grid = Grid::new(21).unwrap();
        assert!(grid.deposit((11, 10)).unwrap());
        let ext = *grid.extent();
        assert_eq!(ext.x_bounds, (10, 11));
        assert_eq!(ext.y_bounds, (10, 10));
        assert_eq!(ext.center, (10, 10));
        assert_eq!(ext.radius, 2);

        // Depositing on an occupied cell changes nothing
        assert!(!grid.deposit((11, 10)).unwrap());
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(*grid.extent(), ext);
    }

    #[test]
    fn test_radius_is_minimal_cover() {
        let mut grid = Grid::new(41).unwrap();
        let mut last_radius = 0;
        for p in [(21, 20), (22, 22), (17, 19), (20, 26), (13, 13), (30, 21)] {
            grid.deposit(p).unwrap();
            let ext = grid.extent();
            let (cx, cy) = (ext.center.0 as i64, ext.center.1 as i64);
            let r = ext.radius as i64;
            let mut farthest = 0;
            for x in [ext.x_bounds.0, ext.x_bounds.1] {
                for y in [ext.y_bounds.0, ext.y_bounds.1] {
                    let d2 = (x as i64 - cx).pow(2) + (y as i64 - cy).pow(2);
                    assert!(d2 < r * r, "corner ({x}, {y}) not covered by radius {r}");
                    farthest = farthest.max(d2);
                }
            }
            assert!((r - 1) * (r - 1) <= farthest);
            assert!(ext.radius >= last_radius);
            last_radius = ext.radius;
        }
    }

    #[test]
    fn test_from_cells_recomputes_extent() {
        let mut grid = Grid::new(15).unwrap();
        for p in [(8, 7), (9, 8), (6, 6)] {
            grid.deposit(p).unwrap();
        }
        let cells: Vec<bool> = grid.rows().flatten().copied().collect();
        let restored = Grid::from_cells(15, cells).unwrap();
        assert_eq!(restored.extent(), grid.extent());
        assert_eq!(restored.occupied_count(), 4);
    }

    #[test]
    fn test_from_cells_single_cell_keeps_zero_radius() {
        let grid = Grid::new(9).unwrap();
        let cells: Vec<bool> = grid.rows().flatten().copied().collect();
        let restored = Grid::from_cells(9, cells).unwrap();
        assert_eq!(restored.extent().radius, 0);
    }

    #[test]
    fn test_from_cells_rejects_bad_input() {
        assert!(matches!(
            Grid::from_cells(3, vec![false; 9]),
            Err(DlaError::InvalidSnapshot(_))
        ));
        assert!(Grid::from_cells(3, vec![true; 8]).is_err());
    }

    #[test]
    fn test_covering_radius() {
        assert_eq!(covering_radius(0, 0), 1);
        assert_eq!(covering_radius(1, 0), 2);
        assert_eq!(covering_radius(3, 4), 6);
        assert_eq!(covering_radius(1, 1), 2);
    }
}
