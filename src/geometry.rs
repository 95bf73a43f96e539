use crate::error::DlaError;
use crate::grid::{Grid, Point};
use log::warn;
use std::collections::BTreeSet;

/// Lattice points `p` with `radius < |p - center| <= radius + 1`, clipped to a `size` grid.
///
/// Columns are swept from `center.x - radius - margin` toward the center and from
/// `center.x + radius + margin` back toward it. Within a column the y cursor walks
/// out from the center row past the inner circle, then collects points up to the
/// outer circle. The ordered set keeps sampling reproducible under a seeded RNG.
pub fn bounding_circle(center: Point, radius: usize, size: usize, margin: usize) -> BTreeSet<Point> {
    let circle = Circle {
        cx: center.0 as i64,
        cy: center.1 as i64,
        inner_sq: (radius as i64).pow(2),
        outer_sq: (radius as i64 + 1).pow(2),
        size: size as i64,
    };
    let reach = (radius + margin) as i64;

    let mut points = BTreeSet::new();
    circle.sweep(circle.cx - reach..=circle.cx, &mut points);
    circle.sweep((circle.cx + 1..=circle.cx + reach).rev(), &mut points);
    points
}

struct Circle {
    cx: i64,
    cy: i64,
    inner_sq: i64,
    outer_sq: i64,
    size: i64,
}

impl Circle {
    fn sweep(&self, columns: impl Iterator<Item = i64>, points: &mut BTreeSet<Point>) {
        // Columns approach the center, so the circle only widens and both cursors
        // can carry over from the previous column.
        let mut up = self.cy;
        let mut down = self.cy;

        for x in columns {
            let dx_sq = (x - self.cx).pow(2);
            let dist_sq = |y: i64| (y - self.cy).pow(2) + dx_sq;

            while dist_sq(up) <= self.inner_sq {
                up -= 1;
            }
            let mut y = up;
            while dist_sq(y) <= self.outer_sq {
                self.insert(x, y, points);
                y -= 1;
            }

            while dist_sq(down) <= self.inner_sq {
                down += 1;
            }
            let mut y = down;
            while dist_sq(y) <= self.outer_sq {
                self.insert(x, y, points);
                y += 1;
            }
        }
    }

    fn insert(&self, x: i64, y: i64, points: &mut BTreeSet<Point>) {
        if x >= 0 && y >= 0 && x < self.size && y < self.size {
            points.insert((x as usize, y as usize));
        }
    }
}

/// Launch points for the next particle around the grid's current cluster extent.
///
/// Fails with `AnnulusOutOfBounds` when the grid cannot hold the annulus search
/// window or when no unoccupied annulus point lies inside the grid.
pub fn launch_boundary(grid: &Grid, margin: usize) -> Result<Vec<Point>, DlaError> {
    let extent = grid.extent();
    let out_of_bounds = || DlaError::AnnulusOutOfBounds {
        center: extent.center,
        radius: extent.radius,
        size: grid.size(),
    };

    // A point seed needs `margin` columns on each side of it.
    if grid.size() < 2 * margin + 1 {
        return Err(out_of_bounds());
    }

    let circle = bounding_circle(extent.center, extent.radius, grid.size(), margin);
    let mut launch = Vec::with_capacity(circle.len());
    let mut stale = 0;
    for (x, y) in circle {
        if grid.occupied(x, y)? {
            stale += 1;
        } else {
            launch.push((x, y));
        }
    }
    if stale > 0 {
        warn!(
            "{} launch point(s) already occupied; radius {} around {:?} trails the cluster",
            stale, extent.radius, extent.center
        );
    }

    if launch.is_empty() {
        return Err(out_of_bounds());
    }
    Ok(launch)
}
