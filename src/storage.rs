use crate::error::DlaError;
use crate::grid::Grid;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk form of a grid: occupancy only, one `0`/`1` string per row.
/// The cluster extent is rebuilt from the cells on load.
#[derive(Debug, Serialize, Deserialize)]
struct GridSnapshot {
    size: usize,
    rows: Vec<String>,
}

impl GridSnapshot {
    fn from_grid(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            rows: grid
                .rows()
                .map(|row| row.iter().map(|&c| if c { '1' } else { '0' }).collect())
                .collect(),
        }
    }

    fn into_grid(self) -> Result<Grid, DlaError> {
        if self.rows.len() != self.size {
            return Err(DlaError::InvalidSnapshot(format!(
                "expected {} rows, found {}",
                self.size,
                self.rows.len()
            )));
        }

        let mut cells = Vec::with_capacity(self.size * self.size);
        for (y, row) in self.rows.iter().enumerate() {
            if row.len() != self.size {
                return Err(DlaError::InvalidSnapshot(format!(
                    "row {y} has {} cells, expected {}",
                    row.len(),
                    self.size
                )));
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    '0' => cells.push(false),
                    '1' => cells.push(true),
                    other => {
                        return Err(DlaError::InvalidSnapshot(format!(
                            "unexpected {other:?} at ({x}, {y})"
                        )))
                    }
                }
            }
        }
        Grid::from_cells(self.size, cells)
    }
}

/// Write the occupancy grid to `path` as JSON
pub fn save_grid(grid: &Grid, path: &Path) -> Result<(), DlaError> {
    let json = serde_json::to_string_pretty(&GridSnapshot::from_grid(grid))?;
    fs::write(path, json)?;
    info!("Saved {}x{} grid to {}", grid.size(), grid.size(), path.display());
    Ok(())
}

/// Read a grid written by [`save_grid`], recomputing bounds, center and radius
pub fn load_grid(path: &Path) -> Result<Grid, DlaError> {
    let content = fs::read_to_string(path)?;
    let snapshot: GridSnapshot = serde_json::from_str(&content)?;
    let grid = snapshot.into_grid()?;
    info!(
        "Loaded {}x{} grid with {} occupied cells from {}",
        grid.size(),
        grid.size(),
        grid.occupied_count(),
        path.display()
    );
    Ok(grid)
}
