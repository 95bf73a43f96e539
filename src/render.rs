use crate::error::DlaError;
use crate::grid::Grid;
use image::{GrayImage, Luma};
use log::info;
use std::path::Path;

const OCCUPIED: Luma<u8> = Luma([0]);
const EMPTY: Luma<u8> = Luma([255]);

/// Grayscale image of the grid, occupied cells dark, each cell `scale` pixels wide
pub fn to_image(grid: &Grid, scale: u32) -> GrayImage {
    let scale = scale.max(1);
    let side = grid.size() as u32 * scale;
    let mut img = GrayImage::from_pixel(side, side, EMPTY);

    for (x, y) in grid.occupied_cells() {
        let (px, py) = (x as u32 * scale, y as u32 * scale);
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(px + dx, py + dy, OCCUPIED);
            }
        }
    }
    img
}

/// Render the grid to a PNG (or any format `image` infers from the extension)
pub fn save_png(grid: &Grid, path: &Path, scale: u32) -> Result<(), DlaError> {
    let img = to_image(grid, scale);
    img.save(path)?;
    info!("Rendered {}x{} image to {}", img.width(), img.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_occupied_cells_are_dark() {
        let mut grid = Grid::new(4).unwrap();
        grid.deposit((3, 0)).unwrap();
        let img = to_image(&grid, 1);

        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(2, 2), &OCCUPIED);
        assert_eq!(img.get_pixel(3, 0), &OCCUPIED);
        assert_eq!(img.get_pixel(0, 3), &EMPTY);
        assert_eq!(img.pixels().filter(|&&p| p == OCCUPIED).count(), 2);
    }

    #[test]
    fn test_scaled_blocks() {
        let grid = Grid::new(3).unwrap();
        let img = to_image(&grid, 4);
        assert_eq!(img.dimensions(), (12, 12));
        assert_eq!(img.pixels().filter(|&&p| p == OCCUPIED).count(), 16);
        assert_eq!(img.get_pixel(4, 4), &OCCUPIED);
        assert_eq!(img.get_pixel(7, 7), &OCCUPIED);
        assert_eq!(img.get_pixel(8, 8), &EMPTY);
    }

    #[test]
    fn test_save_png() {
        let grid = Grid::new(10).unwrap();
        let file = Builder::new().suffix(".png").tempfile().unwrap();
        save_png(&grid, file.path(), 2).unwrap();

        let loaded = image::open(file.path()).unwrap().into_luma8();
        assert_eq!(loaded.dimensions(), (20, 20));
        assert_eq!(loaded.get_pixel(10, 10), &OCCUPIED);
    }
}
