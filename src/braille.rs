use crate::grid::Grid;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

// Gradient from the cluster core out to the launch circle
const CORE_COLOR: (u8, u8, u8) = (80, 200, 255);
const RIM_COLOR: (u8, u8, u8) = (255, 90, 200);

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Render the grid to Braille characters, colored by distance from the cluster center.
/// The whole grid is fit into the canvas with one scale factor on both axes.
pub fn render_to_braille(grid: &Grid, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    let size = grid.size();

    // Braille effective resolution
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;
    if braille_width == 0 || braille_height == 0 {
        return Vec::new();
    }

    let scale = (size as f32 / braille_width as f32).max(size as f32 / braille_height as f32);

    let extent = grid.extent();
    let (center_x, center_y) = (extent.center.0 as f32, extent.center.1 as f32);
    let inv_radius = 1.0 / extent.radius.max(1) as f32;

    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut total_dist: f32 = 0.0;
            let mut dot_count: usize = 0;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let sim_x = ((base_bx + dx) as f32 * scale) as usize;
                    let sim_y = ((base_by + dy) as f32 * scale) as usize;

                    // Dots past the grid edge read as out of range and stay blank.
                    if let Ok(true) = grid.occupied(sim_x, sim_y) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        dot_count += 1;
                        let (ddx, ddy) = (sim_x as f32 - center_x, sim_y as f32 - center_y);
                        total_dist += (ddx * ddx + ddy * ddy).sqrt();
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let t = total_dist / dot_count as f32 * inv_radius;
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: gradient(t),
                });
            }
        }
    }

    cells
}

fn gradient(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::Rgb(
        lerp(CORE_COLOR.0, RIM_COLOR.0),
        lerp(CORE_COLOR.1, RIM_COLOR.1),
        lerp(CORE_COLOR.2, RIM_COLOR.2),
    )
}
