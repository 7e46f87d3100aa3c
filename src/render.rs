//! Textual and raster rendering of a bit matrix.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};

use crate::error::Error;
use crate::matrix::BitMatrix;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Raster scaling and quiet zone configuration.
///
/// Scales are pixels per module and must be positive; `y_scale` defaults
/// higher because PDF417 rows are visually taller than wide by symbology
/// convention. `margin` is the uniform quiet zone in pixels on all four
/// sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub x_scale: u32,
    pub y_scale: u32,
    pub margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { x_scale: 1, y_scale: 3, margin: 10 }
    }
}

/// One `'1'`/`'0'` string per matrix row, in row order.
pub fn text_grid(matrix: &BitMatrix) -> Vec<String> {
    matrix
        .rows()
        .map(|row| row.iter().map(|&on| if on { '1' } else { '0' }).collect())
        .collect()
}

/// [`text_grid`] with spaces in place of zeros, for human viewing.
pub fn text_grid_display(matrix: &BitMatrix) -> Vec<String> {
    matrix
        .rows()
        .map(|row| row.iter().map(|&on| if on { '1' } else { ' ' }).collect())
        .collect()
}

/// Renders the matrix to a grayscale canvas: white background, one
/// `x_scale x y_scale` black block per set module, offset by the margin.
/// Binary color only, no anti-aliasing.
pub fn raster(matrix: &BitMatrix, config: &RenderConfig) -> GrayImage {
    let width = matrix.width() as u32 * config.x_scale + 2 * config.margin;
    let height = matrix.height() as u32 * config.y_scale + 2 * config.margin;
    let mut canvas = GrayImage::from_pixel(width, height, WHITE);

    for (r, row) in matrix.rows().enumerate() {
        for (c, &on) in row.iter().enumerate() {
            if !on {
                continue;
            }
            let x0 = config.margin + c as u32 * config.x_scale;
            let y0 = config.margin + r as u32 * config.y_scale;
            for y in y0..y0 + config.y_scale {
                for x in x0..x0 + config.x_scale {
                    canvas.put_pixel(x, y, BLACK);
                }
            }
        }
    }

    canvas
}

/// Renders the matrix and serializes the canvas to PNG bytes.
pub fn png_bytes(matrix: &BitMatrix, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    let canvas = raster(matrix, config);
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::BitMatrix;

    fn checkered(width: usize, height: usize) -> BitMatrix {
        let bits = (0..width * height).map(|i| (i / width + i % width) % 2 == 0).collect();
        BitMatrix::from_bits(width, bits)
    }

    #[test]
    fn test_text_grid_shape() {
        let matrix = checkered(6, 4);
        let grid = text_grid(&matrix);
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 6));
        assert_eq!(grid[0], "101010");
        assert_eq!(grid[1], "010101");
    }

    #[test]
    fn test_text_grid_display_uses_spaces() {
        let matrix = checkered(4, 1);
        assert_eq!(text_grid_display(&matrix), ["1 1 "]);
    }

    #[test]
    fn test_text_grid_round_trips_the_matrix() {
        let matrix = checkered(7, 3);
        let bits: Vec<bool> = text_grid(&matrix)
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '1'))
            .collect();
        assert_eq!(BitMatrix::from_bits(7, bits), matrix);
    }

    #[test]
    fn test_raster_canvas_dimensions() {
        let config = RenderConfig { x_scale: 2, y_scale: 3, margin: 10 };
        let canvas = raster(&checkered(6, 4), &config);
        assert_eq!(canvas.dimensions(), (6 * 2 + 20, 4 * 3 + 20));
    }

    #[test]
    fn test_raster_blocks_are_uniform() {
        let matrix = checkered(6, 4);
        let config = RenderConfig { x_scale: 2, y_scale: 3, margin: 10 };
        let canvas = raster(&matrix, &config);

        for r in 0..4u32 {
            for c in 0..6u32 {
                let expected = if matrix.get(r as usize, c as usize) { 0 } else { 255 };
                for y in 0..3 {
                    for x in 0..2 {
                        let pixel = canvas.get_pixel(10 + c * 2 + x, 10 + r * 3 + y);
                        assert_eq!(pixel.0[0], expected, "module ({r},{c}) pixel ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_raster_margin_stays_clear() {
        let config = RenderConfig { x_scale: 1, y_scale: 1, margin: 2 };
        let canvas = raster(&checkered(3, 3), &config);
        let (width, height) = canvas.dimensions();
        for x in 0..width {
            for y in [0, 1, height - 2, height - 1] {
                assert_eq!(canvas.get_pixel(x, y).0[0], 255);
            }
        }
    }

    #[test]
    fn test_png_bytes_decode_back() {
        let config = RenderConfig::default();
        let matrix = checkered(6, 4);
        let bytes = png_bytes(&matrix, &config).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_luma8().dimensions(), (6 + 20, 4 * 3 + 20));
    }
}
