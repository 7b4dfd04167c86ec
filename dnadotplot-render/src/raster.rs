//! CPU raster output

use std::io::Cursor;

use dnadotplot_core::Orientation;
use image::{ImageFormat, ImageResult, Rgb, RgbImage};

use crate::{DotGrid, ExportConfig};

/// Paint the grid onto a background-filled image, one pixel per canvas cell.
///
/// Forward cells are painted first so reverse-complement dots stay visible
/// where both orientations occupy a cell.
pub fn rasterize(grid: &DotGrid, config: &ExportConfig) -> RgbImage {
    let mut img = RgbImage::from_pixel(grid.width(), grid.height(), config.background.into());

    for orientation in [Orientation::Forward, Orientation::ReverseComplement] {
        let color: Rgb<u8> = config.color_for(orientation).into();
        for (x, y) in grid.cells(orientation) {
            paint_dot(&mut img, x, y, config.dot_radius, color);
        }
    }
    img
}

/// Square dot of half-width `radius`, clipped to the image
fn paint_dot(img: &mut RgbImage, x: u32, y: u32, radius: u32, color: Rgb<u8>) {
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = x.saturating_add(radius).min(img.width() - 1);
    let y1 = y.saturating_add(radius).min(img.height() - 1);

    for py in y0..=y1 {
        for px in x0..=x1 {
            img.put_pixel(px, py, color);
        }
    }
}

pub fn encode_png(img: &RgbImage) -> ImageResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use dnadotplot_core::{CanvasGeometry, Match};

    fn grid(matches: Vec<Match>) -> DotGrid {
        let mut grid = DotGrid::new(CanvasGeometry::new(8, 6, 1.0).unwrap());
        grid.extend(matches);
        grid
    }

    #[test]
    fn test_background_fill() {
        let img = rasterize(&grid(vec![]), &ExportConfig::default());
        assert_eq!(img.dimensions(), (8, 6));
        assert!(img.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_reverse_complement_painted_on_top() {
        let img = rasterize(
            &grid(vec![
                Match::forward(2, 3),
                Match::reverse_complement(2, 3),
                Match::forward(5, 1),
            ]),
            &ExportConfig::default(),
        );
        assert_eq!(*img.get_pixel(2, 3), Rgb([128, 128, 128]));
        assert_eq!(*img.get_pixel(5, 1), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_dot_radius_is_clipped() {
        let config = ExportConfig {
            dot_radius: 1,
            forward_color: Color::new(200, 0, 0),
            ..Default::default()
        };
        let img = rasterize(&grid(vec![Match::forward(0, 0)]), &config);
        let painted = img.pixels().filter(|p| **p == Rgb([200, 0, 0])).count();
        assert_eq!(painted, 4);
    }

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&rasterize(&grid(vec![]), &ExportConfig::default())).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
