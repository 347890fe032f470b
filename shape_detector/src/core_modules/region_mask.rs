// THEORY:
// A `region_mask` isolates exactly one region's pixels so that color statistics
// can be gathered for that region alone. The mask is a full-frame binary image:
// zero everywhere except the filled contour.
//
// The fill is a scanline polygon fill over the contour's vertices, followed by
// the outline itself so pixels lying exactly on an edge are always included.
// Contours with fewer than three vertices (single pixels, one-pixel-wide
// strokes) have no interior and are drawn as their outline only. For a solid
// rectangular region this reproduces the region's pixels exactly.

use crate::core_modules::contour::Contour;
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

/// Value written for pixels inside the region.
pub const MASK_ON: u8 = 255;

/// Builds a `width` x `height` mask with the given contour filled in.
pub fn fill_contour_mask(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }

    let vertices = contour.vertices();
    if vertices.len() >= 3 {
        let polygon: Vec<Point<i32>> = vertices.iter().map(|&(x, y)| Point::new(x, y)).collect();
        draw_polygon_mut(&mut mask, &polygon, Luma([MASK_ON]));
    }

    for (start, end) in contour.edges() {
        draw_line_segment_mut(
            &mut mask,
            (start.0 as f32, start.1 as f32),
            (end.0 as f32, end.1 as f32),
            Luma([MASK_ON]),
        );
    }

    mask
}
