// THEORY:
// A `Shape` is the per-frame summary of one changed region: where it is (its
// bounding rectangle) and what it looks like (its color histogram). It is a
// "dumb" value object with no identity across frames; recognizing the same
// object in a later frame is left to whoever holds the shapes, using
// `is_close_in_color` as the comparison primitive.

use crate::core_modules::color_histogram::ColorHistogram;
use crate::core_modules::contour::Rect;

/// One detected region of change.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Color distribution of the pixels inside the region.
    pub histogram: ColorHistogram,
    /// Minimal rectangle enclosing the region's contour, in frame coordinates.
    pub bounds: Rect,
}

impl Shape {
    pub fn new(histogram: ColorHistogram, bounds: Rect) -> Self {
        Self { histogram, bounds }
    }

    /// True when the histogram correlation with `other` is at least
    /// `required_closeness` (1.0 demands an identical distribution).
    /// Shapes binned at different resolutions are never close.
    pub fn is_close_in_color(&self, other: &Shape, required_closeness: f64) -> bool {
        self.histogram
            .correlation(&other.histogram)
            .is_some_and(|closeness| closeness >= required_closeness)
    }
}
