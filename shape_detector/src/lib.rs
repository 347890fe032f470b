// THEORY:
// This file is the entry point for the `shape_detector` library crate. It
// exposes the detection pass (`detect_shapes`, `ShapeDetector`) and the `Shape`
// value it produces as the public API. The `core_modules` hold the individual
// stages (frame delta, contours, masks, histograms) and stay public so callers
// can reuse a single stage on its own.

pub mod core_modules;
pub mod detector;
pub mod error;

pub use crate::core_modules::color_histogram::ColorHistogram;
pub use crate::core_modules::contour::{Contour, Rect};
pub use crate::core_modules::frame_delta::to_grayscale;
pub use crate::core_modules::shape::Shape;
pub use crate::detector::{detect_shapes, BackgroundModel, DetectorConfig, ShapeDetector};
pub use crate::error::DetectorError;
