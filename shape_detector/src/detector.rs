// THEORY:
// The `detector` module is the top-level API of the crate. It strings the core
// modules together into a single detection pass and owns the only piece of
// state that survives between frames: the background snapshot.
//
// A detection pass:
// 1.  **Frame Delta**: grayscale the frame, difference it against the background,
//     binarize with the configured threshold.
// 2.  **Contours**: extract the outer boundary of every foreground region.
// 3.  **Noise Filter**: drop regions whose enclosed area is below `min_area`.
// 4.  **Signature**: mask each surviving region and build its color histogram.
// 5.  **Report**: emit one `Shape` per surviving region, in discovery order.
//
// `detect_shapes` is a pure function. `ShapeDetector` wraps it with the
// two-state `BackgroundModel` so a capture loop can just hand it frames.

use crate::core_modules::color_histogram::{ColorHistogram, DEFAULT_BINS};
use crate::core_modules::contour::find_external_contours;
use crate::core_modules::frame_delta::{absolute_difference, threshold_binary, to_grayscale};
use crate::core_modules::region_mask::fill_contour_mask;
use crate::core_modules::shape::Shape;
use crate::error::DetectorError;
use image::{GrayImage, RgbImage};
use log::{debug, info, trace};

const DEFAULT_DIFFERENCE_THRESHOLD: u8 = 25;
const DEFAULT_MIN_AREA: f64 = 500.0;

/// Tunable constants of a detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Minimum absolute grayscale difference (0-255) for a pixel to count as changed.
    pub difference_threshold: u8,
    /// Regions whose contour encloses less than this area are discarded as noise.
    pub min_area: f64,
    /// Histogram resolution, in bins per color channel. Must be in 1..=256.
    pub histogram_bins: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            difference_threshold: DEFAULT_DIFFERENCE_THRESHOLD,
            min_area: DEFAULT_MIN_AREA,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.histogram_bins == 0 || self.histogram_bins > 256 {
            return Err(DetectorError::InvalidConfig(format!(
                "histogram_bins must be in 1..=256, got {}",
                self.histogram_bins
            )));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(DetectorError::InvalidConfig(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}

/// The reference image that frames are compared against.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BackgroundModel {
    /// No frame has been observed yet.
    #[default]
    Uninitialized,
    /// Grayscale snapshot of the first observed frame. Never replaced.
    Ready(GrayImage),
}

impl BackgroundModel {
    /// Captures `frame` as the background if none is set yet.
    /// Returns true only on the call that established it.
    pub fn establish(&mut self, frame: &RgbImage) -> bool {
        match self {
            BackgroundModel::Ready(_) => false,
            BackgroundModel::Uninitialized => {
                *self = BackgroundModel::Ready(to_grayscale(frame));
                true
            }
        }
    }

    pub fn background(&self) -> Option<&GrayImage> {
        match self {
            BackgroundModel::Ready(background) => Some(background),
            BackgroundModel::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BackgroundModel::Ready(_))
    }
}

/// Runs one detection pass of `frame` against `background`.
pub fn detect_shapes(
    frame: &RgbImage,
    background: &GrayImage,
    config: &DetectorConfig,
) -> Result<Vec<Shape>, DetectorError> {
    config.validate()?;
    let (width, height) = frame.dimensions();
    if background.dimensions() != (width, height) {
        return Err(DetectorError::DimensionMismatch {
            frame: (width, height),
            background: background.dimensions(),
        });
    }
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    // --- 1. Frame Delta ---
    let gray = to_grayscale(frame);
    let delta = absolute_difference(background, &gray);
    let binary = threshold_binary(&delta, config.difference_threshold);

    // --- 2. Contours ---
    let contours = find_external_contours(&binary);

    // --- 3-5. Filter, Signature, Report ---
    let shapes: Vec<Shape> = contours
        .iter()
        .filter(|contour| {
            let area = contour.area();
            if area < config.min_area {
                trace!("dropping contour with area {area} at {:?}", contour.bounding_rect());
                return false;
            }
            true
        })
        .map(|contour| {
            let mask = fill_contour_mask(contour, width, height);
            let histogram = ColorHistogram::from_masked(frame, &mask, config.histogram_bins);
            Shape::new(histogram, contour.bounding_rect())
        })
        .collect();

    debug!("{} contours, {} shapes", contours.len(), shapes.len());
    Ok(shapes)
}

/// A detector that establishes its background from the first frame it sees.
#[derive(Debug, Clone)]
pub struct ShapeDetector {
    config: DetectorConfig,
    background: BackgroundModel,
}

impl ShapeDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        config.validate()?;
        Ok(Self {
            config,
            background: BackgroundModel::Uninitialized,
        })
    }

    /// Detects shapes in `frame`. The first frame becomes the background, so
    /// that call always returns an empty list.
    pub fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Shape>, DetectorError> {
        if self.background.establish(frame) {
            info!("background established at {}x{}", frame.width(), frame.height());
        }
        match self.background.background() {
            Some(background) => detect_shapes(frame, background, &self.config),
            None => Ok(Vec::new()),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::contour::Rect;
    use image::Rgb;

    const WIDTH: u32 = 120;
    const HEIGHT: u32 = 90;

    fn backdrop() -> RgbImage {
        RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([30, 30, 30]))
    }

    fn with_block(mut frame: RgbImage, block: Rect, color: [u8; 3]) -> RgbImage {
        for y in block.y..block.y + block.height {
            for x in block.x..block.x + block.width {
                frame.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
        frame
    }

    #[test]
    fn unchanged_frame_yields_no_shapes() {
        let frame = backdrop();
        let background = to_grayscale(&frame);
        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn solid_block_yields_one_shape_with_its_bounds() {
        let background = to_grayscale(&backdrop());
        let block = Rect::new(40, 20, 30, 25);
        let frame = with_block(backdrop(), block, [200, 50, 50]);

        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].bounds, block);
    }

    #[test]
    fn histogram_counts_every_masked_pixel_once() {
        let background = to_grayscale(&backdrop());
        let block = Rect::new(10, 10, 40, 30);
        let frame = with_block(backdrop(), block, [10, 220, 90]);

        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        let histogram = &shapes[0].histogram;
        assert_eq!(histogram.total(), block.area() as u64);
        assert_eq!(histogram.count_for_color(10, 220, 90), block.area() as u32);
    }

    fn paint(frame: &mut RgbImage, color: [u8; 3], inside: impl Fn(i32, i32) -> bool) -> u64 {
        let mut painted = 0;
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            if inside(x as i32, y as i32) {
                *pixel = Rgb(color);
                painted += 1;
            }
        }
        painted
    }

    #[test]
    fn blocks_touching_the_frame_edges_are_detected() {
        let background = to_grayscale(&backdrop());
        let corner = Rect::new(0, 0, 40, 30);
        let far = Rect::new(70, 50, 30, 30);
        let frame = with_block(with_block(backdrop(), corner, [230, 230, 230]), far, [230, 230, 230]);

        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        let mut found: Vec<(Rect, u64)> = shapes.iter().map(|s| (s.bounds, s.histogram.total())).collect();
        found.sort_by_key(|(r, _)| (r.y, r.x));
        assert_eq!(found, vec![(corner, 1200), (far, 900)]);

        for block in [
            Rect::new(0, 40, 30, 30),
            Rect::new(50, 0, 30, 30),
            Rect::new(90, 30, 30, 30),
            Rect::new(40, 60, 30, 30),
            Rect::new(90, 60, 30, 30),
        ] {
            let frame = with_block(backdrop(), block, [230, 230, 230]);
            let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
            assert_eq!(shapes.len(), 1, "block {block:?}");
            assert_eq!(shapes[0].bounds, block);
            assert_eq!(shapes[0].histogram.total(), 900);
        }
    }

    #[test]
    fn histogram_covers_exactly_the_pixels_of_irregular_regions() {
        let background = to_grayscale(&backdrop());
        let mut frame = backdrop();
        let disc_color = [220, 40, 40];
        let ell_color = [40, 200, 40];
        let wedge_color = [60, 60, 230];

        let disc = paint(&mut frame, disc_color, |x, y| (x - 35).pow(2) + (y - 45).pow(2) <= 18 * 18);
        let ell = paint(&mut frame, ell_color, |x, y| {
            ((70..110).contains(&x) && (10..22).contains(&y)) || ((70..82).contains(&x) && (10..70).contains(&y))
        });
        let wedge = paint(&mut frame, wedge_color, |x, y| {
            (85..=115).contains(&x) && (30..=80).contains(&y) && x - 85 <= y - 30
        });

        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert_eq!(shapes.len(), 3);
        for (color, painted) in [(disc_color, disc), (ell_color, ell), (wedge_color, wedge)] {
            let [r, g, b] = color;
            let shape = shapes
                .iter()
                .find(|s| s.histogram.count_for_color(r, g, b) > 0)
                .unwrap();
            assert_eq!(shape.histogram.total(), painted, "region of color {color:?}");
            assert_eq!(shape.histogram.count_for_color(r, g, b) as u64, painted);
        }
    }

    #[test]
    fn small_regions_are_filtered_out() {
        let background = to_grayscale(&backdrop());
        // 20x20 pixels encloses 19 * 19 = 361 < 500.
        let frame = with_block(backdrop(), Rect::new(50, 30, 20, 20), [255, 255, 255]);
        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert!(shapes.is_empty());

        let lenient = DetectorConfig {
            min_area: 100.0,
            ..DetectorConfig::default()
        };
        assert_eq!(detect_shapes(&frame, &background, &lenient).unwrap().len(), 1);
    }

    #[test]
    fn changes_below_threshold_are_ignored() {
        let background = to_grayscale(&backdrop());
        // Gray 50 vs background gray 30: difference 20 < 25.
        let frame = with_block(backdrop(), Rect::new(10, 10, 50, 50), [50, 50, 50]);
        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert!(shapes.is_empty());

        let sensitive = DetectorConfig {
            difference_threshold: 20,
            ..DetectorConfig::default()
        };
        assert_eq!(detect_shapes(&frame, &background, &sensitive).unwrap().len(), 1);
    }

    #[test]
    fn darker_regions_count_as_change() {
        let background = to_grayscale(&RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([200, 200, 200])));
        let frame = with_block(
            RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([200, 200, 200])),
            Rect::new(5, 5, 30, 30),
            [0, 0, 0],
        );
        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].bounds, Rect::new(5, 5, 30, 30));
    }

    #[test]
    fn separate_blocks_yield_separate_shapes() {
        let background = to_grayscale(&backdrop());
        let first = Rect::new(5, 5, 30, 30);
        let second = Rect::new(70, 50, 40, 30);
        let frame = with_block(with_block(backdrop(), first, [250, 0, 0]), second, [0, 250, 250]);

        let shapes = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap();
        assert_eq!(shapes.len(), 2);
        let mut bounds: Vec<Rect> = shapes.iter().map(|s| s.bounds).collect();
        bounds.sort_by_key(|r| (r.y, r.x));
        assert_eq!(bounds, vec![first, second]);
        assert!(!shapes[0].is_close_in_color(&shapes[1], 0.5));
    }

    #[test]
    fn detection_is_idempotent() {
        let background = to_grayscale(&backdrop());
        let frame = with_block(backdrop(), Rect::new(20, 20, 35, 35), [120, 200, 10]);
        let config = DetectorConfig::default();

        let first = detect_shapes(&frame, &background, &config).unwrap();
        let second = detect_shapes(&frame, &background, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_background_is_rejected() {
        let frame = backdrop();
        let background = GrayImage::new(WIDTH - 1, HEIGHT);
        let err = detect_shapes(&frame, &background, &DetectorConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DetectorError::DimensionMismatch {
                frame: (WIDTH, HEIGHT),
                background: (WIDTH - 1, HEIGHT),
            }
        );
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let zero_bins = DetectorConfig {
            histogram_bins: 0,
            ..DetectorConfig::default()
        };
        assert!(matches!(zero_bins.validate(), Err(DetectorError::InvalidConfig(_))));

        let negative_area = DetectorConfig {
            min_area: -1.0,
            ..DetectorConfig::default()
        };
        assert!(ShapeDetector::new(negative_area).is_err());
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn background_is_taken_once_from_the_first_frame() {
        let mut model = BackgroundModel::default();
        assert!(!model.is_ready());
        assert!(model.background().is_none());

        let first = backdrop();
        assert!(model.establish(&first));
        let snapshot = model.background().cloned();

        let second = with_block(backdrop(), Rect::new(0, 0, 60, 60), [255, 255, 255]);
        assert!(!model.establish(&second));
        assert_eq!(model.background().cloned(), snapshot);
        assert_eq!(snapshot, Some(to_grayscale(&first)));
    }

    #[test]
    fn shape_detector_learns_then_detects() {
        let mut detector = ShapeDetector::new(DetectorConfig::default()).unwrap();
        assert!(detector.detect(&backdrop()).unwrap().is_empty());
        assert!(detector.background().is_ready());

        let block = Rect::new(30, 30, 45, 40);
        let shapes = detector.detect(&with_block(backdrop(), block, [90, 90, 250])).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].bounds, block);

        let wrong_size = RgbImage::new(WIDTH / 2, HEIGHT / 2);
        assert!(matches!(
            detector.detect(&wrong_size),
            Err(DetectorError::DimensionMismatch { .. })
        ));
    }
}
