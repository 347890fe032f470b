// THEORY:
// The feed loop is the thin driver around the detector. Each iteration reads
// one frame, lets the `ShapeDetector` compare it with the background (the very
// first frame becomes that background), boxes the returned shapes on the
// frame, shows it, and polls the keyboard. Any key ends the loop.
//
// Everything is synchronous on one thread: the loop blocks on the camera and
// on the bounded key poll, which doubles as the only quit check.

use crate::camera::FrameSource;
use crate::cli::FramePolicy;
use crate::convert::mat_to_rgb;
use crate::error::FeedError;
use crate::overlay::draw_bounds;
use log::{debug, warn};
use opencv::highgui;
use shape_detector::ShapeDetector;

pub const WINDOW_NAME: &str = "Feed";

#[derive(Debug, Clone, Copy)]
pub struct FeedOptions {
    /// Key poll timeout per frame, in milliseconds. Must be positive.
    pub wait_ms: i32,
    pub on_frame_error: FramePolicy,
}

/// Counters reported when the feed stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub frames: u64,
    pub shapes: u64,
    pub skipped: u64,
}

impl FeedSummary {
    fn record_frame(&mut self, shapes: usize) {
        self.frames += 1;
        self.shapes += shapes as u64;
    }
}

/// Runs until a key is pressed, the source ends, or a fatal error occurs.
pub fn run(
    source: &mut FrameSource,
    detector: &mut ShapeDetector,
    options: &FeedOptions,
) -> Result<FeedSummary, FeedError> {
    let mut summary = FeedSummary::default();

    loop {
        let mut frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err @ FeedError::FrameAcquisitionFailed(_)) => match options.on_frame_error {
                FramePolicy::Exit => return Err(err),
                FramePolicy::Skip => {
                    warn!("{err}; skipping");
                    summary.skipped += 1;
                    if highgui::wait_key(options.wait_ms)? >= 0 {
                        break;
                    }
                    continue;
                }
            },
            Err(err) => return Err(err),
        };

        let rgb = mat_to_rgb(&frame)?;
        let shapes = detector.detect(&rgb)?;
        debug!("frame {}: {} shapes", summary.frames, shapes.len());
        summary.record_frame(shapes.len());

        draw_bounds(&mut frame, &shapes)?;
        highgui::imshow(WINDOW_NAME, &frame)?;

        if highgui::wait_key(options.wait_ms)? >= 0 {
            break;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accumulates_frames_and_shapes() {
        let mut summary = FeedSummary::default();
        summary.record_frame(0);
        summary.record_frame(3);
        summary.record_frame(1);
        assert_eq!(
            summary,
            FeedSummary {
                frames: 3,
                shapes: 4,
                skipped: 0
            }
        );
    }
}
