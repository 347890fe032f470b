use crate::camera::SourceKind;
use crate::feed::FeedOptions;
use clap::{Parser, ValueEnum};
use shape_detector::DetectorConfig;
use std::path::PathBuf;

/// What to do when a frame cannot be read from an open source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramePolicy {
    /// Stop the feed and exit with an error.
    Exit,
    /// Log the failure and try the next frame.
    Skip,
}

/// Shows the camera feed with a box around every region that differs from the first frame.
/// Press any key in the window to quit.
#[derive(Debug, Parser)]
#[command(name = "shape_feed", version, about)]
pub struct Args {
    /// Camera device index.
    #[arg(short, long, default_value_t = 0)]
    pub device: i32,

    /// Read frames from a video file instead of a camera.
    #[arg(short, long)]
    pub video: Option<PathBuf>,

    /// Minimum grayscale difference (0-255) for a pixel to count as changed.
    #[arg(long, default_value_t = DetectorConfig::default().difference_threshold)]
    pub threshold: u8,

    /// Minimum enclosed contour area for a region to be reported.
    #[arg(long, default_value_t = DetectorConfig::default().min_area)]
    pub min_area: f64,

    /// Histogram bins per color channel.
    #[arg(long, default_value_t = DetectorConfig::default().histogram_bins)]
    pub bins: usize,

    /// How long to wait for a key press after each frame, in milliseconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i32).range(1..))]
    pub wait_ms: i32,

    /// Policy for frames that fail to arrive.
    #[arg(long, value_enum, default_value_t = FramePolicy::Exit)]
    pub on_frame_error: FramePolicy,
}

impl Args {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            difference_threshold: self.threshold,
            min_area: self.min_area,
            histogram_bins: self.bins,
        }
    }

    pub fn source(&self) -> SourceKind {
        match &self.video {
            Some(path) => SourceKind::File(path.clone()),
            None => SourceKind::Device(self.device),
        }
    }

    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            wait_ms: self.wait_ms,
            on_frame_error: self.on_frame_error,
        }
    }
}
