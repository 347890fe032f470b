mod camera;
mod cli;
mod convert;
mod error;
mod feed;
mod overlay;

use anyhow::Context;
use camera::{FrameSource, SourceKind};
use clap::Parser;
use cli::Args;
use error::FeedError;
use log::{error, info};
use opencv::highgui;
use shape_detector::ShapeDetector;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    let mut detector = ShapeDetector::new(args.detector_config()).context("invalid detector settings")?;

    // --- 2. Window & Video I/O Initialization ---
    highgui::named_window(feed::WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
    let source_kind = args.source();
    let mut source = match FrameSource::open(source_kind.clone()) {
        Ok(source) => source,
        Err(err @ FeedError::CameraUnavailable(_)) => {
            println!("{}", open_failure_message(&source_kind));
            error!("{err}");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    // --- 3. Main Processing Loop ---
    let summary = feed::run(&mut source, &mut detector, &args.feed_options())
        .with_context(|| format!("feed from {:?} stopped", source.kind()))?;

    info!(
        "processed {} frames, {} shapes, {} skipped",
        summary.frames, summary.shapes, summary.skipped
    );
    Ok(())
}

fn open_failure_message(kind: &SourceKind) -> String {
    match kind {
        SourceKind::Device(_) => "Failed to open camera".to_string(),
        SourceKind::File(path) => format!("Failed to open video file {}", path.display()),
    }
}
