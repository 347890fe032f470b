use crate::error::FeedError;
use log::{debug, info};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Time given to a freshly opened camera to settle exposure before the first read.
const WARM_UP: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A camera by device index.
    Device(i32),
    /// A video file; the end of the file ends the feed.
    File(PathBuf),
}

/// An opened camera or video file.
pub struct FrameSource {
    capture: VideoCapture,
    kind: SourceKind,
}

impl FrameSource {
    pub fn open(kind: SourceKind) -> Result<Self, FeedError> {
        let capture = match &kind {
            SourceKind::Device(index) => VideoCapture::new(*index, videoio::CAP_ANY),
            SourceKind::File(path) => VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY),
        }
        .map_err(|err| FeedError::CameraUnavailable(format!("{kind:?}: {err}")))?;

        if !capture.is_opened()? {
            return Err(FeedError::CameraUnavailable(format!("{kind:?} could not be opened")));
        }
        info!("opened {kind:?}");

        if let SourceKind::Device(_) = kind {
            thread::sleep(WARM_UP);
        }
        Ok(Self { capture, kind })
    }

    /// Reads the next BGR frame. `Ok(None)` means a video file has ended.
    pub fn next_frame(&mut self) -> Result<Option<Mat>, FeedError> {
        let mut frame = Mat::default();
        let grabbed = self
            .capture
            .read(&mut frame)
            .map_err(|err| FeedError::FrameAcquisitionFailed(err.to_string()))?;

        if grabbed && !frame.empty() {
            return Ok(Some(frame));
        }
        match self.kind {
            SourceKind::File(_) => {
                debug!("no more frames in {:?}", self.kind);
                Ok(None)
            }
            SourceKind::Device(index) => Err(FeedError::FrameAcquisitionFailed(format!(
                "camera {index} returned no frame"
            ))),
        }
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }
}
