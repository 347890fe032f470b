use shape_detector::DetectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The camera or video file could not be opened. Fatal.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    /// A frame could not be read from an open source.
    #[error("frame acquisition failed: {0}")]
    FrameAcquisitionFailed(String),
    /// An OpenCV frame could not be turned into an RGB buffer.
    #[error("frame conversion failed: {0}")]
    Conversion(String),
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}
