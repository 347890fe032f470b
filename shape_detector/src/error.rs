use thiserror::Error;

/// Errors produced by the detection core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectorError {
    /// The background and the frame are not the same size.
    #[error(
        "frame is {}x{} but background is {}x{}",
        .frame.0, .frame.1, .background.0, .background.1
    )]
    DimensionMismatch {
        /// Frame `(width, height)`.
        frame: (u32, u32),
        /// Background `(width, height)`.
        background: (u32, u32),
    },
    /// A `DetectorConfig` field is out of range.
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
}
