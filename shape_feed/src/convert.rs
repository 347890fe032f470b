use crate::error::FeedError;
use image::RgbImage;
use opencv::{core::Mat, imgproc, prelude::*};

/// Copies an OpenCV BGR frame into an RGB `image` buffer for the detector.
pub fn mat_to_rgb(frame: &Mat) -> Result<RgbImage, FeedError> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let bytes = rgb.data_bytes()?.to_vec();
    let len = bytes.len();
    RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
        FeedError::Conversion(format!("{len} bytes do not make a {width}x{height} RGB frame"))
    })
}
