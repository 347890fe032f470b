// THEORY:
// The `frame_delta` module is the first stage of a detection pass. It reduces a
// color frame to a binary "what changed" image by comparing it against the
// fixed grayscale background.
//
// Key architectural principles:
// 1.  **Luminance Only**: Change is judged on brightness alone. The color frame is
//     collapsed to one channel with the BT.601 luma weights, the same weights the
//     background was captured with, so an unchanged scene differences to zero.
// 2.  **Absolute Difference**: Brightening and darkening count the same. A person
//     in a dark coat against a bright wall is as much "change" as the reverse.
// 3.  **Hard Binarization**: A single fixed threshold turns the difference into a
//     0/255 image. Everything downstream (contours, masks) only sees that binary
//     image, never the raw difference values.
// 4.  **Stateless Utility**: Every function here is a pure transform from one
//     buffer to a new buffer. No state survives between frames.

use image::{GrayImage, Luma, RgbImage};

/// Fixed-point shift used by the luma weights below (weights are scaled by 2^14).
const LUMA_SHIFT: u32 = 14;
const LUMA_RED: u32 = 4899;
const LUMA_GREEN: u32 = 9617;
const LUMA_BLUE: u32 = 1868;

/// Value written for pixels that pass the threshold.
pub const FOREGROUND: u8 = 255;

/// Converts a color frame to a single-channel luminance image.
/// Uses `0.299 R + 0.587 G + 0.114 B` in fixed point with rounding.
pub fn to_grayscale(frame: &RgbImage) -> GrayImage {
    let (width, height) = frame.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (src, dst) in frame.pixels().zip(gray.pixels_mut()) {
        let [r, g, b] = src.0;
        let weighted = r as u32 * LUMA_RED + g as u32 * LUMA_GREEN + b as u32 * LUMA_BLUE;
        let luma = (weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        *dst = Luma([luma.min(255) as u8]);
    }
    gray
}

/// Pixel-wise `|a - b|`. Both images must have the same dimensions;
/// callers are expected to have checked this.
pub fn absolute_difference(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let (width, height) = a.dimensions();
    let mut delta = GrayImage::new(width, height);
    for ((pa, pb), dst) in a.pixels().zip(b.pixels()).zip(delta.pixels_mut()) {
        *dst = Luma([pa.0[0].abs_diff(pb.0[0])]);
    }
    delta
}

/// Binarizes a difference image: values `>= threshold` become `FOREGROUND`, the rest 0.
pub fn threshold_binary(delta: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = delta.dimensions();
    let mut binary = GrayImage::new(width, height);
    for (src, dst) in delta.pixels().zip(binary.pixels_mut()) {
        if src.0[0] >= threshold {
            *dst = Luma([FOREGROUND]);
        }
    }
    binary
}
