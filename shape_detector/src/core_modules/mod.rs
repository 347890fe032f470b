pub mod color_histogram;
pub mod contour;
pub mod frame_delta;
pub mod region_mask;
pub mod shape;
