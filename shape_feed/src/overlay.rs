use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
};
use shape_detector::{Rect, Shape};

/// Outline color for detected shapes (BGR red).
pub const HIGHLIGHT: (f64, f64, f64) = (0.0, 0.0, 255.0);
const THICKNESS: i32 = 1;

pub fn to_cv_rect(bounds: &Rect) -> core::Rect {
    core::Rect::new(bounds.x, bounds.y, bounds.width, bounds.height)
}

/// Draws an unfilled rectangle around every shape directly onto the frame.
pub fn draw_bounds(frame: &mut Mat, shapes: &[Shape]) -> opencv::Result<()> {
    let color = Scalar::new(HIGHLIGHT.0, HIGHLIGHT.1, HIGHLIGHT.2, 0.0);
    for shape in shapes {
        imgproc::rectangle(frame, to_cv_rect(&shape.bounds), color, THICKNESS, imgproc::LINE_8, 0)?;
    }
    Ok(())
}
