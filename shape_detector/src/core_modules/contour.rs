// THEORY:
// The `contour` module turns the binary foreground image into a list of outlined
// regions. It is the bridge between per-pixel change and per-object reasoning.
//
// Key architectural principles:
// 1.  **Outer Boundaries Only**: Border following (via `imageproc`) reports both
//     outer borders and hole borders, with a parent link for nesting. We keep
//     only top-level outer borders. A region with a hole in it is still one
//     region, and a blob sitting inside another blob's hole is ignored.
// 2.  **Vertex Simplification**: The raw border is a chain of 8-connected pixel
//     steps. Runs of identical steps carry no extra information, so only the
//     vertices where the chain changes direction are kept. A solid rectangle is
//     described by its four corners.
// 3.  **Zero Frame**: Border following needs a background margin to classify a
//     border correctly; a region flush with the left column is otherwise reported
//     as a hole. The binary image is traced inside a one-pixel zero frame and the
//     points are shifted back afterwards.
// 4.  **Geometry Lives With The Contour**: Area (shoelace over the vertices) and
//     the bounding rectangle are computed from the simplified polygon. Area is
//     the polygon area through pixel centers, so a w x h block of pixels has
//     area (w - 1) * (h - 1).

use image::{GrayImage, imageops};
use imageproc::contours::{self as border, BorderType};
use imageproc::point::Point;

/// An axis-aligned rectangle in frame pixel coordinates.
/// `width`/`height` count pixels, so a single pixel is a 1 x 1 rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Number of pixels covered by the rectangle.
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

/// The simplified outer boundary of one foreground region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Polygon vertices in boundary-following order. Never empty.
    vertices: Vec<(i32, i32)>,
}

impl Contour {
    /// Builds a contour from a closed chain of boundary points, dropping
    /// collinear intermediate points. Returns `None` for an empty chain.
    pub fn from_boundary(points: &[(i32, i32)]) -> Option<Self> {
        let vertices = simplify_chain(points);
        if vertices.is_empty() {
            None
        } else {
            Some(Self { vertices })
        }
    }

    pub fn vertices(&self) -> &[(i32, i32)] {
        &self.vertices
    }

    /// Iterates over the polygon's edges as `(start, end)` pairs, closing back
    /// to the first vertex. A single-vertex contour yields one degenerate edge.
    pub fn edges(&self) -> impl Iterator<Item = ((i32, i32), (i32, i32))> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Enclosed area of the polygon (shoelace formula), always non-negative.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let twice_signed: i64 = self
            .edges()
            .map(|((x0, y0), (x1, y1))| x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64)
            .sum();
        twice_signed.abs() as f64 / 2.0
    }

    /// Minimal axis-aligned rectangle enclosing every vertex (and therefore
    /// every boundary pixel).
    pub fn bounding_rect(&self) -> Rect {
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for &(x, y) in &self.vertices {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }
}

/// Finds the outer borders of all top-level foreground regions in a binary
/// image (any non-zero pixel is foreground). Order follows the raster scan in
/// which border following discovers each region.
pub fn find_external_contours(binary: &GrayImage) -> Vec<Contour> {
    let framed = with_zero_frame(binary);
    border::find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let chain: Vec<(i32, i32)> = c.points.iter().map(|p: &Point<i32>| (p.x - 1, p.y - 1)).collect();
            Contour::from_boundary(&chain)
        })
        .collect()
}

/// Copies `binary` into the middle of an image one pixel larger on every side.
fn with_zero_frame(binary: &GrayImage) -> GrayImage {
    let mut framed = GrayImage::new(binary.width() + 2, binary.height() + 2);
    imageops::replace(&mut framed, binary, 1, 1);
    framed
}

/// Keeps only the points of a closed chain where the step direction changes.
fn simplify_chain(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut chain: Vec<(i32, i32)> = Vec::with_capacity(points.len());
    for &p in points {
        if chain.last() != Some(&p) {
            chain.push(p);
        }
    }
    while chain.len() > 1 && chain.first() == chain.last() {
        chain.pop();
    }
    if chain.len() < 3 {
        return chain;
    }

    let n = chain.len();
    let step = |from: (i32, i32), to: (i32, i32)| ((to.0 - from.0).signum(), (to.1 - from.1).signum());
    let kept: Vec<(i32, i32)> = (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let next = chain[(i + 1) % n];
            step(prev, chain[i]) != step(chain[i], next)
        })
        .map(|i| chain[i])
        .collect();

    if kept.is_empty() { chain } else { kept }
}
