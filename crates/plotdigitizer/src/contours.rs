//! Outer-boundary tracing and polygon simplification over binary masks.

use image::GrayImage;
use imageproc::contours::BorderType;
use imageproc::point::Point;

use crate::types::PixelPoint;

/// Axis-aligned pixel bounding box (inclusive extent `w × h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top_left: PixelPoint,
    pub width: u32,
    pub height: u32,
}

/// Outer boundaries of top-level connected regions.
///
/// Holes and regions nested inside other regions are skipped.
pub fn external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    imageproc::contours::find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

pub fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(BoundingBox {
        top_left: PixelPoint::new(x0, y0),
        width: (x1 - x0 + 1) as u32,
        height: (y1 - y0 + 1) as u32,
    })
}

/// Douglas–Peucker simplification of a closed contour with tolerance
/// `epsilon_ratio × perimeter`.
pub fn simplify_closed(points: &[Point<i32>], epsilon_ratio: f64) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let eps = epsilon_ratio * imageproc::geometry::arc_length(points, true);
    imageproc::geometry::approximate_polygon_dp(points, eps, true)
}
