//! Curve vertex extraction from the color-isolated plot area.

pub mod ordering;

use image::GrayImage;

use crate::config::CurveConfig;
use crate::contours::{external_contours, simplify_closed};
use crate::diagnostics::{emit_gray, DiagnosticSink};
use crate::morphology::{clear_border, erode_rect, open_rect, threshold_at_or_below};
use crate::types::PixelPoint;

pub use ordering::order_curve_points;

/// Binary curve mask: dark pixels as foreground, opened to drop specks,
/// border band cleared, then eroded so touching strokes separate.
pub fn curve_mask(gray: &GrayImage, cfg: &CurveConfig, sink: &mut dyn DiagnosticSink) -> GrayImage {
    let thresholded = threshold_at_or_below(gray, cfg.foreground_threshold);
    emit_gray(sink, "thresholded", &thresholded);

    let k = cfg.structural_kernel_size;
    let mut cleaned = open_rect(&thresholded, k, k, 1);
    let border = (cfg.border_clear_fraction * gray.height() as f64).floor() as u32;
    if border > 0 {
        clear_border(&mut cleaned, border);
    }
    emit_gray(sink, "cleaned", &cleaned);

    let t = cfg.thinning_factor;
    let eroded = erode_rect(&cleaned, t, t, 1);
    emit_gray(sink, "eroded", &eroded);
    eroded
}

/// Simplified outer-contour vertices of every curve region, unordered.
pub fn contour_vertices(mask: &GrayImage, epsilon_ratio: f64) -> Vec<PixelPoint> {
    let contours = external_contours(mask);
    let vertices: Vec<PixelPoint> = contours
        .iter()
        .flat_map(|c| simplify_closed(c, epsilon_ratio))
        .map(PixelPoint::from)
        .collect();
    tracing::debug!(
        contours = contours.len(),
        vertices = vertices.len(),
        "curve contours"
    );
    vertices
}

/// Ordered curve vertices in pixel coordinates of `gray`.
///
/// Returns an empty vector when no curve pixels survive masking.
pub fn extract_curve_points(
    gray: &GrayImage,
    cfg: &CurveConfig,
    sink: &mut dyn DiagnosticSink,
) -> Vec<PixelPoint> {
    let mask = curve_mask(gray, cfg, sink);
    let vertices = contour_vertices(&mask, cfg.polygon_epsilon_ratio);
    order_curve_points(&vertices)
}
