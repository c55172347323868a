//! Plot-frame corner location.
//!
//! Long vertical and horizontal strokes are isolated with line-shaped
//! openings, bridged with closings, and intersected. Every intersection
//! blob becomes a candidate; the bottom-most left-most one is the origin
//! and the top-most right-most one is the opposite corner.

use image::GrayImage;

use crate::config::CornerConfig;
use crate::contours::{bounding_box, external_contours};
use crate::diagnostics::{emit_gray, DiagnosticSink};
use crate::morphology::{clear_border, close_rect, mask_and, open_rect, threshold_at_or_below};
use crate::types::PixelPoint;

/// Located frame corners. Both are `None` when no line intersection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct PlotCorners {
    /// Bottom-left reference point.
    pub origin: Option<PixelPoint>,
    /// Top-right reference point.
    pub top_right: Option<PixelPoint>,
}

/// Find the plot frame corners in a grayscale image.
pub fn locate_plot_corners(
    gray: &GrayImage,
    cfg: &CornerConfig,
    sink: &mut dyn DiagnosticSink,
) -> PlotCorners {
    let (w, h) = gray.dimensions();
    let ink = threshold_at_or_below(gray, cfg.ink_threshold.saturating_sub(1));
    emit_gray(sink, "corner_binary", &ink);

    let v_open = (h / 40).max(3);
    let v_close = (h / 5).max(1);
    let vertical = close_rect(&open_rect(&ink, 1, v_open, 2), 1, v_close, 2);
    emit_gray(sink, "corner_vertical", &vertical);

    let h_open = (w / 40).max(3);
    let h_close = (w / 5).max(1);
    let horizontal = close_rect(&open_rect(&ink, h_open, 1, 1), h_close, 1, 2);
    emit_gray(sink, "corner_horizontal", &horizontal);

    let mut crossings = mask_and(&vertical, &horizontal);
    clear_border(&mut crossings, cfg.border_margin_px);
    emit_gray(sink, "corner_intersections", &crossings);

    let candidates: Vec<PixelPoint> = external_contours(&crossings)
        .iter()
        .filter_map(|c| bounding_box(c))
        .map(|b| b.top_left)
        .collect();

    let corners = select_corners(&candidates);
    tracing::debug!(
        candidates = candidates.len(),
        origin = ?corners.origin,
        top_right = ?corners.top_right,
        "plot corners"
    );
    corners
}

/// Pick origin (largest `y`, then smallest `x`) and top-right
/// (smallest `y`, then largest `x`) from candidate points.
pub fn select_corners(candidates: &[PixelPoint]) -> PlotCorners {
    PlotCorners {
        origin: candidates.iter().copied().min_by_key(|p| (-p.y, p.x)),
        top_right: candidates.iter().copied().min_by_key(|p| (p.y, -p.x)),
    }
}
