//! Skew estimation and correction.
//!
//! Plot frames and gridlines are near-horizontal or near-vertical, so each
//! detected segment angle is folded into `[-45°, 45°]` and read as the
//! deviation from the nearest right angle. The estimate is the
//! length-weighted median of those deviations.

pub mod hough;

use image::{GrayImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::config::RotationConfig;
use crate::diagnostics::{emit_gray, DiagnosticSink};

pub use hough::{probabilistic_hough, HoughParams, LineSegment};

/// Fold an angle in degrees into `[-45, 45]` by steps of 90°.
pub fn fold_to_quadrant(mut deg: f64) -> f64 {
    while deg > 45.0 {
        deg -= 90.0;
    }
    while deg < -45.0 {
        deg += 90.0;
    }
    deg
}

/// Length-weighted median of `(angle, length)` pairs.
///
/// Pairs are taken longest first; the result is the angle at which the
/// running length first reaches half of the total. Empty input yields `0`.
pub fn weighted_median_angle(pairs: &[(f64, f64)]) -> f64 {
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    let total: f64 = sorted.iter().map(|p| p.1).sum();
    let mut acc = 0.0;
    for (angle, length) in &sorted {
        acc += length;
        if acc >= total / 2.0 {
            return *angle;
        }
    }
    0.0
}

/// Estimate image skew in degrees, counterclockwise positive.
pub fn estimate_rotation(gray: &GrayImage, cfg: &RotationConfig, sink: &mut dyn DiagnosticSink) -> f64 {
    let edges = imageproc::edges::canny(gray, cfg.canny_low, cfg.canny_high);
    emit_gray(sink, "rotation_edges", &edges);

    let short_side = gray.width().min(gray.height()) as f64;
    let min_len = (cfg.min_line_length_px as f64).max(cfg.min_line_length_fraction * short_side);
    let params = HoughParams {
        rho: 1.0,
        theta: (0.1f64).to_radians(),
        threshold: cfg.hough_threshold,
        min_line_length: min_len.round() as u32,
        max_line_gap: cfg.max_line_gap_px,
        seed: cfg.seed,
    };
    let segments = probabilistic_hough(&edges, &params);

    let pairs: Vec<(f64, f64)> = segments
        .iter()
        .map(|s| (fold_to_quadrant(s.angle_deg()), s.length()))
        .collect();
    let angle = weighted_median_angle(&pairs);
    tracing::debug!(segments = segments.len(), angle, "rotation estimate");
    angle
}

/// Rotate `img` clockwise by `angle_deg` about its center, undoing a
/// counterclockwise skew of the same size. Exposed corners become white.
pub fn correct_rotation(img: &RgbImage, angle_deg: f64) -> RgbImage {
    rotate_about_center(
        img,
        angle_deg.to_radians() as f32,
        Interpolation::Bilinear,
        Rgb([255, 255, 255]),
    )
}
