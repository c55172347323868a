//! Top-level orchestrator:
//! rotation → crop → calibrate → isolate → recrop → extract → map → filter → median.

use image::{imageops, DynamicImage, RgbImage};

use super::crop::{crop_image, crop_window, guarded_crop_window};
use super::result::{DigitizeResult, ExtractionStatus};
use crate::axes::{calibrate_axes, TextRecognizer};
use crate::color::{isolate_color, ColorSpec};
use crate::config::{ConfigError, DigitizeConfig};
use crate::corners::locate_plot_corners;
use crate::curve::extract_curve_points;
use crate::diagnostics::{emit_rgb, DiagnosticSink};
use crate::mapping::CoordinateMapper;
use crate::rotation::{correct_rotation, estimate_rotation};
use crate::stats::{power_median_db, remove_outliers};

/// Estimate skew and, when it exceeds the configured floor, undo it.
fn deskew(
    rgb: RgbImage,
    config: &DigitizeConfig,
    sink: &mut dyn DiagnosticSink,
) -> (RgbImage, Option<f64>) {
    let cfg = &config.rotation;
    if !cfg.correct_rotation {
        return (rgb, None);
    }
    let angle = estimate_rotation(&imageops::grayscale(&rgb), cfg, sink);
    tracing::info!(angle_deg = angle, "estimated rotation");
    if angle.abs() > cfg.min_correction_deg {
        (correct_rotation(&rgb, angle), Some(angle))
    } else {
        (rgb, Some(angle))
    }
}

/// Crop to the plot frame, keeping the crop only when it retains enough of
/// the image.
fn first_crop(rgb: RgbImage, config: &DigitizeConfig, sink: &mut dyn DiagnosticSink) -> RgbImage {
    let corners = locate_plot_corners(&imageops::grayscale(&rgb), &config.corners, sink);
    match guarded_crop_window(
        &corners,
        config.corners.crop_margin_px,
        rgb.dimensions(),
        config.corners.min_crop_area_ratio,
    ) {
        Some(w) => {
            tracing::debug!(?w, "first crop applied");
            crop_image(&rgb, w)
        }
        None => rgb,
    }
}

/// Digitize the curve of the configured color in `image`.
///
/// Only configuration problems are errors. Missing corners, failed label
/// recognition and empty extractions are reported inside the result.
pub fn digitize(
    image: &DynamicImage,
    config: &DigitizeConfig,
    ocr: &dyn TextRecognizer,
    sink: &mut dyn DiagnosticSink,
) -> Result<DigitizeResult, ConfigError> {
    config.validate()?;
    let target = ColorSpec::parse(&config.color.target_color)?;

    let (rgb, rotation_deg) = deskew(image.to_rgb8(), config, sink);
    let working = first_crop(rgb, config, sink);

    let working_gray = imageops::grayscale(&working);
    let corners = locate_plot_corners(&working_gray, &config.corners, sink);
    if corners.origin.is_none() {
        tracing::warn!("plot corners not found");
    }
    let axes = calibrate_axes(&working_gray, corners.origin, &config.axes, ocr, sink);

    let isolated = isolate_color(&working, &target, &config.color);
    emit_rgb(sink, "isolated", &isolated);
    let mut plot = imageops::grayscale(&isolated);

    let plot_corners = locate_plot_corners(&plot, &config.corners, sink);
    if let Some(w) = crop_window(
        &plot_corners,
        config.corners.crop_margin_px,
        plot.width(),
        plot.height(),
    ) {
        plot = crop_image(&plot, w);
    }

    let pixels = extract_curve_points(&plot, &config.curve, sink);
    let mapper = CoordinateMapper::new(
        plot.width(),
        plot.height(),
        axes.calibration,
        config.curve.x_orientation,
    );
    let mut samples = mapper.map_points(&pixels);
    if config.outliers.remove_outliers {
        samples = remove_outliers(&samples, config.outliers.iqr_factor);
    }

    let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();
    let (median_db, status) = match power_median_db(&ys) {
        Ok(m) => (Some(m), ExtractionStatus::Ok),
        Err(e) => {
            tracing::warn!(error = %e, "no curve samples extracted");
            (None, ExtractionStatus::EmptyExtraction)
        }
    };

    tracing::info!(
        samples = samples.len(),
        median_db = ?median_db,
        plot_width = plot.width(),
        plot_height = plot.height(),
        "digitization complete"
    );

    Ok(DigitizeResult {
        origin: corners.origin,
        top_right: corners.top_right,
        x_limits: axes.calibration.x,
        y_limits: axes.calibration.y,
        x_source: axes.x_source,
        y_source: axes.y_source,
        rotation_deg,
        samples,
        median_db,
        status,
        plot_size: [plot.width(), plot.height()],
        axis_numbers: axes.numbers,
    })
}
