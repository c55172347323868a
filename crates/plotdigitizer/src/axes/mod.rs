//! Axis calibration from tick labels.
//!
//! Two label strips are cut relative to the plot origin: below the x axis
//! and left of the y axis. Each is binarized, passed to a
//! [`TextRecognizer`], and the recovered numbers give the axis range
//! (first and last tick). Any failure falls back to the configured default
//! range for that axis; calibration never aborts the pipeline.

pub mod numbers;
pub mod ocr;
pub mod tesseract;

use image::{imageops, GrayImage};

use crate::config::AxisConfig;
use crate::diagnostics::{emit_gray, DiagnosticSink};
use crate::morphology::threshold_above;
use crate::types::{Axis, AxisCalibration, AxisLimits, LimitSource, PixelPoint};

pub use numbers::{extract_numbers, is_monotonic, normalize_ocr_text, repair_axis_values};
pub use ocr::{LayoutHint, NoOcr, OcrError, TextRecognizer};
pub use tesseract::TesseractCli;

/// Pixel rectangle `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Label strip rectangles for both axes; `None` when the strip is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRegions {
    pub x_labels: Option<Roi>,
    pub y_labels: Option<Roi>,
}

/// Compute the label strips for an image of `width × height` with the
/// given origin.
///
/// The x strip starts `m = ⌊height · roi_factor⌋` rows below the origin and
/// covers half of the remaining rows, across the full width. The y strip
/// ends `m` columns left of the origin and covers the right half of that
/// span, across the full height.
pub fn label_regions(width: u32, height: u32, origin: PixelPoint, roi_factor: f64) -> LabelRegions {
    let (w, h) = (width as i64, height as i64);
    let m = (h as f64 * roi_factor).floor() as i64;

    let top = origin.y as i64 + m;
    let bottom = top + (h - top) / 2;
    let x_labels = (top >= 0 && bottom > top && bottom <= h).then(|| Roi {
        x: 0,
        y: top as u32,
        width,
        height: (bottom - top) as u32,
    });

    let right = (origin.x as i64 - m).min(w);
    let left = right / 2;
    let y_labels = (left >= 0 && right > left).then(|| Roi {
        x: left as u32,
        y: 0,
        width: (right - left) as u32,
        height,
    });

    LabelRegions { x_labels, y_labels }
}

/// Tick values read from both label strips, in axis order.
///
/// `y` is reversed from reading order so that it runs bottom to top.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisNumbers {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

fn read_strip(
    gray: &GrayImage,
    roi: Option<Roi>,
    level: u8,
    layout: LayoutHint,
    name: &str,
    ocr: &dyn TextRecognizer,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<f64>, OcrError> {
    let Some(r) = roi else {
        tracing::debug!(strip = name, "empty label strip skipped");
        return Ok(Vec::new());
    };
    let strip = imageops::crop_imm(gray, r.x, r.y, r.width, r.height).to_image();
    let binary = threshold_above(&strip, level);
    emit_gray(sink, name, &binary);
    let text = ocr.recognize(&binary, layout)?;
    let values = extract_numbers(&text);
    tracing::debug!(strip = name, text = %text.trim(), ?values, "label text");
    Ok(values)
}

/// Recognize tick labels next to the plot origin.
pub fn read_axis_numbers(
    gray: &GrayImage,
    origin: PixelPoint,
    cfg: &AxisConfig,
    ocr: &dyn TextRecognizer,
    sink: &mut dyn DiagnosticSink,
) -> Result<AxisNumbers, OcrError> {
    let regions = label_regions(gray.width(), gray.height(), origin, cfg.label_roi_factor);
    let level = cfg.label_threshold;

    let x = read_strip(
        gray,
        regions.x_labels,
        level,
        LayoutHint::SingleLine,
        "axis_x_strip",
        ocr,
        sink,
    )?;
    let mut y = read_strip(
        gray,
        regions.y_labels,
        level,
        LayoutHint::Block,
        "axis_y_strip",
        ocr,
        sink,
    )?;
    y.reverse();

    for (axis, values) in [(Axis::X, &x), (Axis::Y, &y)] {
        if !is_monotonic(values) {
            tracing::warn!(%axis, ?values, "recognized tick values are not monotonic");
        }
    }
    Ok(AxisNumbers { x, y })
}

/// Calibration outcome with per-axis provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAxes {
    pub calibration: AxisCalibration,
    pub x_source: LimitSource,
    pub y_source: LimitSource,
    /// Raw recognized values, empty when recognition did not run.
    pub numbers: AxisNumbers,
}

fn resolve_axis(
    axis: Axis,
    values: &[f64],
    cfg: &AxisConfig,
    fallback: AxisLimits,
) -> (AxisLimits, LimitSource) {
    let (values, source) = if cfg.repair_axis_numbers && values.len() >= 2 {
        let repaired = repair_axis_values(values, cfg.repair_rel_tol);
        if !is_monotonic(&repaired) {
            tracing::warn!(%axis, ?repaired, "tick values not monotonic after repair; using default");
            return (fallback, LimitSource::Default);
        }
        (repaired, LimitSource::Repaired)
    } else {
        (values.to_vec(), LimitSource::Recognized)
    };

    match AxisLimits::from_ticks(&values) {
        Some(limits) if limits.is_valid() => (limits, source),
        Some(limits) => {
            tracing::warn!(
                %axis,
                min = limits.min,
                max = limits.max,
                "recognized axis range rejected; using default"
            );
            (fallback, LimitSource::Default)
        }
        None => {
            tracing::warn!(%axis, "no tick values recognized; using default");
            (fallback, LimitSource::Default)
        }
    }
}

/// Resolve both axis ranges: manual limits first, then recognized tick
/// labels, then configured defaults.
pub fn calibrate_axes(
    gray: &GrayImage,
    origin: Option<PixelPoint>,
    cfg: &AxisConfig,
    ocr: &dyn TextRecognizer,
    sink: &mut dyn DiagnosticSink,
) -> ResolvedAxes {
    let defaults = (cfg.default_x_limits, cfg.default_y_limits);

    if let Some((x, y)) = cfg.manual_limits() {
        return ResolvedAxes {
            calibration: AxisCalibration { origin, x, y },
            x_source: LimitSource::Manual,
            y_source: LimitSource::Manual,
            numbers: AxisNumbers::default(),
        };
    }

    let numbers = match origin {
        None => {
            tracing::debug!("no plot origin; skipping label recognition");
            None
        }
        Some(o) => match read_axis_numbers(gray, o, cfg, ocr, sink) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(error = %e, "label recognition failed; using default limits");
                None
            }
        },
    };

    let (x, x_source) = match (cfg.manual_x_limits, &numbers) {
        (Some(l), _) => (l, LimitSource::Manual),
        (None, Some(n)) => resolve_axis(Axis::X, &n.x, cfg, defaults.0),
        (None, None) => (defaults.0, LimitSource::Default),
    };
    let (y, y_source) = match (cfg.manual_y_limits, &numbers) {
        (Some(l), _) => (l, LimitSource::Manual),
        (None, Some(n)) => resolve_axis(Axis::Y, &n.y, cfg, defaults.1),
        (None, None) => (defaults.1, LimitSource::Default),
    };

    tracing::info!(?x, ?x_source, ?y, ?y_source, "axis limits");
    ResolvedAxes {
        calibration: AxisCalibration { origin, x, y },
        x_source,
        y_source,
        numbers: numbers.unwrap_or_default(),
    }
}
