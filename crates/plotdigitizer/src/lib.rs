//! plotdigitizer — recover numeric curve samples from raster line-chart images.
//!
//! The pipeline stages are:
//!
//! 1. **Rotation** (optional) – Hough-based skew estimate and correction.
//! 2. **Corners** – plot frame location from long horizontal/vertical strokes,
//!    used to crop the plot area.
//! 3. **Axes** – tick-label recognition beside the frame, giving the data range
//!    of each axis (with manual override and default fallback).
//! 4. **Color** – HSV isolation of the target curve color.
//! 5. **Curve** – mask cleanup, contour tracing, polygon simplification and
//!    left-to-right vertex ordering.
//! 6. **Mapping** – pixel to data coordinates over the cropped plot area.
//! 7. **Stats** – optional IQR outlier rejection and power-domain median.
//!
//! # Public API
//! - [`Digitizer`] as the primary entry point
//! - [`DigitizeConfig`] for tuning
//! - [`TextRecognizer`] for plugging in a tick-label OCR backend
//! - [`DigitizeResult`] and the point/limit types it carries
//!
//! Stage modules are public so they can be used and benchmarked on their own.

mod api;
pub mod axes;
pub mod color;
pub mod config;
pub mod contours;
pub mod corners;
pub mod curve;
pub mod diagnostics;
pub mod mapping;
pub mod morphology;
pub mod pipeline;
pub mod rotation;
pub mod stats;
mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Digitizer;
pub use axes::{AxisNumbers, LayoutHint, NoOcr, OcrError, TesseractCli, TextRecognizer};
pub use color::ColorSpec;
pub use config::{
    AxisConfig, ColorIsolationConfig, ConfigError, CornerConfig, CurveConfig, DigitizeConfig,
    OutlierConfig, RotationConfig,
};
pub use corners::PlotCorners;
pub use diagnostics::{DiagnosticSink, MemorySink, NullSink};
pub use mapping::XOrientation;
pub use pipeline::{digitize, DigitizeResult, ExtractionStatus};
pub use stats::MedianError;
pub use types::{Axis, AxisCalibration, AxisLimits, DataPoint, LimitSource, PixelPoint};
