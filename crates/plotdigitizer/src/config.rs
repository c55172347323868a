//! Digitizer configuration and configuration errors.

use std::path::Path;

use crate::mapping::XOrientation;
use crate::types::{Axis, AxisLimits};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised while validating or loading a [`DigitizeConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Color name not present in the named-color table.
    UnknownColor(String),
    /// Malformed `#rgb` / `#rrggbb` string.
    InvalidHex(String),
    /// Morphology kernel size outside the accepted range.
    InvalidKernel {
        /// Config field name.
        name: &'static str,
        /// Rejected value.
        value: u32,
    },
    /// Manual limits that are not ordered or span less than one unit.
    InvalidLimits {
        /// Offending axis.
        axis: Axis,
        /// Supplied minimum.
        min: f64,
        /// Supplied maximum.
        max: f64,
    },
    /// Hue tolerance outside `0..=90`.
    InvalidTolerance(f64),
    /// Config file could not be read.
    Io(String),
    /// Config file could not be parsed.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownColor(name) => write!(f, "unknown color name '{}'", name),
            Self::InvalidHex(s) => write!(f, "invalid hex color '{}'", s),
            Self::InvalidKernel { name, value } => {
                write!(f, "invalid kernel size for {}: {}", name, value)
            }
            Self::InvalidLimits { axis, min, max } => {
                write!(
                    f,
                    "invalid {} limits [{}, {}]: need min < max and span >= {}",
                    axis,
                    min,
                    max,
                    AxisLimits::MIN_SPAN
                )
            }
            Self::InvalidTolerance(t) => write!(f, "hue tolerance {} outside [0, 90]", t),
            Self::Io(msg) => write!(f, "config io error: {}", msg),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Sub-configs ────────────────────────────────────────────────────────────

/// Target color isolation and curve-mask morphology.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorIsolationConfig {
    /// Target curve color: CSS/X11 name or `#rgb` / `#rrggbb`.
    pub target_color: String,
    /// Half-width of the accepted hue band, in degrees on the 0..180 hue scale.
    pub hue_tolerance: f64,
    /// Minimum saturation (0..255) for a pixel to count as the target color.
    pub min_saturation: u8,
    /// Maximum value (0..255) for a pixel to count as black.
    pub black_max_value: u8,
    /// Maximum saturation (0..255) for a pixel to count as white.
    pub white_max_saturation: u8,
    /// Minimum value (0..255) for a pixel to count as white.
    pub white_min_value: u8,
}

impl Default for ColorIsolationConfig {
    fn default() -> Self {
        Self {
            target_color: "blue".to_string(),
            hue_tolerance: 20.0,
            min_saturation: 150,
            black_max_value: 50,
            white_max_saturation: 30,
            white_min_value: 200,
        }
    }
}

/// Plot-frame corner detection and cropping.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    /// Pixels cleared around the image edge before contour search.
    pub border_margin_px: u32,
    /// Inward shrink applied to the detected frame before cropping.
    pub crop_margin_px: i32,
    /// First crop is kept only when it retains at least this share of the area.
    pub min_crop_area_ratio: f64,
    /// Grayscale level below which a pixel counts as frame ink.
    pub ink_threshold: u8,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            border_margin_px: 15,
            crop_margin_px: 4,
            min_crop_area_ratio: 0.8,
            ink_threshold: 205,
        }
    }
}

/// Axis calibration from tick labels.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// Caller-supplied x range; bypasses label recognition when both are set.
    pub manual_x_limits: Option<AxisLimits>,
    /// Caller-supplied y range.
    pub manual_y_limits: Option<AxisLimits>,
    /// Fallback x range when recognition fails.
    pub default_x_limits: AxisLimits,
    /// Fallback y range when recognition fails.
    pub default_y_limits: AxisLimits,
    /// Gap between frame and label strip, as a fraction of image height.
    pub label_roi_factor: f64,
    /// Binarization level applied to label strips before recognition.
    pub label_threshold: u8,
    /// Run the arithmetic-progression repair on recovered tick values.
    pub repair_axis_numbers: bool,
    /// Relative tolerance used by the repair pass.
    pub repair_rel_tol: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            manual_x_limits: None,
            manual_y_limits: None,
            default_x_limits: AxisLimits::new(0.0, 180.0),
            default_y_limits: AxisLimits::new(-30.0, 30.0),
            label_roi_factor: 0.004,
            label_threshold: 150,
            repair_axis_numbers: false,
            repair_rel_tol: 0.1,
        }
    }
}

impl AxisConfig {
    /// Manual limits for both axes, if the caller supplied them.
    pub fn manual_limits(&self) -> Option<(AxisLimits, AxisLimits)> {
        Some((self.manual_x_limits?, self.manual_y_limits?))
    }
}

/// Curve mask extraction and pixel-to-data mapping.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Side of the square opening kernel applied to the curve mask.
    pub structural_kernel_size: u32,
    /// Side of the square erosion kernel used to thin the curve mask.
    pub thinning_factor: u32,
    /// Border cleared from the curve mask, as a fraction of image height.
    pub border_clear_fraction: f64,
    /// Grayscale level at or below which a pixel belongs to the curve mask.
    pub foreground_threshold: u8,
    /// Relative polygon simplification tolerance (fraction of perimeter).
    pub polygon_epsilon_ratio: f64,
    /// Direction of the x axis in the cropped raster.
    pub x_orientation: XOrientation,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            structural_kernel_size: 1,
            thinning_factor: 2,
            border_clear_fraction: 0.02,
            foreground_threshold: 127,
            polygon_epsilon_ratio: 0.0001,
            x_orientation: XOrientation::LeftToRight,
        }
    }
}

/// Skew estimation and correction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Estimate and undo image skew before any other stage.
    pub correct_rotation: bool,
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Minimum Hough accumulator votes for a line.
    pub hough_threshold: u32,
    /// Absolute lower bound on segment length.
    pub min_line_length_px: u32,
    /// Segment length lower bound relative to the shorter image side.
    pub min_line_length_fraction: f64,
    /// Largest gap bridged while walking a segment.
    pub max_line_gap_px: u32,
    /// Rotations at or below this magnitude (degrees) are not applied.
    pub min_correction_deg: f64,
    /// Seed for the randomized Hough point visiting order.
    pub seed: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            correct_rotation: false,
            canny_low: 50.0,
            canny_high: 150.0,
            hough_threshold: 100,
            min_line_length_px: 200,
            min_line_length_fraction: 0.0,
            max_line_gap_px: 50,
            min_correction_deg: 0.0,
            seed: 0x5eed,
        }
    }
}

/// Interquartile-range outlier rejection on mapped samples.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// Enable the filter.
    pub remove_outliers: bool,
    /// Fence multiplier applied to the interquartile range.
    pub iqr_factor: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            remove_outliers: false,
            iqr_factor: 1.5,
        }
    }
}

// ── Top-level config ───────────────────────────────────────────────────────

/// Full digitizer configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DigitizeConfig {
    pub color: ColorIsolationConfig,
    pub corners: CornerConfig,
    pub axes: AxisConfig,
    pub curve: CurveConfig,
    pub rotation: RotationConfig,
    pub outliers: OutlierConfig,
}

impl DigitizeConfig {
    /// Load a config from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that the pipeline cannot recover from at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::color::ColorSpec::parse(&self.color.target_color)?;

        let tol = self.color.hue_tolerance;
        if !tol.is_finite() || !(0.0..=90.0).contains(&tol) {
            return Err(ConfigError::InvalidTolerance(tol));
        }

        for (name, value) in [
            ("structural_kernel_size", self.curve.structural_kernel_size),
            ("thinning_factor", self.curve.thinning_factor),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidKernel { name, value });
            }
        }

        for (axis, limits) in [
            (Axis::X, self.axes.manual_x_limits),
            (Axis::Y, self.axes.manual_y_limits),
            (Axis::X, Some(self.axes.default_x_limits)),
            (Axis::Y, Some(self.axes.default_y_limits)),
        ] {
            if let Some(l) = limits {
                if !l.is_valid() {
                    return Err(ConfigError::InvalidLimits {
                        axis,
                        min: l.min,
                        max: l.max,
                    });
                }
            }
        }

        Ok(())
    }
}
