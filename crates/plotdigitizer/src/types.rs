//! Core point and calibration types shared by all pipeline stages.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate: `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<imageproc::point::Point<i32>> for PixelPoint {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// One digitized sample in calibrated data units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Plot axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Data-unit range `[min, max]` covered by one axis of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl AxisLimits {
    /// Smallest span accepted for a calibrated axis.
    pub const MIN_SPAN: f64 = 1.0;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build limits from the first and last recovered tick values.
    ///
    /// Returns `None` for an empty sequence. A single value yields a
    /// degenerate range, which [`AxisLimits::is_valid`] rejects.
    pub fn from_ticks(ticks: &[f64]) -> Option<Self> {
        let first = *ticks.first()?;
        let last = *ticks.last()?;
        Some(Self::new(first, last))
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// `min < max` with a span of at least [`AxisLimits::MIN_SPAN`].
    pub fn is_valid(self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min < self.max
            && self.span() >= Self::MIN_SPAN
    }
}

/// How the limits of one axis were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSource {
    /// Supplied by the caller.
    Manual,
    /// First/last tick label recovered from the image.
    Recognized,
    /// Recovered tick labels after the self-consistency repair pass.
    Repaired,
    /// Calibration failed; the configured default range was substituted.
    Default,
}

/// Mapping between the cropped plot raster and data units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibration {
    /// Bottom-left reference point of the plot frame, when it was located.
    pub origin: Option<PixelPoint>,
    pub x: AxisLimits,
    pub y: AxisLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_validation_requires_ordered_unit_span() {
        assert!(AxisLimits::new(0.0, 180.0).is_valid());
        assert!(AxisLimits::new(-30.0, -29.0).is_valid());
        assert!(!AxisLimits::new(0.0, 0.5).is_valid());
        assert!(!AxisLimits::new(10.0, 0.0).is_valid());
        assert!(!AxisLimits::new(f64::NAN, 1.0).is_valid());
    }

    #[test]
    fn limits_from_ticks_uses_first_and_last() {
        let l = AxisLimits::from_ticks(&[0.0, 20.0, 40.0, 180.0]).unwrap();
        assert_eq!(l, AxisLimits::new(0.0, 180.0));
        assert!(AxisLimits::from_ticks(&[]).is_none());
        assert!(!AxisLimits::from_ticks(&[5.0]).unwrap().is_valid());
    }
}
