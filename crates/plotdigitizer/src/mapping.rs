//! Pixel → data coordinate mapping over the cropped plot area.
//!
//! Row `0` maps to `y.max` and row `H − 1` to `y.min`. Column mapping
//! depends on [`XOrientation`].

use serde::{Deserialize, Serialize};

use crate::types::{AxisCalibration, DataPoint, PixelPoint};

/// Direction of increasing data `x` across the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XOrientation {
    /// Column `0` is `x.min`, column `W − 1` is `x.max`.
    #[default]
    LeftToRight,
    /// Column `0` is `x.max`, column `W − 1` is `x.min`.
    Mirrored,
}

/// Linear map for one raster of `width × height` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub width: u32,
    pub height: u32,
    pub calibration: AxisCalibration,
    pub orientation: XOrientation,
}

impl CoordinateMapper {
    pub fn new(width: u32, height: u32, calibration: AxisCalibration, orientation: XOrientation) -> Self {
        Self {
            width,
            height,
            calibration,
            orientation,
        }
    }

    fn fraction(v: i32, extent: u32) -> f64 {
        if extent <= 1 {
            0.0
        } else {
            v as f64 / (extent - 1) as f64
        }
    }

    pub fn map_point(&self, p: PixelPoint) -> DataPoint {
        let xl = self.calibration.x;
        let yl = self.calibration.y;
        let fx = Self::fraction(p.x, self.width);
        let fy = Self::fraction(p.y, self.height);
        let x = match self.orientation {
            XOrientation::LeftToRight => xl.min + fx * xl.span(),
            XOrientation::Mirrored => xl.max - fx * xl.span(),
        };
        let y = yl.max - fy * yl.span();
        DataPoint::new(x, y)
    }

    pub fn map_points(&self, points: &[PixelPoint]) -> Vec<DataPoint> {
        points.iter().map(|&p| self.map_point(p)).collect()
    }
}
