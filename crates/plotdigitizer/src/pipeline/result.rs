use crate::axes::AxisNumbers;
use crate::types::{AxisLimits, DataPoint, LimitSource, PixelPoint};

/// Outcome class of a digitization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// At least one curve sample was extracted.
    Ok,
    /// No curve-colored region survived masking; `samples` is empty and
    /// `median_db` is `None`.
    EmptyExtraction,
}

/// Full digitization result for a single image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DigitizeResult {
    /// Bottom-left plot corner in the working image, if located.
    pub origin: Option<PixelPoint>,
    /// Top-right plot corner in the working image, if located.
    pub top_right: Option<PixelPoint>,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
    pub x_source: LimitSource,
    pub y_source: LimitSource,
    /// Estimated skew in degrees (counterclockwise positive), when estimated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    /// Ordered samples in data units.
    pub samples: Vec<DataPoint>,
    /// Power-domain median of the sample `y` values.
    pub median_db: Option<f64>,
    pub status: ExtractionStatus,
    /// Pixel size `[width, height]` of the raster samples were mapped from.
    pub plot_size: [u32; 2],
    /// Raw tick values recovered from the label strips.
    pub axis_numbers: AxisNumbers,
}

impl DigitizeResult {
    pub fn is_empty(&self) -> bool {
        self.status == ExtractionStatus::EmptyExtraction
    }

    /// Samples as CSV with an `x,y` header.
    pub fn samples_csv(&self) -> String {
        let mut out = String::from("x,y\n");
        for p in &self.samples {
            out.push_str(&format!("{},{}\n", p.x, p.y));
        }
        out
    }
}
