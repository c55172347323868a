//! Text recognition seam used for tick-label reading.

use image::GrayImage;

/// Layout assumption passed to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutHint {
    /// One line of text (x-axis labels).
    SingleLine,
    /// A uniform block of text (stacked y-axis labels).
    Block,
}

impl LayoutHint {
    /// Tesseract page segmentation mode for this layout.
    pub fn page_segmentation_mode(self) -> u8 {
        match self {
            Self::SingleLine => 7,
            Self::Block => 6,
        }
    }
}

/// Recognition failure. The pipeline treats every variant as a calibration
/// failure and falls back to default limits.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrError {
    /// No backend available (not installed or not configured).
    Unavailable(String),
    /// Backend did not answer in time.
    Timeout {
        /// Configured limit.
        seconds: u64,
    },
    /// Backend ran but reported an error.
    Failed(String),
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "text recognition unavailable: {}", msg),
            Self::Timeout { seconds } => {
                write!(f, "text recognition timed out after {}s", seconds)
            }
            Self::Failed(msg) => write!(f, "text recognition failed: {}", msg),
        }
    }
}

impl std::error::Error for OcrError {}

/// Anything that turns a binarized label strip into raw text.
pub trait TextRecognizer {
    fn recognize(&self, image: &GrayImage, layout: LayoutHint) -> Result<String, OcrError>;
}

impl<F> TextRecognizer for F
where
    F: Fn(&GrayImage, LayoutHint) -> Result<String, OcrError>,
{
    fn recognize(&self, image: &GrayImage, layout: LayoutHint) -> Result<String, OcrError> {
        self(image, layout)
    }
}

/// Recognizer that always reports itself unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOcr;

impl TextRecognizer for NoOcr {
    fn recognize(&self, _image: &GrayImage, _layout: LayoutHint) -> Result<String, OcrError> {
        Err(OcrError::Unavailable("no text recognizer configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_recognizers() {
        let ocr = |_: &GrayImage, layout: LayoutHint| -> Result<String, OcrError> {
            Ok(format!("psm {}", layout.page_segmentation_mode()))
        };
        let img = GrayImage::new(1, 1);
        assert_eq!(ocr.recognize(&img, LayoutHint::SingleLine).unwrap(), "psm 7");
        assert_eq!(ocr.recognize(&img, LayoutHint::Block).unwrap(), "psm 6");
    }

    #[test]
    fn no_ocr_is_unavailable() {
        let err = NoOcr
            .recognize(&GrayImage::new(1, 1), LayoutHint::Block)
            .unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)));
    }
}
