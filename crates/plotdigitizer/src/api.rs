//! High-level digitization API.
//!
//! [`Digitizer`] is the primary entry point. It wraps a validated
//! [`DigitizeConfig`] together with a [`TextRecognizer`] for tick labels.

use image::DynamicImage;
use std::path::Path;

use crate::axes::{NoOcr, TextRecognizer};
use crate::config::{ConfigError, DigitizeConfig};
use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::pipeline::{self, DigitizeResult};

/// Primary digitization interface.
///
/// Create once, digitize many images.
///
/// # Examples
///
/// ```no_run
/// use plotdigitizer::{DigitizeConfig, Digitizer, TesseractCli};
///
/// let digitizer =
///     Digitizer::with_recognizer(DigitizeConfig::default(), TesseractCli::default()).unwrap();
/// let image = image::open("chart.png").unwrap();
/// let result = digitizer.digitize(&image).unwrap();
/// println!("{} samples, median {:?} dB", result.samples.len(), result.median_db);
/// ```
pub struct Digitizer {
    config: DigitizeConfig,
    ocr: Box<dyn TextRecognizer>,
}

impl Digitizer {
    /// Create a digitizer without label recognition. Axis limits come from
    /// the manual limits in `config`, or the configured defaults.
    pub fn new(config: DigitizeConfig) -> Result<Self, ConfigError> {
        Self::with_recognizer(config, NoOcr)
    }

    /// Create a digitizer with a tick-label recognizer.
    pub fn with_recognizer(
        config: DigitizeConfig,
        ocr: impl TextRecognizer + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ocr: Box::new(ocr),
        })
    }

    /// Load a JSON config and create a digitizer without label recognition.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Self::new(DigitizeConfig::from_json_file(path)?)
    }

    /// Replace the recognizer.
    pub fn set_recognizer(&mut self, ocr: impl TextRecognizer + 'static) {
        self.ocr = Box::new(ocr);
    }

    pub fn config(&self) -> &DigitizeConfig {
        &self.config
    }

    /// Digitize one image.
    pub fn digitize(&self, image: &DynamicImage) -> Result<DigitizeResult, ConfigError> {
        self.digitize_with_diagnostics(image, &mut NullSink)
    }

    /// Digitize one image and emit intermediate images to `sink`.
    pub fn digitize_with_diagnostics(
        &self,
        image: &DynamicImage,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<DigitizeResult, ConfigError> {
        pipeline::digitize(image, &self.config, self.ocr.as_ref(), sink)
    }
}
