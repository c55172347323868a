//! Intermediate-image capture for inspecting pipeline stages.
//!
//! Stages call [`emit_gray`] / [`emit_rgb`] with a stable stage name; the
//! sink decides whether to keep, write or drop the image. Conversion to
//! [`DynamicImage`] only happens when the sink is enabled.

use image::{DynamicImage, GrayImage, RgbImage};

/// Receiver for named intermediate images.
pub trait DiagnosticSink {
    /// Whether [`DiagnosticSink::emit`] should be called at all.
    fn enabled(&self) -> bool {
        true
    }

    fn emit(&mut self, name: &str, image: &DynamicImage);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn enabled(&self) -> bool {
        false
    }

    fn emit(&mut self, _name: &str, _image: &DynamicImage) {}
}

/// Keeps every emitted image in order, mainly for tests and debugging.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub images: Vec<(String, DynamicImage)>,
}

impl MemorySink {
    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&DynamicImage> {
        self.images.iter().find(|(n, _)| n == name).map(|(_, img)| img)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, name: &str, image: &DynamicImage) {
        self.images.push((name.to_string(), image.clone()));
    }
}

pub fn emit_gray(sink: &mut dyn DiagnosticSink, name: &str, image: &GrayImage) {
    if sink.enabled() {
        sink.emit(name, &DynamicImage::ImageLuma8(image.clone()));
    }
}

pub fn emit_rgb(sink: &mut dyn DiagnosticSink, name: &str, image: &RgbImage) {
    if sink.enabled() {
        sink.emit(name, &DynamicImage::ImageRgb8(image.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let mut sink = MemorySink::default();
        emit_gray(&mut sink, "a", &GrayImage::new(2, 2));
        emit_rgb(&mut sink, "b", &RgbImage::new(3, 1));
        assert_eq!(sink.names(), vec!["a", "b"]);
        assert_eq!(sink.get("b").map(|i| i.width()), Some(3));
        assert!(sink.get("c").is_none());
    }

    #[test]
    fn null_sink_is_disabled() {
        let mut sink = NullSink;
        assert!(!sink.enabled());
        emit_gray(&mut sink, "ignored", &GrayImage::new(1, 1));
    }
}
