//! Digitization pipeline.
//!
//! This module wires the stages together; the algorithms live in
//! `crate::rotation`, `crate::corners`, `crate::axes`, `crate::color`,
//! `crate::curve`, `crate::mapping` and `crate::stats`. Every stage is a
//! pure function over an owned working image, so the caller's input is
//! never modified.

pub mod crop;
mod result;
mod run;

pub use result::{DigitizeResult, ExtractionStatus};
pub use run::digitize;
