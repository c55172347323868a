//! [`TextRecognizer`] backed by the `tesseract` command-line tool.
//!
//! The label strip is PNG-encoded in memory and piped to
//! `tesseract stdin stdout --psm N`.

use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use image::GrayImage;

use super::ocr::{LayoutHint, OcrError, TextRecognizer};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Tesseract CLI invocation settings.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    /// Executable name or path.
    pub program: PathBuf,
    /// Language pack passed with `-l`.
    pub language: String,
    /// Per-call wall-clock limit.
    pub timeout: Duration,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl TesseractCli {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &GrayImage, layout: LayoutHint) -> Result<String, OcrError> {
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| OcrError::Failed(format!("png encode: {}", e)))?;
        let png = png.into_inner();

        let mut child = Command::new(&self.program)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(layout.page_segmentation_mode().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                OcrError::Unavailable(format!("{}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            std::thread::spawn(move || {
                let _ = stdin.write_all(&png);
            });
        }
        let stdout_reader = child.stdout.take().map(|out| std::thread::spawn(move || drain(out)));
        let stderr_reader = child.stderr.take().map(|err| std::thread::spawn(move || drain(err)));

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    kill_and_reap(&mut child);
                    return Err(OcrError::Timeout {
                        seconds: self.timeout.as_secs(),
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill_and_reap(&mut child);
                    return Err(OcrError::Failed(e.to_string()));
                }
            }
        };

        let stdout = join_output(stdout_reader)?;
        if !status.success() {
            let stderr = join_output(stderr_reader).unwrap_or_default();
            return Err(OcrError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                status,
                stderr.trim()
            )));
        }
        tracing::debug!(?layout, text = %stdout.trim(), "tesseract output");
        Ok(stdout)
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Read a child pipe to the end; runs on its own thread so a full pipe never
/// blocks the child.
fn drain(mut pipe: impl Read) -> std::io::Result<String> {
    let mut text = String::new();
    pipe.read_to_string(&mut text)?;
    Ok(text)
}

fn join_output(
    reader: Option<JoinHandle<std::io::Result<String>>>,
) -> Result<String, OcrError> {
    let Some(handle) = reader else {
        return Ok(String::new());
    };
    handle
        .join()
        .map_err(|_| OcrError::Failed("output reader panicked".to_string()))?
        .map_err(|e| OcrError::Failed(e.to_string()))
}
