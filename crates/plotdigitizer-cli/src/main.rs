//! plotdigitizer CLI — digitize a line-chart image into calibrated samples.

use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::DynamicImage;
use plotdigitizer::{
    AxisLimits, DiagnosticSink, DigitizeConfig, DigitizeResult, Digitizer, NoOcr, TesseractCli,
    XOrientation,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "plotdigitizer")]
#[command(about = "Recover calibrated curve samples from a raster line chart")]
#[command(version)]
struct Cli {
    /// Path to the input chart image.
    image: PathBuf,

    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Curve color: CSS name or #rgb / #rrggbb.
    #[arg(long)]
    color: Option<String>,

    /// Hue tolerance on the 0..180 scale.
    #[arg(long)]
    hue_tolerance: Option<f64>,

    /// Manual x-axis limits as MIN,MAX (skips label recognition for x).
    #[arg(long, value_parser = parse_limits, allow_hyphen_values = true)]
    xlim: Option<AxisLimits>,

    /// Manual y-axis limits as MIN,MAX (skips label recognition for y).
    #[arg(long, value_parser = parse_limits, allow_hyphen_values = true)]
    ylim: Option<AxisLimits>,

    /// Morphological cleaning kernel size.
    #[arg(long)]
    kernel_size: Option<u32>,

    /// Thinning erosion kernel size.
    #[arg(long)]
    thinning_factor: Option<u32>,

    /// Drop samples outside the IQR fences.
    #[arg(long)]
    remove_outliers: bool,

    /// Estimate and undo skew before processing.
    #[arg(long)]
    correct_rotation: bool,

    /// Apply the self-consistency repair to recognized tick values.
    #[arg(long)]
    repair_axes: bool,

    /// Which image edge the x minimum sits on.
    #[arg(long, value_enum)]
    x_orientation: Option<XOrientationArg>,

    /// Disable tick-label recognition; limits come from --xlim/--ylim or defaults.
    #[arg(long)]
    no_ocr: bool,

    /// Tesseract executable.
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// Tesseract language pack.
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Per-call OCR timeout in seconds.
    #[arg(long, default_value = "10")]
    ocr_timeout: u64,

    /// Path to write the result (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the samples as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory to write intermediate stage images into.
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum XOrientationArg {
    LeftToRight,
    Mirrored,
}

impl XOrientationArg {
    fn to_core(self) -> XOrientation {
        match self {
            Self::LeftToRight => XOrientation::LeftToRight,
            Self::Mirrored => XOrientation::Mirrored,
        }
    }
}

fn parse_limits(s: &str) -> Result<AxisLimits, String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", s))?;
    let min: f64 = min.trim().parse().map_err(|e| format!("bad min: {}", e))?;
    let max: f64 = max.trim().parse().map_err(|e| format!("bad max: {}", e))?;
    Ok(AxisLimits::new(min, max))
}

/// Writes each emitted stage image to `<dir>/<name>.png`. Names emitted more
/// than once in a run (the corner stages) get a `_2`, `_3`, ... suffix.
struct DirectorySink {
    dir: PathBuf,
    seen: HashMap<String, usize>,
}

impl DirectorySink {
    fn create(dir: &Path) -> CliResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            seen: HashMap::new(),
        })
    }
}

impl DiagnosticSink for DirectorySink {
    fn emit(&mut self, name: &str, image: &DynamicImage) {
        let count = self.seen.entry(name.to_string()).or_insert(0);
        *count += 1;
        let file = if *count == 1 {
            format!("{}.png", name)
        } else {
            format!("{}_{}.png", name, count)
        };
        let path = self.dir.join(file);
        if let Err(e) = image.save(&path) {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
        }
    }
}

fn build_config(cli: &Cli) -> CliResult<DigitizeConfig> {
    let mut config = match &cli.config {
        Some(path) => DigitizeConfig::from_json_file(path)?,
        None => DigitizeConfig::default(),
    };

    if let Some(color) = &cli.color {
        config.color.target_color = color.clone();
    }
    if let Some(tol) = cli.hue_tolerance {
        config.color.hue_tolerance = tol;
    }
    if cli.xlim.is_some() {
        config.axes.manual_x_limits = cli.xlim;
    }
    if cli.ylim.is_some() {
        config.axes.manual_y_limits = cli.ylim;
    }
    if let Some(k) = cli.kernel_size {
        config.curve.structural_kernel_size = k;
    }
    if let Some(t) = cli.thinning_factor {
        config.curve.thinning_factor = t;
    }
    if let Some(o) = cli.x_orientation {
        config.curve.x_orientation = o.to_core();
    }
    config.outliers.remove_outliers |= cli.remove_outliers;
    config.rotation.correct_rotation |= cli.correct_rotation;
    config.axes.repair_axis_numbers |= cli.repair_axes;

    Ok(config)
}

fn build_digitizer(cli: &Cli, config: DigitizeConfig) -> CliResult<Digitizer> {
    let digitizer = if cli.no_ocr {
        Digitizer::with_recognizer(config, NoOcr)?
    } else {
        let tesseract = TesseractCli {
            program: cli.tesseract.clone(),
            language: cli.ocr_lang.clone(),
            timeout: Duration::from_secs(cli.ocr_timeout),
        };
        Digitizer::with_recognizer(config, tesseract)?
    };
    Ok(digitizer)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> CliResult<()> {
    tracing::info!("Loading image: {}", cli.image.display());

    let img = image::open(&cli.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", cli.image.display(), e).into()
    })?;
    tracing::info!("Image size: {}x{}", img.width(), img.height());

    let config = build_config(cli)?;
    let digitizer = build_digitizer(cli, config)?;

    let result = match &cli.debug_dir {
        Some(dir) => {
            let mut sink = DirectorySink::create(dir)?;
            let result = digitizer.digitize_with_diagnostics(&img, &mut sink)?;
            tracing::info!("Stage images written to {}", dir.display());
            result
        }
        None => digitizer.digitize(&img)?,
    };

    report(&result);
    write_outputs(cli, &result)
}

fn report(result: &DigitizeResult) {
    match result.origin {
        Some(o) => tracing::info!("Plot origin at ({}, {})", o.x, o.y),
        None => tracing::warn!("Plot origin not found"),
    }
    tracing::info!(
        "x: [{}, {}] ({:?}), y: [{}, {}] ({:?})",
        result.x_limits.min,
        result.x_limits.max,
        result.x_source,
        result.y_limits.min,
        result.y_limits.max,
        result.y_source,
    );
    match result.median_db {
        Some(m) => tracing::info!("{} samples, median {:.3} dB", result.samples.len(), m),
        None => tracing::warn!("No curve samples extracted"),
    }
}

fn write_outputs(cli: &Cli, result: &DigitizeResult) -> CliResult<()> {
    let json = serde_json::to_string_pretty(result)?;
    match &cli.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some(path) = &cli.csv {
        std::fs::write(path, result.samples_csv())?;
        tracing::info!("Samples written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_parse_with_negative_values() {
        let l = parse_limits("-30, 30").unwrap();
        assert_eq!(l, AxisLimits::new(-30.0, 30.0));
        assert!(parse_limits("12").is_err());
        assert!(parse_limits("a,b").is_err());
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::parse_from([
            "plotdigitizer",
            "chart.png",
            "--color",
            "#ff0000",
            "--ylim",
            "-40,10",
            "--remove-outliers",
            "--x-orientation",
            "mirrored",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.color.target_color, "#ff0000");
        assert_eq!(config.axes.manual_y_limits, Some(AxisLimits::new(-40.0, 10.0)));
        assert_eq!(config.axes.manual_x_limits, None);
        assert!(config.outliers.remove_outliers);
        assert_eq!(config.curve.x_orientation, XOrientation::Mirrored);
    }
}
