use image::{Rgb, RgbImage};

use super::{ColorSpec, Hsv};
use crate::config::ColorIsolationConfig;

/// Pixel class used by color isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Low value regardless of hue (frame, ticks, labels).
    Black,
    /// Low saturation and high value (background).
    White,
    /// Saturated pixel inside the target hue band.
    Target,
    /// Anything else (gridlines, other curves, legends).
    Other,
}

/// Classify one pixel. All bounds are inclusive.
pub fn classify_pixel(hsv: Hsv, hue_band: (f64, f64), cfg: &ColorIsolationConfig) -> PixelClass {
    if hsv.v <= cfg.black_max_value {
        return PixelClass::Black;
    }
    if hsv.s <= cfg.white_max_saturation && hsv.v >= cfg.white_min_value {
        return PixelClass::White;
    }
    let h = hsv.h as f64;
    if h >= hue_band.0 && h <= hue_band.1 && hsv.s >= cfg.min_saturation {
        return PixelClass::Target;
    }
    PixelClass::Other
}

/// Keep black, white and target-colored pixels; paint everything else white.
pub fn isolate_color(img: &RgbImage, target: &ColorSpec, cfg: &ColorIsolationConfig) -> RgbImage {
    let band = target.hue_band(cfg.hue_tolerance);
    tracing::debug!(
        rgb = ?target.rgb,
        hue_min = band.0,
        hue_max = band.1,
        "color isolation"
    );
    imageproc::map::map_colors(img, |px: Rgb<u8>| {
        match classify_pixel(Hsv::from_rgb(px.0), band, cfg) {
            PixelClass::Other => Rgb([255, 255, 255]),
            _ => px,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ColorIsolationConfig {
        ColorIsolationConfig::default()
    }

    #[test]
    fn classifies_black_white_target_other() {
        let blue = ColorSpec::parse("blue").unwrap();
        let band = blue.hue_band(20.0);
        let c = cfg();
        assert_eq!(classify_pixel(Hsv::from_rgb([10, 10, 40]), band, &c), PixelClass::Black);
        assert_eq!(classify_pixel(Hsv::from_rgb([250, 250, 250]), band, &c), PixelClass::White);
        assert_eq!(classify_pixel(Hsv::from_rgb([20, 40, 230]), band, &c), PixelClass::Target);
        // Light gridline gray: unsaturated but not bright enough for white.
        assert_eq!(classify_pixel(Hsv::from_rgb([170, 170, 170]), band, &c), PixelClass::Other);
        assert_eq!(classify_pixel(Hsv::from_rgb([230, 20, 20]), band, &c), PixelClass::Other);
        // Washed-out blue fails the saturation floor.
        assert_eq!(classify_pixel(Hsv::from_rgb([150, 150, 240]), band, &c), PixelClass::Other);
    }

    #[test]
    fn isolation_whitens_non_target_pixels_only() {
        let mut img = RgbImage::from_pixel(4, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([0, 0, 255]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 0]));
        let target = ColorSpec::parse("blue").unwrap();
        let out = isolate_color(&img, &target, &cfg());
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(2, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(3, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn red_target_rejects_blue_curve() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([0, 0, 255]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        let target = ColorSpec::parse("red").unwrap();
        let out = isolate_color(&img, &target, &cfg());
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }
}
