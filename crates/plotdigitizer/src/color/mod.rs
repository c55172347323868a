//! Target color parsing and RGB → HSV conversion.
//!
//! Hue is stored on the half-degree scale `0..180` so that one byte holds
//! the full circle; saturation and value use `0..=255`.

mod isolate;

pub use isolate::{classify_pixel, isolate_color, PixelClass};

use crate::config::ConfigError;

/// HSV triple on the `H ∈ [0, 180)`, `S, V ∈ [0, 255]` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Convert an 8-bit RGB triple.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let (r, g, b) = (r as i32, g as i32, b as i32);
        let v = r.max(g).max(b);
        let diff = v - r.min(g).min(b);

        let s = if v == 0 {
            0
        } else {
            (255.0 * diff as f64 / v as f64).round() as i32
        };

        let h = if diff == 0 {
            0.0
        } else {
            let diff = diff as f64;
            let mut deg = if v == r {
                (g - b) as f64 * 60.0 / diff
            } else if v == g {
                120.0 + (b - r) as f64 * 60.0 / diff
            } else {
                240.0 + (r - g) as f64 * 60.0 / diff
            };
            if deg < 0.0 {
                deg += 360.0;
            }
            deg
        };
        let mut h = (h / 2.0).round() as i32;
        if h >= 180 {
            h -= 180;
        }

        Self {
            h: h as u8,
            s: s.clamp(0, 255) as u8,
            v: v as u8,
        }
    }
}

/// Parsed target curve color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpec {
    pub rgb: [u8; 3],
}

impl ColorSpec {
    /// Parse a CSS color name (case-insensitive) or a `#rgb` / `#rrggbb` string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex)
                .map(|rgb| Self { rgb })
                .ok_or_else(|| ConfigError::InvalidHex(s.to_string()));
        }
        let key = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, rgb)| Self { rgb })
            .ok_or_else(|| ConfigError::UnknownColor(s.to_string()))
    }

    pub fn hsv(&self) -> Hsv {
        Hsv::from_rgb(self.rgb)
    }

    /// Inclusive hue band `[h − tol, h + tol]` clamped to `[0, 180]`.
    pub fn hue_band(&self, tolerance: f64) -> (f64, f64) {
        let h = self.hsv().h as f64;
        ((h - tolerance).max(0.0), (h + tolerance).min(180.0))
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let d = c.to_digit(16)? as u8;
                out[i] = d * 17;
            }
            Some(out)
        }
        6 => {
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).ok()?;
            }
            Some(out)
        }
        _ => None,
    }
}

/// CSS named colors.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("cadetblue", [95, 158, 160]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgreen", [0, 100, 0]),
    ("darkmagenta", [139, 0, 139]),
    ("darkorange", [255, 140, 0]),
    ("darkred", [139, 0, 0]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("hotpink", [255, 105, 180]),
    ("indigo", [75, 0, 130]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumblue", [0, 0, 205]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("royalblue", [65, 105, 225]),
    ("seagreen", [46, 139, 87]),
    ("skyblue", [135, 206, 235]),
    ("steelblue", [70, 130, 180]),
    ("teal", [0, 128, 128]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries_on_half_degree_scale() {
        assert_eq!(Hsv::from_rgb([255, 0, 0]), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 255, 0]), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 0, 255]), Hsv { h: 120, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 0, 0]), Hsv { h: 0, s: 0, v: 0 });
        assert_eq!(Hsv::from_rgb([200, 200, 200]), Hsv { h: 0, s: 0, v: 200 });
    }

    #[test]
    fn hue_near_red_wraps_below_180() {
        // 359 degrees rounds to 180 on the half scale and wraps to 0.
        let hsv = Hsv::from_rgb([255, 0, 4]);
        assert!(hsv.h < 180);
    }

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(ColorSpec::parse("Blue").unwrap().rgb, [0, 0, 255]);
        assert_eq!(ColorSpec::parse("green").unwrap().rgb, [0, 128, 0]);
        assert_eq!(ColorSpec::parse("#f80").unwrap().rgb, [255, 136, 0]);
        assert_eq!(ColorSpec::parse("#1E90FF").unwrap().rgb, [30, 144, 255]);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(matches!(
            ColorSpec::parse("#12345"),
            Err(ConfigError::InvalidHex(_))
        ));
        assert!(matches!(
            ColorSpec::parse("#ggg"),
            Err(ConfigError::InvalidHex(_))
        ));
        assert!(matches!(
            ColorSpec::parse("bluish"),
            Err(ConfigError::UnknownColor(_))
        ));
    }

    #[test]
    fn hue_band_is_clamped() {
        let red = ColorSpec::parse("red").unwrap();
        assert_eq!(red.hue_band(20.0), (0.0, 20.0));
        let blue = ColorSpec::parse("blue").unwrap();
        assert_eq!(blue.hue_band(20.0), (100.0, 140.0));
        assert_eq!(blue.hue_band(90.0), (30.0, 180.0));
    }
}
