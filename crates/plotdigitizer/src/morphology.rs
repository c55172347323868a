//! Binary mask thresholding and rectangular-kernel morphology.
//!
//! Masks are `GrayImage`s holding `0` (clear) or `255` (set). Kernels are
//! axis-aligned rectangles anchored at `(kw / 2, kh / 2)`. Erosion treats
//! pixels outside the image as set, dilation treats them as clear, so the
//! image border never creates or destroys foreground by itself.
//!
//! Each pass is separable and uses running counts, so cost is independent
//! of the kernel size.

use image::{GrayImage, Luma};

pub const SET: u8 = 255;
pub const CLEAR: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MorphOp {
    Erode,
    Dilate,
}

/// `255` where `pixel > level`, `0` elsewhere.
pub fn threshold_above(gray: &GrayImage, level: u8) -> GrayImage {
    imageproc::map::map_colors(gray, |p: Luma<u8>| {
        Luma([if p[0] > level { SET } else { CLEAR }])
    })
}

/// `255` where `pixel <= level`, `0` elsewhere (dark ink becomes foreground).
pub fn threshold_at_or_below(gray: &GrayImage, level: u8) -> GrayImage {
    imageproc::map::map_colors(gray, |p: Luma<u8>| {
        Luma([if p[0] <= level { SET } else { CLEAR }])
    })
}

/// Pixelwise AND of two congruent masks.
pub fn mask_and(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = a.clone();
    for (o, &bv) in out.iter_mut().zip(b.iter()) {
        if *o == CLEAR || bv == CLEAR {
            *o = CLEAR;
        } else {
            *o = SET;
        }
    }
    out
}

/// Clear a band of `margin` pixels along every image edge.
pub fn clear_border(mask: &mut GrayImage, margin: u32) {
    let (w, h) = mask.dimensions();
    for y in 0..h {
        for x in 0..w {
            if x < margin || y < margin || x + margin >= w || y + margin >= h {
                mask.put_pixel(x, y, Luma([CLEAR]));
            }
        }
    }
}

/// Number of set pixels.
pub fn count_set(mask: &GrayImage) -> usize {
    mask.iter().filter(|&&v| v != CLEAR).count()
}

pub fn erode_rect(mask: &GrayImage, kw: u32, kh: u32, iterations: u32) -> GrayImage {
    apply(mask, kw, kh, iterations, MorphOp::Erode)
}

pub fn dilate_rect(mask: &GrayImage, kw: u32, kh: u32, iterations: u32) -> GrayImage {
    apply(mask, kw, kh, iterations, MorphOp::Dilate)
}

/// Opening: `iterations` erosions followed by as many dilations.
pub fn open_rect(mask: &GrayImage, kw: u32, kh: u32, iterations: u32) -> GrayImage {
    let eroded = erode_rect(mask, kw, kh, iterations);
    dilate_rect(&eroded, kw, kh, iterations)
}

/// Closing: `iterations` dilations followed by as many erosions.
pub fn close_rect(mask: &GrayImage, kw: u32, kh: u32, iterations: u32) -> GrayImage {
    let dilated = dilate_rect(mask, kw, kh, iterations);
    erode_rect(&dilated, kw, kh, iterations)
}

fn apply(mask: &GrayImage, kw: u32, kh: u32, iterations: u32, op: MorphOp) -> GrayImage {
    let mut cur = mask.clone();
    if kw <= 1 && kh <= 1 {
        return cur;
    }
    for _ in 0..iterations {
        if kw > 1 {
            cur = pass_1d(&cur, kw, true, op);
        }
        if kh > 1 {
            cur = pass_1d(&cur, kh, false, op);
        }
    }
    cur
}

/// One separable pass along rows (`horizontal`) or columns.
fn pass_1d(src: &GrayImage, k: u32, horizontal: bool, op: MorphOp) -> GrayImage {
    let (w, h) = src.dimensions();
    let (len, lines) = if horizontal { (w, h) } else { (h, w) };
    let anchor = (k / 2) as i64;
    let k = k as i64;
    let mut out = GrayImage::new(w, h);
    let mut prefix = vec![0u32; len as usize + 1];

    for line in 0..lines {
        let at = |i: u32| -> (u32, u32) {
            if horizontal {
                (i, line)
            } else {
                (line, i)
            }
        };

        for i in 0..len {
            let (x, y) = at(i);
            let set = (src.get_pixel(x, y)[0] != CLEAR) as u32;
            prefix[i as usize + 1] = prefix[i as usize] + set;
        }

        for i in 0..len {
            let lo = (i as i64 - anchor).max(0);
            let hi = (i as i64 - anchor + k - 1).min(len as i64 - 1);
            let v = if lo > hi {
                match op {
                    MorphOp::Erode => SET,
                    MorphOp::Dilate => CLEAR,
                }
            } else {
                let count = prefix[hi as usize + 1] - prefix[lo as usize];
                let inside = (hi - lo + 1) as u32;
                let hit = match op {
                    MorphOp::Erode => count == inside,
                    MorphOp::Dilate => count > 0,
                };
                if hit {
                    SET
                } else {
                    CLEAR
                }
            };
            let (x, y) = at(i);
            out.put_pixel(x, y, Luma([v]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> GrayImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let mut m = GrayImage::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    m.put_pixel(x as u32, y as u32, Luma([SET]));
                }
            }
        }
        m
    }

    fn rows_of(mask: &GrayImage) -> Vec<String> {
        (0..mask.height())
            .map(|y| {
                (0..mask.width())
                    .map(|x| if mask.get_pixel(x, y)[0] == SET { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn thresholds_split_at_level() {
        let mut g = GrayImage::new(3, 1);
        g.put_pixel(0, 0, Luma([127]));
        g.put_pixel(1, 0, Luma([128]));
        g.put_pixel(2, 0, Luma([255]));
        assert_eq!(threshold_at_or_below(&g, 127).as_raw(), &vec![255, 0, 0]);
        assert_eq!(threshold_above(&g, 127).as_raw(), &vec![0, 255, 255]);
    }

    #[test]
    fn even_kernel_erosion_uses_left_anchor() {
        // k=2, anchor=1: window is [x-1, x].
        let m = mask_from_rows(&["..###.."]);
        let e = erode_rect(&m, 2, 1, 1);
        assert_eq!(rows_of(&e), vec!["...##.."]);
    }

    #[test]
    fn erosion_keeps_foreground_touching_border() {
        let m = mask_from_rows(&["###....", "###....", "###...."]);
        let e = erode_rect(&m, 3, 3, 1);
        assert_eq!(rows_of(&e), vec!["##.....", "##.....", "##....."]);
    }

    #[test]
    fn opening_removes_thin_features() {
        let m = mask_from_rows(&[
            "..........",
            ".#####....",
            ".#####..#.",
            ".#####....",
            "..........",
        ]);
        let o = open_rect(&m, 3, 3, 1);
        assert_eq!(o.get_pixel(8, 2)[0], CLEAR);
        assert_eq!(o.get_pixel(3, 2)[0], SET);
        assert_eq!(count_set(&o), 15);
    }

    #[test]
    fn closing_fills_short_gaps() {
        let m = mask_from_rows(&["##.##"]);
        let c = close_rect(&m, 3, 1, 1);
        assert_eq!(rows_of(&c), vec!["#####"]);
    }

    #[test]
    fn vertical_opening_keeps_only_long_columns() {
        let mut m = GrayImage::new(5, 20);
        for y in 0..20 {
            m.put_pixel(1, y, Luma([SET]));
        }
        for y in 5..8 {
            m.put_pixel(3, y, Luma([SET]));
        }
        let o = open_rect(&m, 1, 6, 2);
        assert_eq!(count_set(&o), 20);
        assert!((0..20).all(|y| o.get_pixel(1, y)[0] == SET));
    }

    #[test]
    fn border_clear_and_mask_and() {
        let mut m = GrayImage::from_pixel(6, 6, Luma([SET]));
        clear_border(&mut m, 2);
        assert_eq!(count_set(&m), 4);
        let mut n = GrayImage::new(6, 6);
        n.put_pixel(2, 2, Luma([SET]));
        n.put_pixel(0, 0, Luma([SET]));
        assert_eq!(count_set(&mask_and(&m, &n)), 1);
    }
}
