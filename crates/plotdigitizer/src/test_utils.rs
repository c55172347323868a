//! Shared synthetic images for unit tests.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// White canvas with one full-length vertical and one full-length
/// horizontal black line of thickness `t`, crossing with top-left at `at`.
pub(crate) fn draw_cross(w: u32, h: u32, at: (i32, i32), t: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, PAPER);
    draw_filled_rect_mut(&mut img, Rect::at(at.0, 0).of_size(t, h), INK);
    draw_filled_rect_mut(&mut img, Rect::at(0, at.1).of_size(w, t), INK);
    img
}

/// White canvas with a rectangular black frame. Line top-left corners sit
/// at `tl` and `br`; each line is `t` pixels thick.
pub(crate) fn draw_frame(w: u32, h: u32, tl: (i32, i32), br: (i32, i32), t: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, PAPER);
    let span_x = (br.0 - tl.0) as u32 + t;
    let span_y = (br.1 - tl.1) as u32 + t;
    draw_filled_rect_mut(&mut img, Rect::at(tl.0, tl.1).of_size(span_x, t), INK);
    draw_filled_rect_mut(&mut img, Rect::at(tl.0, br.1).of_size(span_x, t), INK);
    draw_filled_rect_mut(&mut img, Rect::at(tl.0, tl.1).of_size(t, span_y), INK);
    draw_filled_rect_mut(&mut img, Rect::at(br.0, tl.1).of_size(t, span_y), INK);
    img
}

/// Square-cell grid rotated `angle_deg` counterclockwise about the image
/// center, rendered analytically (no resampling).
///
/// Lines are 3 px wide with 60 px spacing and are confined to a disc so
/// that every line stays long after rotation.
pub(crate) fn draw_grid(w: u32, h: u32, angle_deg: f64) -> GrayImage {
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = cx.min(cy) - 10.0;
    let (s, c) = angle_deg.to_radians().sin_cos();
    let spacing = 60.0;
    let half_width = 1.5;

    let near_line = |v: f64| {
        let r = v.rem_euclid(spacing);
        r.min(spacing - r) <= half_width
    };

    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        if dx.hypot(dy) > radius {
            return PAPER;
        }
        // Undo the counterclockwise on-screen rotation (y points down).
        let u = dx * c - dy * s;
        let v = dx * s + dy * c;
        if near_line(u) || near_line(v) {
            INK
        } else {
            PAPER
        }
    })
}
