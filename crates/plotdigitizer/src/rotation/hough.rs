//! Progressive probabilistic Hough transform for line segments.
//!
//! Edge pixels are visited in random order. Each visit votes in a
//! `(θ, ρ)` accumulator; once a bin reaches the threshold, the line through
//! the current pixel is walked in both directions over the edge mask
//! (tolerating gaps up to `max_gap`). Walked pixels are removed from the
//! mask, and for accepted segments their votes are withdrawn, so each
//! stroke yields at most one segment.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PixelPoint;

const SHIFT: i32 = 16;

/// Parameters of [`probabilistic_hough`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Distance resolution in pixels.
    pub rho: f64,
    /// Angle resolution in radians.
    pub theta: f64,
    /// Minimum accumulator votes.
    pub threshold: u32,
    /// Minimum segment extent along x or y.
    pub min_line_length: u32,
    /// Largest run of missing pixels bridged while walking.
    pub max_line_gap: u32,
    /// Seed for the visiting order.
    pub seed: u64,
}

/// Detected segment with integer end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        let dx = (self.end.x - self.start.x) as f64;
        let dy = (self.end.y - self.start.y) as f64;
        dx.hypot(dy)
    }

    /// Direction in degrees, counterclockwise positive on screen.
    pub fn angle_deg(&self) -> f64 {
        let dx = (self.end.x - self.start.x) as f64;
        let dy = (self.end.y - self.start.y) as f64;
        (-dy).atan2(dx).to_degrees()
    }
}

fn round_i32(v: f64) -> i32 {
    v.round_ties_even() as i32
}

/// Find line segments among the set pixels of `edges`.
pub fn probabilistic_hough(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (width, height) = (edges.width() as i32, edges.height() as i32);
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let irho = 1.0 / params.rho;
    let num_angle = (std::f64::consts::PI / params.theta).round().max(1.0) as usize;
    let num_rho = (((width + height) * 2 + 1) as f64 / params.rho).round() as usize;
    let rho_offset = (num_rho as i32 - 1) / 2;
    let threshold = params.threshold as i32;
    let line_gap = params.max_line_gap as i32;
    let line_length = params.min_line_length as i32;

    let trig: Vec<(f64, f64)> = (0..num_angle)
        .map(|n| {
            let a = n as f64 * params.theta;
            (a.cos() * irho, a.sin() * irho)
        })
        .collect();

    let mut accum = vec![0i32; num_angle * num_rho];
    let mut mask = vec![false; (width * height) as usize];
    let mut points = Vec::new();
    for (x, y, p) in edges.enumerate_pixels() {
        if p[0] != 0 {
            mask[(y as i32 * width + x as i32) as usize] = true;
            points.push((x as i32, y as i32));
        }
    }

    let bin = |n: usize, x: i32, y: i32| -> usize {
        let (c, s) = trig[n];
        let r = round_i32(x as f64 * c + y as f64 * s) + rho_offset;
        n * num_rho + r as usize
    };

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut segments = Vec::new();
    let mut count = points.len();

    while count > 0 {
        let idx = rng.gen_range(0..count);
        let (px, py) = points[idx];
        points[idx] = points[count - 1];
        count -= 1;

        if !mask[(py * width + px) as usize] {
            continue;
        }

        let mut max_val = threshold - 1;
        let mut max_n = 0usize;
        for n in 0..num_angle {
            let b = bin(n, px, py);
            accum[b] += 1;
            if accum[b] > max_val {
                max_val = accum[b];
                max_n = n;
            }
        }
        if max_val < threshold {
            continue;
        }

        // Walk along the line normal to the winning (θ) direction.
        let a = -trig[max_n].1;
        let b = trig[max_n].0;
        let (mut x0, mut y0) = (px, py);
        let (dx0, dy0, x_major) = if a.abs() > b.abs() {
            let dy0 = round_i32(b * (1 << SHIFT) as f64 / a.abs());
            y0 = (y0 << SHIFT) + (1 << (SHIFT - 1));
            (if a > 0.0 { 1 } else { -1 }, dy0, true)
        } else {
            let dx0 = round_i32(a * (1 << SHIFT) as f64 / b.abs());
            x0 = (x0 << SHIFT) + (1 << (SHIFT - 1));
            (dx0, if b > 0.0 { 1 } else { -1 }, false)
        };
        let to_pixel = |x: i32, y: i32| -> (i32, i32) {
            if x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            }
        };

        let mut line_end = [(px, py); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            let mut gap = 0;
            loop {
                let (j, i) = to_pixel(x, y);
                if j < 0 || j >= width || i < 0 || i >= height {
                    break;
                }
                if mask[(i * width + j) as usize] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > line_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= line_length
            || (line_end[1].1 - line_end[0].1).abs() >= line_length;

        for (k, &end) in line_end.iter().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            loop {
                let (j, i) = to_pixel(x, y);
                if j < 0 || j >= width || i < 0 || i >= height {
                    break;
                }
                let m = (i * width + j) as usize;
                if mask[m] {
                    if good_line {
                        for n in 0..num_angle {
                            accum[bin(n, j, i)] -= 1;
                        }
                    }
                    mask[m] = false;
                }
                if (j, i) == end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            segments.push(LineSegment {
                start: PixelPoint::new(line_end[0].0, line_end[0].1),
                end: PixelPoint::new(line_end[1].0, line_end[1].1),
            });
        }
    }

    segments
}
