use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use plotdigitizer::color::isolate_color;
use plotdigitizer::corners::locate_plot_corners;
use plotdigitizer::curve::{extract_curve_points, order_curve_points};
use plotdigitizer::rotation::estimate_rotation;
use plotdigitizer::{
    ColorIsolationConfig, ColorSpec, CornerConfig, CurveConfig, NullSink, PixelPoint,
    RotationConfig,
};

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// Framed chart with a dense light grid, like a typical measurement plot.
fn make_chart_fixture(w: u32, h: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, PAPER);
    let (x0, y0) = (w as i32 / 10, h as i32 / 10);
    let (x1, y1) = (w as i32 * 9 / 10, h as i32 * 9 / 10);
    let grid = Luma([200u8]);
    for gx in (x0..x1).step_by(40) {
        draw_filled_rect_mut(&mut img, Rect::at(gx, y0).of_size(1, (y1 - y0) as u32), grid);
    }
    for gy in (y0..y1).step_by(40) {
        draw_filled_rect_mut(&mut img, Rect::at(x0, gy).of_size((x1 - x0) as u32, 1), grid);
    }
    let (fw, fh) = ((x1 - x0) as u32 + 3, (y1 - y0) as u32 + 3);
    draw_filled_rect_mut(&mut img, Rect::at(x0, y0).of_size(fw, 3), INK);
    draw_filled_rect_mut(&mut img, Rect::at(x0, y1).of_size(fw, 3), INK);
    draw_filled_rect_mut(&mut img, Rect::at(x0, y0).of_size(3, fh), INK);
    draw_filled_rect_mut(&mut img, Rect::at(x1, y0).of_size(3, fh), INK);
    img
}

/// Noisy random-walk trace in blue over a white background.
fn make_trace_fixture(w: u32, h: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));
    let mut y = h as i32 / 2;
    for x in 8..w as i32 - 8 {
        y = (y + rng.gen_range(-3..=3)).clamp(16, h as i32 - 16);
        draw_filled_rect_mut(&mut img, Rect::at(x, y - 1).of_size(1, 3), Rgb([20, 40, 230]));
    }
    img
}

fn make_vertex_fixture(n: usize, seed: u64) -> Vec<PixelPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| PixelPoint::new(rng.gen_range(0..1200), rng.gen_range(0..600)))
        .collect()
}

fn bench_corners(c: &mut Criterion) {
    let cfg = CornerConfig::default();
    let img = make_chart_fixture(1280, 960);

    c.bench_function("corners_1280x960", |b| {
        b.iter(|| {
            let corners = locate_plot_corners(black_box(&img), black_box(&cfg), &mut NullSink);
            black_box(corners.origin)
        })
    });
}

fn bench_rotation(c: &mut Criterion) {
    let cfg = RotationConfig {
        correct_rotation: true,
        ..RotationConfig::default()
    };
    let img = make_chart_fixture(1280, 960);

    c.bench_function("rotation_estimate_1280x960", |b| {
        b.iter(|| black_box(estimate_rotation(black_box(&img), black_box(&cfg), &mut NullSink)))
    });
}

fn bench_isolate(c: &mut Criterion) {
    let cfg = ColorIsolationConfig::default();
    let target = ColorSpec::parse("blue").expect("named color");
    let img = make_trace_fixture(1280, 960, 11);

    c.bench_function("isolate_blue_1280x960", |b| {
        b.iter(|| black_box(isolate_color(black_box(&img), black_box(&target), black_box(&cfg))))
    });
}

fn bench_curve(c: &mut Criterion) {
    let cfg = CurveConfig::default();
    let gray = image::imageops::grayscale(&make_trace_fixture(1280, 960, 13));

    c.bench_function("curve_extract_1280x960", |b| {
        b.iter(|| {
            let points = extract_curve_points(black_box(&gray), black_box(&cfg), &mut NullSink);
            black_box(points.len())
        })
    });
}

fn bench_ordering(c: &mut Criterion) {
    let points = make_vertex_fixture(4000, 17);

    c.bench_function("order_points_4000", |b| {
        b.iter(|| {
            let ordered = order_curve_points(black_box(&points));
            black_box(ordered.len())
        })
    });
}

criterion_group!(
    hotpaths,
    bench_corners,
    bench_rotation,
    bench_isolate,
    bench_curve,
    bench_ordering
);
criterion_main!(hotpaths);
