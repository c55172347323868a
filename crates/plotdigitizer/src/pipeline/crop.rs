//! Cropping to the located plot frame.

use image::{imageops, ImageBuffer, Pixel};

use crate::corners::PlotCorners;

/// Half-open crop window `[x0, x1) × [y0, y1)` in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropWindow {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

/// Window between the two corners, shrunk inward by `margin` pixels and
/// clamped to the image. `None` when a corner is missing or the window is
/// empty.
pub fn crop_window(
    corners: &PlotCorners,
    margin: i32,
    width: u32,
    height: u32,
) -> Option<CropWindow> {
    let (o, tr) = (corners.origin?, corners.top_right?);
    let (ox, oy) = (o.x + margin, o.y - margin);
    let (tx, ty) = (tr.x - margin, tr.y + margin);

    let clamp = |v: i32, hi: u32| v.clamp(0, hi as i32) as u32;
    let window = CropWindow {
        x0: clamp(ox.min(tx), width),
        x1: clamp(ox.max(tx), width),
        y0: clamp(oy.min(ty), height),
        y1: clamp(oy.max(ty), height),
    };
    (window.x1 > window.x0 && window.y1 > window.y0).then_some(window)
}

/// Copy out the window.
pub fn crop_image<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    w: CropWindow,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
{
    imageops::crop_imm(img, w.x0, w.y0, w.width(), w.height()).to_image()
}

/// Crop only when the window keeps at least `min_area_ratio` of the image.
///
/// Returns `None` when the crop is degenerate or too small; the caller then
/// keeps the full image.
pub fn guarded_crop_window(
    corners: &PlotCorners,
    margin: i32,
    dims: (u32, u32),
    min_area_ratio: f64,
) -> Option<CropWindow> {
    let w = crop_window(corners, margin, dims.0, dims.1)?;
    let full = dims.0 as f64 * dims.1 as f64;
    let ratio = w.area() as f64 / full;
    if ratio >= min_area_ratio {
        Some(w)
    } else {
        tracing::warn!(ratio, min_area_ratio, "plot crop too small; keeping full image");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelPoint;
    use image::{GrayImage, Luma};

    fn corners(o: (i32, i32), t: (i32, i32)) -> PlotCorners {
        PlotCorners {
            origin: Some(PixelPoint::new(o.0, o.1)),
            top_right: Some(PixelPoint::new(t.0, t.1)),
        }
    }

    #[test]
    fn window_shrinks_by_margin() {
        let w = crop_window(&corners((60, 340), (560, 40)), 4, 600, 400).unwrap();
        assert_eq!(w, CropWindow { x0: 64, y0: 44, x1: 556, y1: 336 });
        assert_eq!((w.width(), w.height()), (492, 292));
    }

    #[test]
    fn degenerate_or_missing_corners_give_no_window() {
        // The margins meet in the middle and leave nothing.
        assert!(crop_window(&corners((50, 200), (58, 192)), 4, 300, 300).is_none());
        assert!(crop_window(&PlotCorners::default(), 4, 300, 300).is_none());
    }

    #[test]
    fn area_guard_rejects_small_crops() {
        let c = corners((60, 340), (560, 40));
        assert!(guarded_crop_window(&c, 4, (600, 400), 0.8).is_none());
        assert!(guarded_crop_window(&c, 4, (600, 400), 0.5).is_some());
    }

    #[test]
    fn crop_copies_window_pixels() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(3, 4, Luma([9]));
        let out = crop_image(&img, CropWindow { x0: 3, y0: 4, x1: 6, y1: 8 });
        assert_eq!(out.dimensions(), (3, 4));
        assert_eq!(out.get_pixel(0, 0)[0], 9);
    }
}
