// Color picking from the source image.

use crate::types::Rgb;
use image::{RgbImage, RgbaImage};

/// Read-only pixel grid the painting samples from.
/// The application owns the image; the painting core only borrows it.
pub trait SourceImage {
    /// Intrinsic `(width, height)` in image pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Color of the pixel at `(x, y)`. Callers keep `x < width`, `y < height`.
    fn rgb_at(&self, x: u32, y: u32) -> Rgb;
}

impl SourceImage for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn rgb_at(&self, x: u32, y: u32) -> Rgb {
        let p = self.get_pixel(x, y);
        Rgb::new(p[0], p[1], p[2])
    }
}

impl SourceImage for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn rgb_at(&self, x: u32, y: u32) -> Rgb {
        let p = self.get_pixel(x, y);
        Rgb::new(p[0], p[1], p[2])
    }
}

/// RGB at an image-space point, optionally inverted (`c -> 255 - c`).
/// Alpha is not sampled; the caller applies its configured alpha.
pub fn sample_color(image: &dyn SourceImage, x: u32, y: u32, invert: bool) -> Rgb {
    debug_assert!({
        let (w, h) = image.dimensions();
        x < w && y < h
    });
    let rgb = image.rgb_at(x, y);
    if invert { rgb.inverted() } else { rgb }
}
