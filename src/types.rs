// Core types shared by the painting pipeline.

use image::{Rgba, RgbaImage};

/// A raster of packed `0xAARRGGBB` pixels.
/// minifb ignores the top byte, so a frame can be presented as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // pixels per row
    pub height: usize,     // number of rows
    pub pixels: Vec<u32>,  // length = width * height
}

impl FrameBuffer {
    /// A fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, argb: u32) -> Self {
        Self { width, height, pixels: vec![argb; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Copy into an `image` buffer (straight alpha) for encoding.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            let (a, r, g, b) = unpack(px);
            Rgba([r, g, b, a])
        })
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| pack(p[3], p[0], p[1], p[2])).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }
}

#[inline]
pub fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split `0xAARRGGBB` into `(a, r, g, b)`.
#[inline]
pub fn unpack(px: u32) -> (u8, u8, u8, u8) {
    ((px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8)
}

pub const WHITE: u32 = 0xFF_FF_FF_FF;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Photometric negative of every channel.
    pub fn inverted(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

/// Paint color plus the fixed alpha it is laid down with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePaint {
    pub color: Rgb,
    pub alpha: u8,
}

impl ActivePaint {
    pub fn argb(&self) -> u32 {
        pack(self.alpha, self.color.r, self.color.g, self.color.b)
    }
}

/// Integer rectangle with exclusive right/bottom edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Half-open containment; an empty rectangle contains nothing.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// One position reported by the pointer device, in display space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Down(PointerSample),
    /// `history` holds the interpolated samples delivered before `current`, oldest first.
    Move { history: Vec<PointerSample>, current: PointerSample },
    Up(PointerSample),
}
