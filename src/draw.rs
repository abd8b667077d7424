// Software drawing onto `0xAARRGGBB` frame buffers.
// Everything here clips against the buffer, so callers may hand in shapes
// that hang over the edges.

use crate::types::{pack, unpack, FrameBuffer, Rect};

/* ---------- Pixels ---------- */

/// Overwrite a pixel if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Source-over blend of `color` (straight alpha) scaled by `coverage` in [0,1].
#[inline]
pub fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let (a, r, g, b) = unpack(color);
    let sa = a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }

    let idx = y * fb.width + x;
    if sa >= 1.0 {
        fb.pixels[idx] = color | 0xFF_00_00_00;
        return;
    }

    let (da, dr, dg, db) = unpack(fb.pixels[idx]);
    let da = da as f32 / 255.0;
    let keep = da * (1.0 - sa);
    let out_a = sa + keep;

    let mix = |s: u8, d: u8| ((s as f32 * sa + d as f32 * keep) / out_a).round().clamp(0.0, 255.0) as u8;
    fb.pixels[idx] = pack(
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        mix(r, dr),
        mix(g, dg),
        mix(b, db),
    );
}

/// Blend `src` over `dst` pixel by pixel, anchored at the top-left corner.
/// `opacity` scales every source pixel's own alpha.
pub fn composite_over(dst: &mut FrameBuffer, src: &FrameBuffer, opacity: f32) {
    let w = dst.width.min(src.width);
    let h = dst.height.min(src.height);
    for y in 0..h {
        for x in 0..w {
            let px = src.pixels[y * src.width + x];
            if px >> 24 == 0 {
                continue;
            }
            blend_pixel(dst, x as i32, y as i32, px, opacity);
        }
    }
}

/* ---------- Brush shapes ---------- */

/// Filled, anti-aliased disc. Coverage falls off over one pixel at the rim.
pub fn fill_circle(fb: &mut FrameBuffer, cx: f32, cy: f32, radius: f32, color: u32) {
    if radius <= 0.0 {
        return;
    }
    let x0 = ((cx - radius - 1.0).floor() as i32).max(0);
    let y0 = ((cy - radius - 1.0).floor() as i32).max(0);
    let x1 = ((cx + radius + 1.0).ceil() as i32).min(fb.width as i32 - 1);
    let y1 = ((cy + radius + 1.0).ceil() as i32).min(fb.height as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_pixel(fb, x, y, color, coverage);
            }
        }
    }
}

/// Filled, anti-aliased square of half-side `half` centered at (cx,cy),
/// rotated clockwise (screen space, y down) by `degrees` about its center.
pub fn fill_rotated_square(fb: &mut FrameBuffer, cx: f32, cy: f32, half: f32, degrees: f32, color: u32) {
    if half <= 0.0 {
        return;
    }
    let (s, c) = degrees.to_radians().sin_cos();
    let reach = half * std::f32::consts::SQRT_2 + 1.0;

    let x0 = ((cx - reach).floor() as i32).max(0);
    let y0 = ((cy - reach).floor() as i32).max(0);
    let x1 = ((cx + reach).ceil() as i32).min(fb.width as i32 - 1);
    let y1 = ((cy + reach).ceil() as i32).min(fb.height as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            // Undo the rotation to land in the square's own frame.
            let lx = dx * c + dy * s;
            let ly = -dx * s + dy * c;
            let cov_x = (half + 0.5 - lx.abs()).clamp(0.0, 1.0);
            let cov_y = (half + 0.5 - ly.abs()).clamp(0.0, 1.0);
            let coverage = cov_x * cov_y;
            if coverage > 0.0 {
                blend_pixel(fb, x, y, color, coverage);
            }
        }
    }
}

/* ---------- Outlines and overlays ---------- */

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a small crosshair centered at (cx,cy), with a gap at the center.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/// Blend a 3px outline centered on the edges of `rect`. Each pixel is hit once.
pub fn stroke_rect(fb: &mut FrameBuffer, rect: &Rect, color: u32) {
    if rect.is_empty() {
        return;
    }
    let (l, t, r, b) = (rect.left, rect.top, rect.right - 1, rect.bottom - 1);
    for y in (t - 1)..=(b + 1) {
        for x in (l - 1)..=(r + 1) {
            let on_edge = (x - l).abs() <= 1 || (x - r).abs() <= 1 || (y - t).abs() <= 1 || (y - b).abs() <= 1;
            if on_edge {
                blend_pixel(fb, x, y, color, 1.0);
            }
        }
    }
}

/* ---------- 5x7 block letters ---------- */

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;

/// Return a 5x7 glyph bitmap for the uppercase Latin alphabet.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),
        _ => None,
    }
}

/// Draw one glyph with each font cell blown up to `cell` x `cell` pixels.
/// (x, baseline) is the bottom-left corner of the glyph box.
/// Returns false for characters the font does not cover.
pub fn draw_glyph(fb: &mut FrameBuffer, x: i32, baseline: i32, ch: char, cell: i32, color: u32) -> bool {
    let Some(rows) = glyph5x7(ch) else {
        return false;
    };
    let top = baseline - GLYPH_H * cell;
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..GLYPH_W {
            if (rowbits & (1 << (4 - rx))) == 0 {
                continue;
            }
            let px = x + rx * cell;
            let py = top + ry as i32 * cell;
            for yy in py..py + cell {
                for xx in px..px + cell {
                    blend_pixel(fb, xx, yy, color, 1.0);
                }
            }
        }
    }
    true
}
