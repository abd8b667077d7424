// Brush engine: one shape instance per call.
// Each brush kind is its own type implementing `Brush`; `BrushKind`
// is the closed set the stroke controller switches between. Adding a kind
// means adding a type and a variant, nothing else.

use enum_dispatch::enum_dispatch;
use log::trace;
use rand::{Rng, RngCore};

use crate::draw::{draw_glyph, fill_circle, fill_rotated_square};
use crate::types::{ActivePaint, FrameBuffer};

/// Circle radius per unit of pointer speed.
pub const CIRCLE_RADIUS_PER_SPEED: f32 = 10.0;
/// Width of the circle's center jitter window per unit of speed.
pub const CIRCLE_JITTER_PER_SPEED: f32 = 5.0;
/// Squares are 100x100.
pub const SQUARE_HALF_EXTENT: f32 = 50.0;
/// Pixels per font cell; a 5x7 letter comes out 50x70.
pub const LETTER_CELL: i32 = 10;
/// Letters keep one historical sample in four.
pub const LETTER_HISTORY_STRIDE: usize = 4;

/// Scalars carried from one sample to the next within a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushState {
    /// Previous sample, truncated to whole display pixels.
    pub last_point: Option<(i32, i32)>,
    /// Distance between the last two samples.
    pub speed: f32,
    /// Square orientation in degrees, always in `0..360`.
    pub rotation: u16,
}

impl Default for BrushState {
    fn default() -> Self {
        Self { last_point: None, speed: 0.0, rotation: 0 }
    }
}

/// Renders one shape instance at a canvas-space point.
#[enum_dispatch]
pub trait Brush {
    fn name(&self) -> &'static str;

    /// Whether the stroke controller should measure speed for this brush.
    fn tracks_speed(&self) -> bool {
        false
    }

    /// Render every `n`th interpolated sample of a move event.
    fn history_stride(&self) -> usize {
        1
    }

    fn render(
        &self,
        surface: &mut FrameBuffer,
        x: f32,
        y: f32,
        paint: &ActivePaint,
        state: &mut BrushState,
        rng: &mut dyn RngCore,
    );
}

/// Speed-sized disc with a jittered center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CircleBrush;

impl CircleBrush {
    pub fn radius(speed: f32) -> f32 {
        CIRCLE_RADIUS_PER_SPEED * speed
    }

    /// Independent offsets per axis, uniform in `±speed * 2.5`.
    pub fn jitter(speed: f32, rng: &mut dyn RngCore) -> (f32, f32) {
        let dx = (rng.r#gen::<f32>() - 0.5) * speed * CIRCLE_JITTER_PER_SPEED;
        let dy = (rng.r#gen::<f32>() - 0.5) * speed * CIRCLE_JITTER_PER_SPEED;
        (dx, dy)
    }
}

impl Brush for CircleBrush {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn tracks_speed(&self) -> bool {
        true
    }

    fn render(
        &self,
        surface: &mut FrameBuffer,
        x: f32,
        y: f32,
        paint: &ActivePaint,
        state: &mut BrushState,
        rng: &mut dyn RngCore,
    ) {
        let radius = Self::radius(state.speed);
        let (dx, dy) = Self::jitter(state.speed, rng);
        trace!("circle r={radius:.1} at ({:.1}, {:.1})", x + dx, y + dy);
        fill_circle(surface, x + dx, y + dy, radius, paint.argb());
    }
}

/// 100x100 square that turns one degree per instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SquareBrush;

impl Brush for SquareBrush {
    fn name(&self) -> &'static str {
        "square"
    }

    fn render(
        &self,
        surface: &mut FrameBuffer,
        x: f32,
        y: f32,
        paint: &ActivePaint,
        state: &mut BrushState,
        _rng: &mut dyn RngCore,
    ) {
        trace!("square {}deg at ({x:.1}, {y:.1})", state.rotation);
        fill_rotated_square(surface, x, y, SQUARE_HALF_EXTENT, state.rotation as f32, paint.argb());
        state.rotation = (state.rotation + 1) % 360;
    }
}

/// Random uppercase letter standing on the sample point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LetterBrush;

impl LetterBrush {
    pub fn pick(rng: &mut dyn RngCore) -> char {
        (b'A' + rng.gen_range(0..26u8)) as char
    }
}

impl Brush for LetterBrush {
    fn name(&self) -> &'static str {
        "letter"
    }

    fn history_stride(&self) -> usize {
        LETTER_HISTORY_STRIDE
    }

    fn render(
        &self,
        surface: &mut FrameBuffer,
        x: f32,
        y: f32,
        paint: &ActivePaint,
        _state: &mut BrushState,
        rng: &mut dyn RngCore,
    ) {
        let ch = Self::pick(rng);
        trace!("letter {ch} at ({x:.1}, {y:.1})");
        draw_glyph(surface, x.round() as i32, y.round() as i32, ch, LETTER_CELL, paint.argb());
    }
}

#[enum_dispatch(Brush)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushKind {
    Circle(CircleBrush),
    Square(SquareBrush),
    Letter(LetterBrush),
}

impl Default for BrushKind {
    fn default() -> Self {
        BrushKind::Square(SquareBrush)
    }
}
