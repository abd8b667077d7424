// Pointer events in, brush instances out.
// A stroke runs from pointer-down to pointer-up. Every sample updates the
// brush state; samples outside the displayed image are not drawn, so the
// user can drag off the image and back without lifting the pointer.

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::brush::{Brush, BrushKind, BrushState};
use crate::mapper::display_to_image;
use crate::sampler::sample_color;
use crate::surface::PaintingSurface;
use crate::types::{ActivePaint, PointerEvent, PointerSample, Rect};
use crate::view::ImageLayout;

/// Speed a stroke starts with. Zero would collapse speed-sized brushes.
pub const INITIAL_SPEED: f32 = 2.0;
/// Alpha every sampled color is laid down with.
pub const DEFAULT_ALPHA: u8 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokePhase {
    Idle,
    Stroking,
}

/// Result of one pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventOutcome {
    /// Always true: strokes consume every event, in bounds or not.
    pub handled: bool,
    /// The stroke buffer changed and should be repainted.
    pub redraw: bool,
}

pub struct StrokeController {
    brush: BrushKind,
    invert: bool,
    alpha: u8,
    phase: StrokePhase,
    state: BrushState,
    paint: Option<ActivePaint>,
    rng: StdRng,
}

impl Default for StrokeController {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StrokeController {
    /// `seed` fixes the brush randomness; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            brush: BrushKind::default(),
            invert: false,
            alpha: DEFAULT_ALPHA,
            phase: StrokePhase::Idle,
            state: BrushState::default(),
            paint: None,
            rng,
        }
    }

    pub fn brush(&self) -> BrushKind {
        self.brush
    }

    pub fn set_brush(&mut self, brush: BrushKind) {
        info!("brush: {}", brush.name());
        self.brush = brush;
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Flip color inversion; returns the new setting.
    pub fn toggle_invert(&mut self) -> bool {
        self.invert = !self.invert;
        info!("color inversion: {}", self.invert);
        self.invert
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn state(&self) -> &BrushState {
        &self.state
    }

    /// Color of the most recent sample, if anything has been sampled yet.
    pub fn active_paint(&self) -> Option<ActivePaint> {
        self.paint
    }

    pub fn handle(&mut self, event: &PointerEvent, layout: &ImageLayout<'_>, surface: &mut PaintingSurface) -> EventOutcome {
        // Recomputed per event: the layout can change between events.
        let rect = layout.rect();
        let drew = match event {
            PointerEvent::Down(p) => {
                self.phase = StrokePhase::Stroking;
                self.state = BrushState {
                    last_point: Some(truncate(p)),
                    speed: INITIAL_SPEED,
                    rotation: 0,
                };
                debug!("stroke start at ({:.1}, {:.1}) with {}", p.x, p.y, self.brush.name());
                self.paint_at(p, layout, &rect, surface)
            }
            PointerEvent::Move { history, current } => {
                if self.phase == StrokePhase::Idle {
                    trace!("move without a stroke ignored");
                    false
                } else {
                    let stride = self.brush.history_stride().max(1);
                    let mut drew = false;
                    for p in history.iter().step_by(stride) {
                        self.advance(p);
                        drew |= self.paint_at(p, layout, &rect, surface);
                    }
                    self.advance(current);
                    drew |= self.paint_at(current, layout, &rect, surface);
                    drew
                }
            }
            PointerEvent::Up(_) => {
                if self.phase == StrokePhase::Stroking {
                    debug!("stroke end");
                }
                self.phase = StrokePhase::Idle;
                false
            }
        };

        if drew {
            surface.invalidate();
        }
        EventOutcome { handled: true, redraw: drew }
    }

    /// Move the stroke forward to `p`, measuring speed when the brush uses it.
    fn advance(&mut self, p: &PointerSample) {
        if self.brush.tracks_speed() {
            if let Some((lx, ly)) = self.state.last_point {
                self.state.speed = (lx as f32 - p.x).hypot(ly as f32 - p.y);
            }
        }
        self.state.last_point = Some(truncate(p));
    }

    /// Sample and draw at `p` if it lies on the image. Returns whether anything was drawn.
    fn paint_at(&mut self, p: &PointerSample, layout: &ImageLayout<'_>, rect: &Rect, surface: &mut PaintingSurface) -> bool {
        let (Some(image), Some(transform)) = (layout.image, layout.transform.as_ref()) else {
            return false;
        };
        let Some((ix, iy)) = display_to_image(rect, transform, image.dimensions(), p.x, p.y) else {
            return false;
        };

        let paint = ActivePaint {
            color: sample_color(image, ix, iy, self.invert),
            alpha: self.alpha,
        };
        self.paint = Some(paint);
        surface.draw_shape(&self.brush, p.x, p.y, &paint, &mut self.state, &mut self.rng)
    }
}

#[inline]
fn truncate(p: &PointerSample) -> (i32, i32) {
    (p.x as i32, p.y as i32)
}
