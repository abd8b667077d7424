// Persistent stroke buffer.
// Strokes accumulate in an off-screen raster the size of the display area.
// Display and export never hand that raster out directly; they build a
// fresh composite each time.

use log::{debug, info};
use rand::RngCore;

use crate::brush::{Brush, BrushKind, BrushState};
use crate::draw::{composite_over, stroke_rect};
use crate::types::{ActivePaint, FrameBuffer, Rect, WHITE};

/// Outline around the paintable area on the live display: black, alpha 50.
pub const BORDER_COLOR: u32 = 0x32_00_00_00;

/// Outline `border` on a frame about to be presented. Never applied to
/// anything that is kept.
pub fn draw_border(screen: &mut FrameBuffer, border: &Rect) {
    stroke_rect(screen, border, BORDER_COLOR);
}

#[derive(Default)]
pub struct PaintingSurface {
    buffer: Option<FrameBuffer>,
    background_on: bool,
    dirty: bool,
}

impl PaintingSurface {
    /// Unallocated until the first layout calls [`PaintingSurface::on_resize`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Option<(usize, usize)> {
        self.buffer.as_ref().map(|b| (b.width, b.height))
    }

    pub fn buffer(&self) -> Option<&FrameBuffer> {
        self.buffer.as_ref()
    }

    /// Reallocate to the new display size. Whatever was on screen (`snapshot`)
    /// is copied into the new buffer at the origin, so earlier strokes and any
    /// background that was showing become part of the painting.
    pub fn on_resize(&mut self, width: usize, height: usize, snapshot: Option<&FrameBuffer>) {
        if width == 0 || height == 0 {
            debug!("surface resize to {width}x{height} ignored");
            return;
        }
        let mut next = FrameBuffer::new(width, height);
        if let Some(snap) = snapshot {
            let w = width.min(snap.width);
            for y in 0..height.min(snap.height) {
                next.pixels[y * width..y * width + w].copy_from_slice(&snap.pixels[y * snap.width..y * snap.width + w]);
            }
        }
        info!(
            "surface reallocated {:?} -> {width}x{height} (snapshot: {})",
            self.size(),
            snapshot.is_some()
        );
        self.buffer = Some(next);
        self.invalidate();
    }

    /// Paint everything white, dropping all strokes.
    pub fn clear(&mut self) {
        let Some(buf) = self.buffer.as_mut() else {
            debug!("clear before first layout ignored");
            return;
        };
        buf.pixels.fill(WHITE);
        info!("painting cleared");
        self.invalidate();
    }

    /// Draw one brush instance. Returns false while the buffer is unallocated.
    pub fn draw_shape(
        &mut self,
        brush: &BrushKind,
        x: f32,
        y: f32,
        paint: &ActivePaint,
        state: &mut BrushState,
        rng: &mut dyn RngCore,
    ) -> bool {
        let Some(buf) = self.buffer.as_mut() else {
            return false;
        };
        brush.render(buf, x, y, paint, state, rng);
        true
    }

    /// Flatten for export: the displayed source image (when asked for) under
    /// the strokes. `None` when there is no source image to compose against.
    pub fn compose(&self, background: Option<&FrameBuffer>, include_background: bool) -> Option<FrameBuffer> {
        let bg = background?;
        let (w, h) = self.size().unwrap_or((bg.width, bg.height));
        let mut out = FrameBuffer::new(w, h);
        if include_background {
            composite_over(&mut out, bg, 1.0);
        }
        if let Some(buf) = &self.buffer {
            composite_over(&mut out, buf, 1.0);
        }
        debug!("composed {w}x{h} (background: {include_background})");
        Some(out)
    }

    /// What the host shows this frame, before overlays: white, the source
    /// image if the background toggle is on, then the strokes. This is also
    /// the snapshot a later resize starts from.
    pub fn display_frame(&self, background: Option<&FrameBuffer>) -> Option<FrameBuffer> {
        let buf = self.buffer.as_ref()?;
        let mut out = FrameBuffer::filled(buf.width, buf.height, WHITE);
        if self.background_on {
            if let Some(bg) = background {
                composite_over(&mut out, bg, 1.0);
            }
        }
        composite_over(&mut out, buf, 1.0);
        Some(out)
    }

    pub fn background_on(&mut self) {
        self.background_on = true;
        self.invalidate();
    }

    pub fn background_off(&mut self) {
        self.background_on = false;
        self.invalidate();
    }

    pub fn is_background_on(&self) -> bool {
        self.background_on
    }

    /// Ask the host for a repaint.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Returns and resets the pending repaint request.
    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::SquareBrush;
    use crate::types::{unpack, Rgb};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RED: ActivePaint = ActivePaint { color: Rgb::new(255, 0, 0), alpha: 150 };

    #[test]
    fn starts_unallocated_and_guards_drawing() {
        let mut s = PaintingSurface::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BrushState::default();
        s.clear();
        assert!(!s.draw_shape(&BrushKind::default(), 1.0, 1.0, &RED, &mut state, &mut rng));
        assert_eq!(state.rotation, 0);
        assert!(s.display_frame(None).is_none());
        assert!(!s.take_invalidated());
    }

    #[test]
    fn clear_then_compose_is_uniform_white() {
        let mut s = PaintingSurface::new();
        s.on_resize(40, 30, None);
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BrushState::default();
        s.draw_shape(&BrushKind::from(SquareBrush), 20.0, 15.0, &RED, &mut state, &mut rng);
        s.clear();

        let bg = FrameBuffer::filled(40, 30, 0xFF_12_34_56);
        let out = s.compose(Some(&bg), false).unwrap();
        assert_eq!((out.width, out.height), (40, 30));
        assert!(out.pixels.iter().all(|p| *p == WHITE));
    }

    #[test]
    fn compose_needs_a_source_image() {
        let mut s = PaintingSurface::new();
        s.on_resize(10, 10, None);
        assert!(s.compose(None, true).is_none());
        assert!(s.compose(None, false).is_none());
    }

    #[test]
    fn compose_layers_strokes_over_background() {
        let mut s = PaintingSurface::new();
        s.on_resize(200, 200, None);
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = BrushState::default();
        s.draw_shape(&BrushKind::from(SquareBrush), 100.0, 100.0, &RED, &mut state, &mut rng);

        let bg = FrameBuffer::filled(200, 200, 0xFF_00_00_FF);
        let with = s.compose(Some(&bg), true).unwrap();
        let without = s.compose(Some(&bg), false).unwrap();

        // Outside the square: background or nothing.
        assert_eq!(with.get(5, 5), Some(0xFF_00_00_FF));
        assert_eq!(without.get(5, 5), Some(0));
        // Inside: red at alpha 150 over blue, or red alone.
        let (a, r, _, b) = unpack(with.get(100, 100).unwrap());
        assert_eq!(a, 255);
        assert!(r > 140 && b < 115 && b > 95, "r={r} b={b}");
        assert_eq!(without.get(100, 100), Some(RED.argb()));
    }

    #[test]
    fn background_toggle_only_changes_display() {
        let mut s = PaintingSurface::new();
        s.on_resize(4, 4, None);
        let bg = FrameBuffer::filled(4, 4, 0xFF_00_FF_00);

        let off = s.display_frame(Some(&bg)).unwrap();
        assert!(off.pixels.iter().all(|p| *p == WHITE));

        s.take_invalidated();
        s.background_on();
        assert!(s.take_invalidated());
        let on = s.display_frame(Some(&bg)).unwrap();
        assert!(on.pixels.iter().all(|p| *p == 0xFF_00_FF_00));
        assert_eq!(s.buffer().unwrap().pixels, vec![0; 16]);

        s.background_off();
        assert!(!s.is_background_on());
    }

    #[test]
    fn border_outlines_paintable_area_on_screen_only() {
        let mut s = PaintingSurface::new();
        s.on_resize(20, 20, None);
        let frame = s.display_frame(None).unwrap();
        assert!(frame.pixels.iter().all(|p| *p == WHITE));

        let mut screen = frame.clone();
        draw_border(&mut screen, &Rect::new(5, 5, 15, 15));
        assert_ne!(screen.get(5, 10), Some(WHITE));
        assert_eq!(screen.get(10, 10), Some(WHITE));
        assert_eq!(frame.get(5, 10), Some(WHITE));
        assert!(s.buffer().unwrap().pixels.iter().all(|p| *p == 0));
    }

    #[test]
    fn resize_does_not_bake_in_the_border() {
        let mut s = PaintingSurface::new();
        s.on_resize(400, 200, None);
        let border = Rect::new(100, 0, 300, 200);
        let shown = s.display_frame(None).unwrap();
        let mut screen = shown.clone();
        draw_border(&mut screen, &border);
        assert_ne!(screen.get(100, 100), Some(WHITE));

        s.on_resize(800, 400, Some(&shown));
        assert_eq!(s.buffer().unwrap().get(100, 100), Some(WHITE));
        let bg = FrameBuffer::filled(800, 400, 0xFF_00_00_FF);
        assert_eq!(s.compose(Some(&bg), false).unwrap().get(100, 100), Some(WHITE));
    }

    #[test]
    fn resize_snapshots_what_was_displayed() {
        let mut s = PaintingSurface::new();
        s.on_resize(400, 200, None);
        let mut shown = FrameBuffer::filled(400, 200, WHITE);
        shown.pixels[10 * 400 + 10] = 0xFF_AA_BB_CC;

        s.on_resize(800, 400, Some(&shown));
        let buf = s.buffer().unwrap();
        assert_eq!((buf.width, buf.height), (800, 400));
        assert_eq!(buf.get(10, 10), Some(0xFF_AA_BB_CC));
        assert_eq!(buf.get(399, 199), Some(WHITE));
        assert_eq!(buf.get(400, 0), Some(0));
        assert_eq!(buf.get(0, 200), Some(0));
    }

    #[test]
    fn shrinking_crops_the_snapshot() {
        let mut s = PaintingSurface::new();
        let shown = FrameBuffer::filled(10, 10, 0xFF_01_02_03);
        s.on_resize(4, 3, Some(&shown));
        assert_eq!(s.buffer().unwrap().pixels, vec![0xFF_01_02_03; 12]);
    }
}
