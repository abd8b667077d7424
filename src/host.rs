// Window glue: a minifb window hosting the image view and the painting surface.
// Mouse input becomes pointer events; key presses flip the painting settings.
//
// Keys: 1/2/3 pick Circle/Square/Letter, I inverts colors, B shows the image
// under the painting, C clears, S exports with the image, E exports strokes only,
// ESC quits.

use log::{error, info, warn};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::path::Path;

use crate::brush::{Brush, CircleBrush, LetterBrush, SquareBrush};
use crate::config::Args;
use crate::draw::draw_crosshair;
use crate::error::Error;
use crate::stroke::StrokeController;
use crate::surface::{draw_border, PaintingSurface};
use crate::types::{FrameBuffer, PointerEvent, PointerSample};
use crate::view::ImageView;

/// Spacing of the samples filled in between two polled mouse positions.
pub const HISTORY_SPACING: f32 = 4.0;

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create a resizable window of the requested size.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client-area size.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in window pixels (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Clamp)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

/// Points strictly between `from` and `to`, about `spacing` apart.
/// Stands in for the batched samples a touch screen would deliver.
pub fn interpolate_history(from: PointerSample, to: PointerSample, spacing: f32) -> Vec<PointerSample> {
    let dist = (to.x - from.x).hypot(to.y - from.y);
    if spacing <= 0.0 || dist <= spacing {
        return Vec::new();
    }
    let steps = (dist / spacing).ceil() as usize;
    (1..steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            PointerSample::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
        })
        .collect()
}

/// Turns polled button state into down/move/up events.
#[derive(Default)]
pub struct PointerTracker {
    last: Option<PointerSample>,
    down: bool,
}

impl PointerTracker {
    pub fn update(&mut self, pressed: bool, pos: Option<(f32, f32)>) -> Option<PointerEvent> {
        let pos = pos.map(|(x, y)| PointerSample::new(x, y));
        let event = match (self.down, pressed, pos) {
            (false, true, Some(p)) => Some(PointerEvent::Down(p)),
            (true, true, Some(p)) => match self.last {
                Some(prev) if prev == p => None,
                Some(prev) => Some(PointerEvent::Move { history: interpolate_history(prev, p, HISTORY_SPACING), current: p }),
                None => Some(PointerEvent::Move { history: Vec::new(), current: p }),
            },
            (true, false, _) => Some(PointerEvent::Up(pos.or(self.last).unwrap_or(PointerSample::new(0.0, 0.0)))),
            _ => None,
        };
        if pos.is_some() {
            self.last = pos;
        }
        // A press with no known position cannot start a stroke.
        self.down = pressed && (self.down || pos.is_some());
        event
    }
}

fn export(surface: &PaintingSurface, view: &ImageView, path: &Path, with_background: bool) -> Result<(), Error> {
    let Some(frame) = surface.compose(view.rendering(), with_background) else {
        warn!("nothing to export: no source image");
        return Ok(());
    };
    frame
        .to_rgba_image()
        .save(path)
        .map_err(|source| Error::ImageExport { path: path.to_path_buf(), source })?;
    info!("exported {}x{} to {}", frame.width, frame.height, path.display());
    Ok(())
}

/// Export from the main loop. A failed write is logged and the painting stays open.
fn export_or_log(surface: &PaintingSurface, view: &ImageView, path: &Path, with_background: bool) -> bool {
    match export(surface, view, path, with_background) {
        Ok(()) => true,
        Err(e) => {
            error!("{e}");
            false
        }
    }
}

fn status_title(controller: &StrokeController, surface: &PaintingSurface) -> String {
    format!(
        "Impressionist | brush: {} | invert: {} | background: {}",
        controller.brush().name(),
        if controller.invert() { "on" } else { "off" },
        if surface.is_background_on() { "on" } else { "off" },
    )
}

pub fn run(args: Args) -> Result<(), Error> {
    args.validate()?;

    /* --- Source image ---
       The view shows it fit-centered; strokes sample their colors from it. */
    let image = image::open(&args.image)
        .map_err(|source| Error::ImageLoad { path: args.image.clone(), source })?
        .into_rgba8();
    info!("loaded {} ({}x{})", args.image.display(), image.width(), image.height());
    let mut view = ImageView::new();
    view.set_image(Some(image));

    /* --- Painting state --- */
    let mut surface = PaintingSurface::new();
    let mut controller = StrokeController::new(args.seed);
    controller.set_brush(args.brush.into());
    controller.set_invert(args.invert);
    controller.set_alpha(args.alpha);
    if args.background {
        surface.background_on();
    }

    let mut drawer = Drawer::new("Impressionist", args.width, args.height)?;
    let mut pointer = PointerTracker::default();
    let mut shown: Option<FrameBuffer> = None; // last composed display frame, without overlays
    let mut title = String::new();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Layout: a new window size reallocates the surface from what was on screen. */
        let (w, h) = drawer.size();
        if w > 0 && h > 0 && surface.size() != Some((w, h)) {
            view.layout(w as u32, h as u32);
            surface.on_resize(w, h, shown.as_ref());
        }

        /* 2) Settings */
        if drawer.pressed_once(Key::Key1) { controller.set_brush(CircleBrush.into()); }
        if drawer.pressed_once(Key::Key2) { controller.set_brush(SquareBrush.into()); }
        if drawer.pressed_once(Key::Key3) { controller.set_brush(LetterBrush.into()); }
        if drawer.pressed_once(Key::I) { controller.toggle_invert(); }
        if drawer.pressed_once(Key::B) {
            if surface.is_background_on() { surface.background_off(); } else { surface.background_on(); }
        }
        if drawer.pressed_once(Key::C) { surface.clear(); }
        if drawer.pressed_once(Key::S) { export_or_log(&surface, &view, &args.export_path(true), true); }
        if drawer.pressed_once(Key::E) { export_or_log(&surface, &view, &args.export_path(false), false); }

        /* 3) Pointer */
        let mouse = drawer.mouse_pos();
        if let Some(event) = pointer.update(drawer.left_mouse_down(), mouse) {
            controller.handle(&event, &view.as_layout(), &mut surface);
        }

        /* 4) Recompose only when something asked for a repaint. */
        if surface.take_invalidated() || shown.is_none() {
            shown = surface.display_frame(view.rendering());
        }

        /* 5) Present with the border and crosshair on top. */
        let Some(frame) = shown.as_ref() else {
            drawer.present(&FrameBuffer::new(w.max(1), h.max(1)))?;
            continue;
        };
        let mut screen = frame.clone();
        draw_border(&mut screen, &view.bitmap_rect());
        if let Some((mx, my)) = mouse {
            draw_crosshair(&mut screen, mx as i32, my as i32, 12, 0xFF_33_33_33);
        }

        let next_title = status_title(&controller, &surface);
        if next_title != title {
            drawer.set_title(&next_title);
            title = next_title;
        }
        drawer.present(&screen)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> PointerSample {
        PointerSample::new(x, y)
    }

    #[test]
    fn short_hops_need_no_history() {
        assert!(interpolate_history(at(0.0, 0.0), at(3.0, 0.0), 4.0).is_empty());
    }

    #[test]
    fn long_hops_are_filled_in_order() {
        let h = interpolate_history(at(0.0, 0.0), at(16.0, 0.0), 4.0);
        assert_eq!(h, vec![at(4.0, 0.0), at(8.0, 0.0), at(12.0, 0.0)]);
    }

    #[test]
    fn tracker_emits_a_full_stroke() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(false, Some((1.0, 1.0))), None);
        assert_eq!(t.update(true, Some((1.0, 1.0))), Some(PointerEvent::Down(at(1.0, 1.0))));
        assert_eq!(t.update(true, Some((1.0, 1.0))), None);
        assert_eq!(
            t.update(true, Some((9.0, 1.0))),
            Some(PointerEvent::Move { history: vec![at(5.0, 1.0)], current: at(9.0, 1.0) })
        );
        assert_eq!(t.update(false, None), Some(PointerEvent::Up(at(9.0, 1.0))));
        assert_eq!(t.update(false, None), None);
    }

    #[test]
    fn failed_export_is_reported_not_fatal() {
        let mut view = ImageView::new();
        view.set_image(Some(image::RgbaImage::new(10, 10)));
        view.layout(20, 20);
        let mut surface = PaintingSurface::new();
        surface.on_resize(20, 20, None);

        let path = std::env::temp_dir().join("impressionist-missing-dir").join("nested").join("out.png");
        assert!(matches!(export(&surface, &view, &path, true), Err(Error::ImageExport { .. })));
        assert!(!export_or_log(&surface, &view, &path, true));
        assert_eq!(surface.size(), Some((20, 20)));
    }

    #[test]
    fn press_without_position_waits() {
        let mut t = PointerTracker::default();
        assert_eq!(t.update(true, None), None);
        assert_eq!(t.update(true, Some((2.0, 2.0))), Some(PointerEvent::Down(at(2.0, 2.0))));
    }
}
