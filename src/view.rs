// The image view: shows the source image fit-centered in its container and
// hands out what the painting core needs from it (pixels, transform, rendering).

use image::RgbaImage;
use log::debug;

use crate::mapper::{bitmap_rect_within_container, display_to_image, DisplayTransform};
use crate::sampler::SourceImage;
use crate::types::{pack, FrameBuffer, Rect};

/// Uniform scale that fits `intrinsic` inside `container` (up or down).
pub fn fit_center(intrinsic: (u32, u32), container: (u32, u32)) -> Option<DisplayTransform> {
    let (iw, ih) = intrinsic;
    let (cw, ch) = container;
    if iw == 0 || ih == 0 || cw == 0 || ch == 0 {
        return None;
    }
    let scale = (cw as f32 / iw as f32).min(ch as f32 / ih as f32);
    Some(DisplayTransform::new(scale, scale, cw, ch))
}

/// Read-only view of the displayed image as the stroke controller sees it.
#[derive(Clone, Copy)]
pub struct ImageLayout<'a> {
    pub image: Option<&'a dyn SourceImage>,
    pub transform: Option<DisplayTransform>,
}

impl<'a> ImageLayout<'a> {
    pub fn new(image: Option<&'a dyn SourceImage>, transform: Option<DisplayTransform>) -> Self {
        Self { image, transform }
    }

    /// Nothing loaded, nothing paintable.
    pub fn empty() -> Self {
        Self { image: None, transform: None }
    }

    pub fn rect(&self) -> Rect {
        bitmap_rect_within_container(self.transform.as_ref(), self.image.map(|i| i.dimensions()))
    }
}

#[derive(Default)]
pub struct ImageView {
    image: Option<RgbaImage>,
    container: (u32, u32),
    transform: Option<DisplayTransform>,
    rendering: Option<FrameBuffer>,
}

impl ImageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, image: Option<RgbaImage>) {
        self.image = image;
        self.relayout();
    }

    /// Container size changed.
    pub fn layout(&mut self, width: u32, height: u32) {
        if self.container == (width, height) {
            return;
        }
        self.container = (width, height);
        self.relayout();
    }

    pub fn transform(&self) -> Option<&DisplayTransform> {
        self.transform.as_ref()
    }

    pub fn bitmap_rect(&self) -> Rect {
        self.as_layout().rect()
    }

    /// The image as currently displayed, transparent outside the mapped rectangle.
    pub fn rendering(&self) -> Option<&FrameBuffer> {
        self.rendering.as_ref()
    }

    pub fn as_layout(&self) -> ImageLayout<'_> {
        ImageLayout::new(self.image.as_ref().map(|i| i as &dyn SourceImage), self.transform)
    }

    fn relayout(&mut self) {
        self.transform = self
            .image
            .as_ref()
            .and_then(|img| fit_center(img.dimensions(), self.container));
        self.rendering = match (&self.image, &self.transform) {
            (Some(img), Some(t)) => Some(render_fit(img, t)),
            _ => None,
        };
        debug!(
            "image view laid out: container={:?} transform={:?} rect={:?}",
            self.container,
            self.transform,
            self.bitmap_rect()
        );
    }
}

/// Nearest-neighbour scale of `img` into a container-sized raster.
fn render_fit(img: &RgbaImage, t: &DisplayTransform) -> FrameBuffer {
    let (w, h) = (t.container_w as usize, t.container_h as usize);
    let intrinsic = img.dimensions();
    let rect = bitmap_rect_within_container(Some(t), Some(intrinsic));
    let mut fb = FrameBuffer::new(w, h);

    let y0 = rect.top.max(0) as usize;
    let y1 = (rect.bottom.max(0) as usize).min(h);
    let x0 = rect.left.max(0) as usize;
    let x1 = (rect.right.max(0) as usize).min(w);
    for y in y0..y1 {
        for x in x0..x1 {
            let Some((ix, iy)) = display_to_image(&rect, t, intrinsic, x as f32 + 0.5, y as f32 + 0.5) else {
                continue;
            };
            let p = img.get_pixel(ix, iy);
            fb.pixels[y * w + x] = pack(p[3], p[0], p[1], p[2]);
        }
    }
    fb
}
