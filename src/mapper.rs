// Display space <-> image space mapping.
// The source image is shown uniformly scaled and centered inside its
// container; everything here is pure arithmetic over that layout.

use crate::types::Rect;

/// Scale factors applied to the source image and the size of the container it
/// is shown in. Recomputed by the host whenever either changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub container_w: u32,
    pub container_h: u32,
}

impl DisplayTransform {
    pub fn new(scale_x: f32, scale_y: f32, container_w: u32, container_h: u32) -> Self {
        Self { scale_x, scale_y, container_w, container_h }
    }
}

/// Rounds half up, matching how displayed sizes are snapped to whole pixels.
#[inline]
fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Where the image actually lands inside its container.
/// Empty when there is no transform or no image: nothing is paintable then.
pub fn bitmap_rect_within_container(
    transform: Option<&DisplayTransform>,
    intrinsic: Option<(u32, u32)>,
) -> Rect {
    let (Some(t), Some((iw, ih))) = (transform, intrinsic) else {
        return Rect::default();
    };

    let actual_w = round_half_up(iw as f32 * t.scale_x);
    let actual_h = round_half_up(ih as f32 * t.scale_y);

    // Centered in the container.
    let left = (t.container_w as i32 - actual_w) / 2;
    let top = (t.container_h as i32 - actual_h) / 2;

    Rect::new(left, top, left + actual_w, top + actual_h)
}

/// Image-space pixel under a display-space point, or `None` outside the
/// mapped rectangle.
pub fn display_to_image(
    rect: &Rect,
    transform: &DisplayTransform,
    intrinsic: (u32, u32),
    x: f32,
    y: f32,
) -> Option<(u32, u32)> {
    let (iw, ih) = intrinsic;
    if !rect.contains(x as i32, y as i32) || iw == 0 || ih == 0 {
        return None;
    }
    if transform.scale_x <= 0.0 || transform.scale_y <= 0.0 {
        return None;
    }

    // Rounding the displayed size can push the last column/row one past the grid.
    let ix = ((x - rect.left as f32) / transform.scale_x).floor().clamp(0.0, (iw - 1) as f32);
    let iy = ((y - rect.top as f32) / transform.scale_y).floor().clamp(0.0, (ih - 1) as f32);
    Some((ix as u32, iy as u32))
}
