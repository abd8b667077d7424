// Impressionist painting surface.
// Drag a pointer over a displayed image and lay down brush strokes colored
// from the pixels underneath. Strokes accumulate on a persistent raster that
// can be shown over or without the image and exported as one composite.

pub mod brush;
pub mod config;
pub mod draw;
pub mod error;
pub mod host;
pub mod mapper;
pub mod sampler;
pub mod stroke;
pub mod surface;
pub mod types;
pub mod view;

pub use brush::{Brush, BrushKind, BrushState, CircleBrush, LetterBrush, SquareBrush};
pub use error::Error;
pub use mapper::{bitmap_rect_within_container, DisplayTransform};
pub use sampler::{sample_color, SourceImage};
pub use stroke::{EventOutcome, StrokeController, StrokePhase};
pub use surface::{draw_border, PaintingSurface};
pub use types::{ActivePaint, FrameBuffer, PointerEvent, PointerSample, Rect, Rgb};
pub use view::{ImageLayout, ImageView};
