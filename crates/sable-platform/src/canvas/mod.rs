//! Immediate-mode 2D canvas backed by `tiny-skia`.
//!
//! A [`Canvas`] owns its pixels and a stack of [`CanvasState`] frames.
//! Setters change the current frame only; [`Canvas::save`] and
//! [`Canvas::restore`] bracket temporary changes:
//!
//! ```ignore
//! canvas.save().translate(x, y).rotate(angle);
//! canvas.draw_image_centered(&sprite, 0.0, 0.0);
//! canvas.restore()?;
//! ```

mod error;
mod path;
mod state;
mod style;
mod surface;

pub use error::CanvasError;
pub use path::Path;
pub use state::CanvasState;
pub use style::{Composite, LineCap, LineJoin};
pub use surface::Canvas;

pub use tiny_skia::Transform;
