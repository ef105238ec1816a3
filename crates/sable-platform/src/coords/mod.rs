//! Coordinate and geometry types shared by the canvas and asset code.
//!
//! Canonical space:
//! - Logical units (pixels of a scale-1 image)
//! - Origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
