//! Paint model used by the canvas.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - fill sources (solid, gradients, image patterns)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;
pub mod pattern;

pub use color::Color;
pub use gradient::{ColorStop, Gradient, LinearGradient, RadialGradient, SpreadMode};
pub use pattern::Pattern;

/// Fill source for shapes, text and image composition.
///
/// Exactly one source is active at a time; assigning a new one replaces the
/// previous, whatever its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Color(Color),
    Gradient(Gradient),
    Pattern(Pattern),
}

impl Fill {
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Fill::Color(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    pub fn gradient(&self) -> Option<&Gradient> {
        match self {
            Fill::Gradient(g) => Some(g),
            _ => None,
        }
    }

    #[inline]
    pub fn pattern(&self) -> Option<&Pattern> {
        match self {
            Fill::Pattern(p) => Some(p),
            _ => None,
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Color(Color::BLACK)
    }
}

impl From<Color> for Fill {
    fn from(c: Color) -> Self {
        Fill::Color(c)
    }
}

impl From<Gradient> for Fill {
    fn from(g: Gradient) -> Self {
        Fill::Gradient(g)
    }
}

impl From<Pattern> for Fill {
    fn from(p: Pattern) -> Self {
        Fill::Pattern(p)
    }
}
