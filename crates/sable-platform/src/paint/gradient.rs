use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

impl From<SpreadMode> for tiny_skia::SpreadMode {
    fn from(mode: SpreadMode) -> Self {
        match mode {
            SpreadMode::Pad => tiny_skia::SpreadMode::Pad,
            SpreadMode::Repeat => tiny_skia::SpreadMode::Repeat,
            SpreadMode::Reflect => tiny_skia::SpreadMode::Reflect,
        }
    }
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; the rasterizer clamps out-of-range values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient between two points in canvas user space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self { start, end, stops, spread }
    }

    /// Returns true when the gradient definition is structurally usable.
    ///
    /// A single stop paints as a solid color, whatever the endpoints.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && match self.stops.len() {
                0 => false,
                1 => true,
                _ => self.end.x != self.start.x || self.end.y != self.start.y,
            }
    }
}

/// Radial gradient around `center`, reaching the last stop at `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self { center, radius, stops, spread }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && match self.stops.len() {
                0 => false,
                1 => true,
                _ => self.radius > 0.0,
            }
    }
}

/// Gradient fill source.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Gradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32, stops: Vec<ColorStop>) -> Self {
        Gradient::Linear(LinearGradient::new(
            Vec2::new(x0, y0),
            Vec2::new(x1, y1),
            stops,
            SpreadMode::Pad,
        ))
    }

    pub fn radial(x: f32, y: f32, radius: f32, stops: Vec<ColorStop>) -> Self {
        Gradient::Radial(RadialGradient::new(Vec2::new(x, y), radius, stops, SpreadMode::Pad))
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Gradient::Linear(g) => g.is_valid(),
            Gradient::Radial(g) => g.is_valid(),
        }
    }

    /// Builds the rasterizer shader with every stop faded by `alpha`.
    ///
    /// Returns `None` for degenerate gradients; callers skip the draw.
    pub(crate) fn to_shader(&self, alpha: f32) -> Option<tiny_skia::Shader<'static>> {
        if !self.is_valid() {
            return None;
        }
        let stops = |stops: &[ColorStop]| -> Vec<tiny_skia::GradientStop> {
            stops
                .iter()
                .map(|s| tiny_skia::GradientStop::new(s.t, s.color.faded(alpha).to_skia()))
                .collect()
        };
        match self {
            Gradient::Linear(g) => tiny_skia::LinearGradient::new(
                g.start.to_point(),
                g.end.to_point(),
                stops(&g.stops),
                g.spread.into(),
                tiny_skia::Transform::identity(),
            ),
            Gradient::Radial(g) => tiny_skia::RadialGradient::new(
                g.center.to_point(),
                g.center.to_point(),
                g.radius,
                stops(&g.stops),
                g.spread.into(),
                tiny_skia::Transform::identity(),
            ),
        }
    }
}
