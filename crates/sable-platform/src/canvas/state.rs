use std::fmt;
use std::sync::Arc;

use tiny_skia::{Mask, Transform};

use crate::paint::{Color, Fill};

use super::{Composite, LineCap, LineJoin};

/// One frame of the canvas state stack.
///
/// Everything a draw call reads comes from here; [`Canvas::save`] pushes a
/// copy and [`Canvas::restore`] brings the previous one back.
///
/// [`Canvas::save`]: super::Canvas::save
/// [`Canvas::restore`]: super::Canvas::restore
#[derive(Clone)]
pub struct CanvasState {
    pub(crate) transform: Transform,
    pub(crate) alpha: f32,
    pub(crate) fill: Fill,
    pub(crate) stroke_color: Color,
    pub(crate) stroke_width: f32,
    pub(crate) line_cap: LineCap,
    pub(crate) line_join: LineJoin,
    pub(crate) miter_limit: f32,
    pub(crate) composite: Composite,
    // Device-space coverage; shared between frames until one of them narrows it.
    pub(crate) clip: Option<Arc<Mask>>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            alpha: 1.0,
            fill: Fill::default(),
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            line_cap: LineCap::Square,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            composite: Composite::SrcOver,
            clip: None,
        }
    }
}

impl fmt::Debug for CanvasState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasState")
            .field("transform", &self.transform)
            .field("alpha", &self.alpha)
            .field("fill", &self.fill)
            .field("stroke_color", &self.stroke_color)
            .field("stroke_width", &self.stroke_width)
            .field("line_cap", &self.line_cap)
            .field("line_join", &self.line_join)
            .field("miter_limit", &self.miter_limit)
            .field("composite", &self.composite)
            .field("clipped", &self.clip.is_some())
            .finish()
    }
}

impl CanvasState {
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }

    pub(crate) fn clip_mask(&self) -> Option<&Mask> {
        self.clip.as_deref()
    }

    pub(crate) fn stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.stroke_width,
            miter_limit: self.miter_limit,
            line_cap: self.line_cap.into(),
            line_join: self.line_join.into(),
            ..tiny_skia::Stroke::default()
        }
    }
}
