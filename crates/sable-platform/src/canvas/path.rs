/// Reusable vector path in user space.
///
/// Built with the usual move/line/curve commands; the canvas transform is
/// applied when the path is drawn or used as a clip, not when it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Segment {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(Segment::MoveTo(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(Segment::LineTo(x, y));
        self
    }

    /// Quadratic curve through control point `(cpx, cpy)`.
    pub fn quad_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) -> &mut Self {
        self.segments.push(Segment::QuadTo(cpx, cpy, x, y));
        self
    }

    /// Cubic curve through control points `(c1x, c1y)` and `(c2x, c2y)`.
    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        self.segments.push(Segment::CubicTo(c1x, c1y, c2x, c2y, x, y));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(Segment::Close);
        self
    }

    /// Drops every segment so the path can be rebuilt.
    pub fn reset(&mut self) -> &mut Self {
        self.segments.clear();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `None` when the path has no drawable geometry (no segments, or only moves).
    pub(crate) fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(x, y) => pb.move_to(x, y),
                Segment::LineTo(x, y) => pb.line_to(x, y),
                Segment::QuadTo(cx, cy, x, y) => pb.quad_to(cx, cy, x, y),
                Segment::CubicTo(c1x, c1y, c2x, c2y, x, y) => pb.cubic_to(c1x, c1y, c2x, c2y, x, y),
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }
}
