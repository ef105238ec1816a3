use super::Vec2;

/// Axis-aligned rectangle in logical units (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Multiplies origin and size by `factor` (logical → pixel space).
    #[inline]
    pub fn scaled(self, factor: f32) -> Self {
        Rect::new(
            self.origin.x * factor,
            self.origin.y * factor,
            self.size.x * factor,
            self.size.y * factor,
        )
    }

    /// Integer pixel rectangle obtained by truncating both corners toward zero.
    ///
    /// Mirrors how the blit paths address pixels: `(x as i32, y as i32)` to
    /// `((x + w) as i32, (y + h) as i32)`. Returns `None` when the truncated
    /// rectangle has no area.
    pub fn truncated(self) -> Option<tiny_skia::IntRect> {
        let r = self.normalized();
        let max = r.max();
        let x0 = r.origin.x as i32;
        let y0 = r.origin.y as i32;
        let x1 = max.x as i32;
        let y1 = max.y as i32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        tiny_skia::IntRect::from_ltrb(x0, y0, x1, y1)
    }

    #[inline]
    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        let r = self.normalized();
        tiny_skia::Rect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
    }
}
