use std::sync::Arc;

use tiny_skia::{
    FillRule, FilterQuality, Mask, MaskType, Paint, PathBuilder, Pixmap, PixmapPaint, Shader,
    Transform,
};

use crate::assets::{Image, ImageData, Scale};
use crate::coords::Rect;
use crate::paint::{Color, Fill, Gradient, Pattern};
use crate::text::{TextFormat, TextLayout};

use super::{CanvasError, CanvasState, Composite, LineCap, LineJoin, Path};

/// Immediate-mode 2D drawing surface with a save/restore state stack.
///
/// Every draw reads the current frame: fills, images and text use its fill,
/// strokes its stroke settings, and all of them its alpha, composite mode,
/// clip and transform. Calls chain:
///
/// ```ignore
/// canvas.save().translate(10.0, 10.0).set_fill_color(Color::WHITE).fill_rect(0.0, 0.0, 4.0, 4.0);
/// canvas.restore()?;
/// ```
pub struct Canvas {
    pixmap: Pixmap,
    state: CanvasState,
    saved: Vec<CanvasState>,
    default_font: Option<TextFormat>,
}

impl Canvas {
    /// Transparent `width` × `height` canvas with a single default frame.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap, state: CanvasState::default(), saved: Vec::new(), default_font: None })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA pixels drawn so far.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copy of the current pixels as a ready image at scale 1.
    pub fn snapshot(&self) -> Image {
        Image::from_pixmap(self.pixmap.clone(), Scale::ONE)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap.encode_png().map_err(|e| CanvasError::Encode(e.to_string()))
    }

    /// Format used by [`draw_text`](Self::draw_text).
    pub fn set_default_font(&mut self, format: TextFormat) -> &mut Self {
        self.default_font = Some(format);
        self
    }

    // ── state stack ───────────────────────────────────────────────────────

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Number of frames on the stack, including the current one.
    pub fn state_depth(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn current_transform(&self) -> Transform {
        self.state.transform
    }

    /// Pushes a copy of the current frame.
    pub fn save(&mut self) -> &mut Self {
        self.saved.push(self.state.clone());
        self
    }

    /// Pops the current frame and reapplies the previous one, transform included.
    ///
    /// # Errors
    /// [`CanvasError::StateUnderflow`] when no frame was saved; the canvas is
    /// left as it was.
    pub fn restore(&mut self) -> Result<&mut Self, CanvasError> {
        let previous = self.saved.pop().ok_or(CanvasError::StateUnderflow)?;
        self.state = previous;
        Ok(self)
    }

    // ── frame setters ─────────────────────────────────────────────────────

    /// Global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.state.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.state.fill = Fill::Color(color);
        self
    }

    pub fn set_fill_gradient(&mut self, gradient: Gradient) -> &mut Self {
        self.state.fill = Fill::Gradient(gradient);
        self
    }

    pub fn set_fill_pattern(&mut self, pattern: Pattern) -> &mut Self {
        self.state.fill = Fill::Pattern(pattern);
        self
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.state.stroke_color = color;
        self
    }

    pub fn set_stroke_width(&mut self, width: f32) -> &mut Self {
        self.state.stroke_width = width;
        self
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.state.line_cap = cap;
        self
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        self.state.line_join = join;
        self
    }

    pub fn set_miter_limit(&mut self, limit: f32) -> &mut Self {
        self.state.miter_limit = limit;
        self
    }

    pub fn set_composite_operation(&mut self, op: Composite) -> &mut Self {
        self.state.composite = op;
        self
    }

    // ── transform ─────────────────────────────────────────────────────────

    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.state.transform = self.state.transform.pre_translate(x, y);
        self
    }

    pub fn scale(&mut self, x: f32, y: f32) -> &mut Self {
        self.state.transform = self.state.transform.pre_scale(x, y);
        self
    }

    /// Rotates by `angle` radians, clockwise in a y-down space.
    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.state.transform = self.state.transform.pre_concat(rotation);
        self
    }

    /// Multiplies the current transform by the given affine matrix.
    pub fn transform(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> &mut Self {
        let m = Transform::from_row(m11, m12, m21, m22, dx, dy);
        self.state.transform = self.state.transform.pre_concat(m);
        self
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> &mut Self {
        self.state.transform = Transform::from_row(m11, m12, m21, m22, dx, dy);
        self
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Narrows the clip to `path` under the current transform.
    ///
    /// Clips only ever shrink within a frame; [`restore`](Self::restore)
    /// brings back the wider one. An empty path clips everything.
    pub fn clip(&mut self, path: &Path) -> &mut Self {
        let shape = path.to_skia();
        self.clip_to(shape.as_ref());
        self
    }

    pub fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        let shape = Rect::new(x, y, width, height)
            .to_skia()
            .map(PathBuilder::from_rect);
        self.clip_to(shape.as_ref());
        self
    }

    fn clip_to(&mut self, shape: Option<&tiny_skia::Path>) {
        let transform = self.state.transform;
        match (&mut self.state.clip, shape) {
            (Some(mask), Some(shape)) => {
                Arc::make_mut(mask).intersect_path(shape, FillRule::Winding, true, transform);
            }
            (clip, shape) => {
                let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                if let Some(shape) = shape {
                    mask.fill_path(shape, FillRule::Winding, true, transform);
                }
                *clip = Some(Arc::new(mask));
            }
        }
    }

    // ── shapes ────────────────────────────────────────────────────────────

    /// Clears every pixel to transparent, ignoring transform and clip.
    pub fn clear(&mut self) -> &mut Self {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self
    }

    /// Fills the single pixel at the truncated position with the stroke color.
    pub fn draw_point(&mut self, x: f32, y: f32) -> &mut Self {
        let Some(rect) = tiny_skia::Rect::from_xywh(x.trunc(), y.trunc(), 1.0, 1.0) else {
            return self;
        };
        let state = &self.state;
        let paint = stroke_paint(state);
        self.pixmap.fill_rect(rect, &paint, state.transform, state.clip_mask());
        self
    }

    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> &mut Self {
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        if let Some(line) = pb.finish() {
            self.stroke_skia_path(&line);
        }
        self
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        let Some(rect) = Rect::new(x, y, width, height).to_skia() else {
            return self;
        };
        let Self { pixmap, state, .. } = self;
        with_fill_paint(state, |paint| {
            pixmap.fill_rect(rect, paint, state.transform, state.clip_mask());
        });
        self
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        if let Some(rect) = Rect::new(x, y, width, height).to_skia() {
            self.stroke_skia_path(&PathBuilder::from_rect(rect));
        }
        self
    }

    /// Fills the circle of radius `r` centered on `(x, y)`.
    pub fn fill_circle(&mut self, x: f32, y: f32, r: f32) -> &mut Self {
        if let Some(circle) = circle_path(x, y, r) {
            self.fill_skia_path(&circle);
        }
        self
    }

    pub fn stroke_circle(&mut self, x: f32, y: f32, r: f32) -> &mut Self {
        if let Some(circle) = circle_path(x, y, r) {
            self.stroke_skia_path(&circle);
        }
        self
    }

    pub fn fill_path(&mut self, path: &Path) -> &mut Self {
        if let Some(shape) = path.to_skia() {
            self.fill_skia_path(&shape);
        }
        self
    }

    pub fn stroke_path(&mut self, path: &Path) -> &mut Self {
        if let Some(shape) = path.to_skia() {
            self.stroke_skia_path(&shape);
        }
        self
    }

    fn fill_skia_path(&mut self, shape: &tiny_skia::Path) {
        let Self { pixmap, state, .. } = self;
        with_fill_paint(state, |paint| {
            pixmap.fill_path(shape, paint, FillRule::Winding, state.transform, state.clip_mask());
        });
    }

    fn stroke_skia_path(&mut self, shape: &tiny_skia::Path) {
        let state = &self.state;
        let paint = stroke_paint(state);
        self.pixmap
            .stroke_path(shape, &paint, &state.stroke(), state.transform, state.clip_mask());
    }

    // ── images ────────────────────────────────────────────────────────────

    /// Draws `image` at its logical size with its top-left at the truncated
    /// `(x, y)`.
    pub fn draw_image(&mut self, image: &Image, x: f32, y: f32) -> &mut Self {
        let Some(data) = ready(image) else { return self };
        let inv = 1.0 / data.scale().factor();
        let placement = Transform::from_row(inv, 0.0, 0.0, inv, x.trunc(), y.trunc());
        self.blit(data.pixmap(), placement);
        self
    }

    /// Draws `image` stretched into `width` × `height` at `(x, y)`.
    pub fn draw_image_scaled(&mut self, image: &Image, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        let Some(data) = ready(image) else { return self };
        let src = data.pixmap();
        let placement = Transform::from_row(
            width / src.width() as f32,
            0.0,
            0.0,
            height / src.height() as f32,
            x,
            y,
        );
        self.blit(src, placement);
        self
    }

    /// Draws the `src` region of `image` (logical units) into `dst`.
    ///
    /// Both rectangles are truncated to whole pixels first; a region that
    /// truncates to nothing draws nothing.
    pub fn draw_image_region(&mut self, image: &Image, dst: Rect, src: Rect) -> &mut Self {
        let Some(data) = ready(image) else { return self };
        let (Some(src_px), Some(dst_px)) = (src.scaled(data.scale().factor()).truncated(), dst.truncated()) else {
            log::trace!("draw_image_region: empty region {src:?} -> {dst:?}");
            return self;
        };
        let pixmap = data.pixmap();
        let bounds = tiny_skia::IntRect::from_xywh(0, 0, pixmap.width(), pixmap.height());
        let Some(clipped) = bounds.and_then(|b| b.intersect(&src_px)) else {
            log::trace!("draw_image_region: {src_px:?} outside the image");
            return self;
        };
        let Some(region) = pixmap.clone_rect(clipped) else { return self };
        // Scale follows the requested region; the part past the image edge stays empty.
        let sx = dst_px.width() as f32 / src_px.width() as f32;
        let sy = dst_px.height() as f32 / src_px.height() as f32;
        let placement = Transform::from_row(
            sx,
            0.0,
            0.0,
            sy,
            dst_px.x() as f32 + (clipped.x() - src_px.x()) as f32 * sx,
            dst_px.y() as f32 + (clipped.y() - src_px.y()) as f32 * sy,
        );
        self.blit(&region, placement);
        self
    }

    /// Draws `image` centered on `(x, y)`.
    pub fn draw_image_centered(&mut self, image: &Image, x: f32, y: f32) -> &mut Self {
        let (w, h) = (image.width(), image.height());
        self.draw_image(image, x - w / 2.0, y - h / 2.0)
    }

    fn blit(&mut self, src: &Pixmap, placement: Transform) {
        let state = &self.state;
        let paint = PixmapPaint {
            opacity: state.alpha,
            blend_mode: state.composite.into(),
            quality: FilterQuality::Bicubic,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            state.transform.pre_concat(placement),
            state.clip_mask(),
        );
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// Draws `text` in the default font with its first baseline at `y`.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        let Some(format) = &self.default_font else {
            log::debug!("draw_text: no default font set, skipping {text:?}");
            return self;
        };
        let layout = TextLayout::new(text, format, None);
        self.draw_text_layout(&layout, x, y - layout.ascent())
    }

    /// Draws a pre-shaped layout with its top-left corner at `(x, y)`.
    pub fn draw_text_layout(&mut self, layout: &TextLayout, x: f32, y: f32) -> &mut Self {
        if layout.glyphs().is_empty() {
            return self;
        }
        let (ox, oy) = (x.floor(), y.floor());
        let right = layout.glyphs().iter().map(|g| g.x + g.width as f32).fold(layout.width(), f32::max);
        let w = (right + 2.0).ceil() as u32;
        let h = (layout.height() + 2.0).ceil() as u32;
        let (Some(mut coverage), Some(mut glyphs)) = (Mask::new(w, h), Pixmap::new(w, h)) else {
            return self;
        };
        let Some(area) = tiny_skia::Rect::from_xywh(ox, oy, w as f32, h as f32) else {
            return self;
        };
        layout.rasterize_into(&mut coverage, x - ox, y - oy);
        for (px, &c) in glyphs.data_mut().chunks_exact_mut(4).zip(coverage.data()) {
            px.fill(c);
        }

        // Coverage moves to device space as the fill mask: pixels without
        // glyph coverage never reach the composite.
        let Some(mut device) = Pixmap::new(self.pixmap.width(), self.pixmap.height()) else {
            return self;
        };
        let Self { pixmap, state, .. } = self;
        let place = PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() };
        device.draw_pixmap(ox as i32, oy as i32, glyphs.as_ref(), &place, state.transform, None);
        let mut mask = Mask::from_pixmap(device.as_ref(), MaskType::Alpha);
        if let Some(clip) = state.clip_mask() {
            for (m, &c) in mask.data_mut().iter_mut().zip(clip.data()) {
                *m = ((*m as u16 * c as u16 + 127) / 255) as u8;
            }
        }
        with_fill_paint(state, |paint| {
            pixmap.fill_rect(area, paint, state.transform, Some(&mask));
        });
        self
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("state", &self.state)
            .field("depth", &self.state_depth())
            .finish()
    }
}

fn ready(image: &Image) -> Option<Arc<ImageData>> {
    let data = image.data();
    if data.is_none() {
        log::trace!("skipping draw of unresolved image {image:?}");
    }
    data
}

fn circle_path(x: f32, y: f32, r: f32) -> Option<tiny_skia::Path> {
    tiny_skia::Rect::from_xywh(x - r, y - r, 2.0 * r, 2.0 * r).and_then(PathBuilder::from_oval)
}

fn stroke_paint(state: &CanvasState) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(state.stroke_color.faded(state.alpha).to_skia());
    paint.blend_mode = state.composite.into();
    paint.anti_alias = true;
    paint
}

/// Runs `draw` with a paint for the frame's fill, or skips it when the fill
/// cannot paint yet (degenerate gradient, pattern image still loading).
fn with_fill_paint<R>(state: &CanvasState, draw: impl FnOnce(&Paint<'_>) -> R) -> Option<R> {
    let pattern_data;
    let shader = match &state.fill {
        Fill::Color(c) => Shader::SolidColor(c.faded(state.alpha).to_skia()),
        Fill::Gradient(g) => {
            let Some(shader) = g.to_shader(state.alpha) else {
                log::trace!("skipping fill with degenerate gradient");
                return None;
            };
            shader
        }
        Fill::Pattern(p) => {
            pattern_data = ready(p.image())?;
            p.to_shader(&pattern_data, state.alpha)
        }
    };
    let paint = Paint {
        shader,
        blend_mode: state.composite.into(),
        anti_alias: true,
        ..Paint::default()
    };
    Some(draw(&paint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::pixel_at;
    use crate::paint::ColorStop;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(w, h).unwrap()
    }

    fn red() -> Color {
        Color::from_argb(0xFFFF0000)
    }

    fn blue() -> Color {
        Color::from_argb(0xFF0000FF)
    }

    fn px(c: &Canvas, x: u32, y: u32) -> [u8; 4] {
        pixel_at(c.pixmap(), x, y).unwrap()
    }

    fn solid_image(w: u32, h: u32, color: tiny_skia::Color, scale: f32) -> Image {
        let mut pixmap = Pixmap::new(w, h).unwrap();
        pixmap.fill(color);
        Image::from_pixmap(pixmap, Scale::new(scale))
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert_eq!(
            Canvas::new(0, 10).unwrap_err(),
            CanvasError::InvalidDimensions { width: 0, height: 10 }
        );
        let c = canvas(4, 3);
        assert_eq!((c.width(), c.height()), (4, 3));
        assert_eq!(px(&c, 0, 0), CLEAR);
    }

    // ── state stack ───────────────────────────────────────────────────────

    #[test]
    fn restore_brings_back_saved_fill() {
        let mut c = canvas(4, 4);
        c.set_fill_color(red()).save().set_fill_color(blue());
        assert_eq!(c.state().fill().color(), Some(blue()));
        assert_eq!(c.state_depth(), 2);

        c.restore().unwrap();
        assert_eq!(c.state().fill().color(), Some(red()));
        assert_eq!(c.state_depth(), 1);
    }

    #[test]
    fn restore_on_base_frame_fails_and_changes_nothing() {
        let mut c = canvas(4, 4);
        c.set_alpha(0.25);
        assert_eq!(c.restore().unwrap_err(), CanvasError::StateUnderflow);
        assert_eq!(c.state_depth(), 1);
        assert_eq!(c.state().alpha(), 0.25);

        c.save();
        assert!(c.restore().is_ok());
        assert!(c.restore().is_err());
    }

    #[test]
    fn setting_a_color_replaces_a_gradient() {
        let mut c = canvas(4, 4);
        let stops = vec![ColorStop::new(0.0, red()), ColorStop::new(1.0, blue())];
        c.set_fill_gradient(Gradient::linear(0.0, 0.0, 4.0, 0.0, stops));
        assert!(c.state().fill().gradient().is_some());

        c.set_fill_color(red());
        assert!(c.state().fill().gradient().is_none());
        assert_eq!(c.state().fill().color(), Some(red()));
    }

    #[test]
    fn transform_is_reapplied_on_restore() {
        let mut c = canvas(20, 20);
        c.translate(2.0, 3.0).save().scale(2.0, 2.0).rotate(0.5);
        assert_ne!(c.current_transform(), Transform::from_translate(2.0, 3.0));

        c.restore().unwrap();
        assert_eq!(c.current_transform(), Transform::from_translate(2.0, 3.0));

        c.set_fill_color(red()).fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(px(&c, 2, 3), RED);
        assert_eq!(px(&c, 0, 0), CLEAR);
    }

    #[test]
    fn transform_and_set_transform_compose_and_replace() {
        let mut c = canvas(4, 4);
        c.transform(1.0, 0.0, 0.0, 1.0, 5.0, 0.0).transform(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(c.current_transform(), Transform::from_row(2.0, 0.0, 0.0, 2.0, 5.0, 0.0));
        c.set_transform(1.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        assert_eq!(c.current_transform(), Transform::from_translate(1.0, 1.0));
    }

    // ── fills and strokes ─────────────────────────────────────────────────

    #[test]
    fn fill_rect_uses_fill_color() {
        let mut c = canvas(10, 10);
        c.set_fill_color(red()).fill_rect(2.0, 2.0, 4.0, 4.0);
        assert_eq!(px(&c, 3, 3), RED);
        assert_eq!(px(&c, 7, 7), CLEAR);
    }

    #[test]
    fn alpha_fades_fills() {
        let mut c = canvas(4, 4);
        c.set_alpha(0.5).set_fill_color(red()).fill_rect(0.0, 0.0, 4.0, 4.0);
        let [_, _, _, a] = px(&c, 1, 1);
        assert!((i32::from(a) - 128).abs() <= 1, "alpha {a}");
    }

    #[test]
    fn composite_dst_out_erases() {
        let mut c = canvas(4, 4);
        c.set_fill_color(red()).fill_rect(0.0, 0.0, 4.0, 4.0);
        c.set_composite_operation(Composite::DstOut).fill_rect(0.0, 0.0, 2.0, 4.0);
        assert_eq!(px(&c, 0, 0), CLEAR);
        assert_eq!(px(&c, 3, 0), RED);
    }

    #[test]
    fn draw_point_and_line_use_stroke_color() {
        let mut c = canvas(10, 10);
        c.set_fill_color(red()).set_stroke_color(blue());
        c.draw_point(4.7, 5.2);
        assert_eq!(px(&c, 4, 5), BLUE);

        c.set_stroke_width(2.0).set_line_cap(LineCap::Butt).draw_line(0.0, 1.0, 10.0, 1.0);
        assert_eq!(px(&c, 5, 1), BLUE);
        assert_eq!(px(&c, 5, 8), CLEAR);
    }

    #[test]
    fn stroke_rect_leaves_interior_empty() {
        let mut c = canvas(20, 20);
        c.set_stroke_color(blue()).set_stroke_width(2.0).stroke_rect(2.0, 2.0, 16.0, 16.0);
        assert_eq!(px(&c, 2, 10), BLUE);
        assert_eq!(px(&c, 10, 10), CLEAR);
    }

    #[test]
    fn fill_circle_covers_center_not_corners() {
        let mut c = canvas(20, 20);
        c.set_fill_color(red()).fill_circle(10.0, 10.0, 8.0);
        assert_eq!(px(&c, 10, 10), RED);
        assert_eq!(px(&c, 1, 1), CLEAR);

        c.clear().set_stroke_color(blue()).set_stroke_width(2.0).stroke_circle(10.0, 10.0, 8.0);
        assert_eq!(px(&c, 10, 10), CLEAR);
        let ring = px(&c, 17, 10);
        assert!(ring[2] > 200 && ring[3] > 200, "{ring:?}");
    }

    #[test]
    fn fill_path_triangle() {
        let mut c = canvas(20, 20);
        let mut tri = Path::new();
        tri.move_to(0.0, 0.0).line_to(20.0, 0.0).line_to(0.0, 20.0).close();
        c.set_fill_color(red()).fill_path(&tri);
        assert_eq!(px(&c, 3, 3), RED);
        assert_eq!(px(&c, 17, 17), CLEAR);
    }

    #[test]
    fn linear_gradient_runs_between_stops() {
        let mut c = canvas(100, 2);
        let stops = vec![ColorStop::new(0.0, red()), ColorStop::new(1.0, blue())];
        c.set_fill_gradient(Gradient::linear(0.0, 0.0, 100.0, 0.0, stops)).fill_rect(0.0, 0.0, 100.0, 2.0);
        let left = px(&c, 0, 0);
        let right = px(&c, 99, 0);
        assert!(left[0] > 240 && left[2] < 15, "{left:?}");
        assert!(right[2] > 240 && right[0] < 15, "{right:?}");
    }

    #[test]
    fn pattern_fill_repeats_image() {
        let mut tile = Pixmap::new(2, 1).unwrap();
        tile.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        tile.fill_rect(
            tiny_skia::Rect::from_xywh(0.0, 0.0, 1.0, 1.0).unwrap(),
            &Paint { shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(255, 0, 0, 255)), ..Paint::default() },
            Transform::identity(),
            None,
        );
        let image = Image::from_pixmap(tile, Scale::ONE);

        let mut c = canvas(6, 1);
        c.set_fill_pattern(Pattern::new(image, true)).fill_rect(0.0, 0.0, 6.0, 1.0);
        assert_eq!(px(&c, 0, 0), RED);
        assert_eq!(px(&c, 1, 0), BLUE);
        assert_eq!(px(&c, 4, 0), RED);
    }

    #[test]
    fn pending_pattern_paints_nothing() {
        let mut c = canvas(4, 4);
        c.set_fill_pattern(Pattern::new(Image::placeholder(4.0, 4.0), true)).fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(px(&c, 1, 1), CLEAR);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn clip_limits_drawing_and_restore_undoes_it() {
        let mut c = canvas(10, 10);
        c.save().clip_rect(0.0, 0.0, 5.0, 10.0);
        assert!(c.state().has_clip());
        c.set_fill_color(red()).fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(px(&c, 2, 2), RED);
        assert_eq!(px(&c, 8, 2), CLEAR);

        c.restore().unwrap();
        assert!(!c.state().has_clip());
        c.set_fill_color(blue()).fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(px(&c, 8, 2), BLUE);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut c = canvas(10, 10);
        c.clip_rect(0.0, 0.0, 6.0, 10.0).clip_rect(4.0, 0.0, 6.0, 10.0);
        c.set_fill_color(red()).fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(px(&c, 2, 5), CLEAR);
        assert_eq!(px(&c, 5, 5), RED);
        assert_eq!(px(&c, 8, 5), CLEAR);
    }

    #[test]
    fn clip_follows_transform() {
        let mut c = canvas(10, 10);
        c.translate(5.0, 0.0).clip_rect(0.0, 0.0, 5.0, 10.0).set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        c.set_fill_color(red()).fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(px(&c, 2, 2), CLEAR);
        assert_eq!(px(&c, 7, 2), RED);
    }

    #[test]
    fn empty_clip_path_hides_everything() {
        let mut c = canvas(4, 4);
        c.clip(&Path::new()).set_fill_color(red()).fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(px(&c, 1, 1), CLEAR);
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn draw_image_truncates_position() {
        let img = solid_image(2, 2, tiny_skia::Color::from_rgba8(255, 0, 0, 255), 1.0);
        let mut c = canvas(6, 6);
        c.draw_image(&img, 3.9, 1.2);
        assert_eq!(px(&c, 3, 1), RED);
        assert_eq!(px(&c, 4, 2), RED);
        assert_eq!(px(&c, 5, 1), CLEAR);
        assert_eq!(px(&c, 2, 1), CLEAR);
    }

    #[test]
    fn high_dpi_image_draws_at_logical_size() {
        let img = solid_image(8, 8, tiny_skia::Color::from_rgba8(255, 0, 0, 255), 2.0);
        assert_eq!((img.width(), img.height()), (4.0, 4.0));
        let mut c = canvas(10, 10);
        c.draw_image(&img, 0.0, 0.0);
        assert_eq!(px(&c, 2, 2), RED);
        assert_eq!(px(&c, 6, 6), CLEAR);
    }

    #[test]
    fn centered_image_matches_offset_draw() {
        let img = solid_image(4, 2, tiny_skia::Color::from_rgba8(0, 0, 255, 255), 1.0);
        let mut centered = canvas(12, 12);
        centered.draw_image_centered(&img, 6.0, 6.0);
        let mut offset = canvas(12, 12);
        offset.draw_image(&img, 6.0 - 2.0, 6.0 - 1.0);
        assert_eq!(centered.pixmap().data(), offset.pixmap().data());
        assert_eq!(px(&centered, 4, 5), BLUE);
    }

    #[test]
    fn scaled_image_fills_destination() {
        let img = solid_image(2, 2, tiny_skia::Color::from_rgba8(255, 0, 0, 255), 1.0);
        let mut c = canvas(10, 10);
        c.draw_image_scaled(&img, 1.0, 1.0, 8.0, 8.0);
        assert_eq!(px(&c, 5, 5), RED);
        assert_eq!(px(&c, 0, 0), CLEAR);
        assert_eq!(px(&c, 9, 9), CLEAR);
    }

    #[test]
    fn image_region_copies_source_rect() {
        // Left half red, right half blue.
        let mut pixmap = Pixmap::new(4, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        pixmap.fill_rect(
            tiny_skia::Rect::from_xywh(0.0, 0.0, 2.0, 2.0).unwrap(),
            &Paint { shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(255, 0, 0, 255)), ..Paint::default() },
            Transform::identity(),
            None,
        );
        let img = Image::from_pixmap(pixmap, Scale::ONE);

        let mut c = canvas(8, 8);
        c.draw_image_region(&img, Rect::new(0.0, 0.0, 4.0, 4.0), Rect::new(2.0, 0.0, 2.0, 2.0));
        assert_eq!(px(&c, 1, 1), BLUE);
        assert_eq!(px(&c, 3, 3), BLUE);
        assert_eq!(px(&c, 5, 5), CLEAR);

        // Truncates to an empty source: no-op.
        c.draw_image_region(&img, Rect::new(4.0, 4.0, 4.0, 4.0), Rect::new(0.2, 0.2, 0.5, 0.5));
        assert_eq!(px(&c, 5, 5), CLEAR);
    }

    #[test]
    fn image_region_past_the_edge_keeps_its_scale() {
        let mut pixmap = Pixmap::new(4, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        let img = Image::from_pixmap(pixmap, Scale::ONE);

        // Columns 2..6 requested from a 4-wide image: only the left half of dst is covered.
        let mut c = canvas(8, 8);
        c.draw_image_region(&img, Rect::new(0.0, 0.0, 8.0, 8.0), Rect::new(2.0, 0.0, 4.0, 2.0));
        assert_eq!(px(&c, 1, 1), BLUE);
        assert_eq!(px(&c, 2, 6), BLUE);
        assert_eq!(px(&c, 6, 1), CLEAR);
        assert_eq!(px(&c, 5, 6), CLEAR);
    }

    #[test]
    fn pending_image_draws_nothing() {
        let pending = Image::placeholder(4.0, 4.0);
        let mut c = canvas(8, 8);
        c.draw_image(&pending, 0.0, 0.0)
            .draw_image_scaled(&pending, 0.0, 0.0, 8.0, 8.0)
            .draw_image_centered(&pending, 4.0, 4.0)
            .draw_image_region(&pending, Rect::new(0.0, 0.0, 8.0, 8.0), Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(c.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn snapshot_and_png() {
        let mut c = canvas(3, 3);
        c.set_fill_color(red()).fill_rect(0.0, 0.0, 3.0, 3.0);
        let snap = c.snapshot();
        assert!(snap.is_ready());
        assert_eq!(snap.width(), 3.0);

        let png = c.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_text_without_font_is_a_no_op() {
        let mut c = canvas(40, 20);
        c.draw_text("hello", 2.0, 15.0);
        assert!(c.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn draw_text_paints_with_fill() {
        let Some(font) = crate::text::system_font() else { return };
        let mut c = canvas(80, 40);
        c.set_default_font(TextFormat::new(font, 24.0)).set_fill_color(red());
        c.draw_text("HH", 4.0, 30.0);

        let painted: Vec<[u8; 4]> = (0..40)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| px(&c, x, y))
            .filter(|p| p[3] > 200)
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|p| p[0] > 200 && p[2] < 40));
        // Nothing above the cap height of a 24px font drawn at baseline 30.
        assert!((0..80).all(|x| px(&c, x, 2)[3] == 0));
    }

    #[test]
    fn src_text_leaves_the_backdrop_outside_glyphs() {
        let Some(font) = crate::text::system_font() else { return };
        let mut c = canvas(60, 40);
        c.set_fill_color(blue()).fill_rect(0.0, 0.0, 60.0, 40.0);
        c.set_default_font(TextFormat::new(font, 24.0))
            .set_composite_operation(Composite::Src)
            .set_fill_color(red())
            .draw_text("i", 10.0, 30.0);

        let pixels: Vec<[u8; 4]> = (0..40)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .map(|(x, y)| px(&c, x, y))
            .collect();
        assert!(pixels.iter().all(|p| p[3] == 255));
        assert!(pixels.iter().any(|p| *p == RED));
        assert_eq!(px(&c, 50, 5), BLUE);
    }

    #[test]
    fn text_honors_clip() {
        let Some(font) = crate::text::system_font() else { return };
        let layout = TextLayout::new("MMMM", &TextFormat::new(font, 24.0), None);
        let mut c = canvas(120, 40);
        c.clip_rect(0.0, 0.0, 10.0, 40.0).set_fill_color(blue());
        c.draw_text_layout(&layout, 0.0, 0.0);
        assert!((0..40).all(|y| (12..120).all(|x| px(&c, x, y)[3] == 0)));
    }
}
