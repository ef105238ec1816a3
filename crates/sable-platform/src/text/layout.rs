use fontdue::layout::{
    CoordinateSystem, GlyphPosition, GlyphRasterConfig, Layout, LayoutSettings, TextStyle,
};
use tiny_skia::Mask;

use super::{Font, TextFormat};

/// A glyph positioned relative to the layout's top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph {
    pub(crate) key: GlyphRasterConfig,
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
}

/// A string shaped once with a [`TextFormat`] and drawn any number of times.
#[derive(Debug, Clone)]
pub struct TextLayout {
    font: Font,
    size: f32,
    glyphs: Vec<PlacedGlyph>,
    width: f32,
    height: f32,
    ascent: f32,
}

impl TextLayout {
    /// Lays out `text`, wrapping at `max_width` when given.
    pub fn new(text: &str, format: &TextFormat, max_width: Option<f32>) -> Self {
        let font = format.font.raw();
        let size = format.size;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let raw = layout.glyphs();

        // Widest line as the sum of its rounded-up pen advances, the same
        // total the wrapper compares with `max_width`.
        let advance = |g: &GlyphPosition<()>| {
            if g.char_data.is_control() {
                0.0
            } else {
                font.metrics_indexed(g.key.glyph_index, size).advance_width.ceil()
            }
        };
        let width = layout
            .lines()
            .into_iter()
            .flatten()
            .map(|line| {
                raw.get(line.glyph_start..=line.glyph_end)
                    .unwrap_or(&[])
                    .iter()
                    .map(&advance)
                    .sum::<f32>()
            })
            .fold(0.0f32, f32::max);
        let height = raw
            .iter()
            .map(|g| g.y + g.height as f32)
            .fold(layout.height().max(size), f32::max);

        let glyphs = raw
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| PlacedGlyph { key: g.key, x: g.x, y: g.y, width: g.width, height: g.height })
            .collect();

        Self {
            font: format.font.clone(),
            size,
            glyphs,
            width,
            height,
            ascent: format.font.ascent(size),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Distance from the top of the first line to its baseline.
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn glyphs(&self) -> &[PlacedGlyph] {
        &self.glyphs
    }

    /// Writes glyph coverage into `mask`, offset by `(dx, dy)`.
    ///
    /// Overlapping glyphs keep the larger coverage. Pixels outside the mask
    /// are dropped.
    pub(crate) fn rasterize_into(&self, mask: &mut Mask, dx: f32, dy: f32) {
        let mw = mask.width() as i64;
        let mh = mask.height() as i64;
        let data = mask.data_mut();

        for glyph in &self.glyphs {
            let (metrics, bitmap) = self.font.raw().rasterize_config(glyph.key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            let ox = (glyph.x + dx).round() as i64;
            let oy = (glyph.y + dy).round() as i64;

            for row in 0..metrics.height {
                let y = oy + row as i64;
                if y < 0 || y >= mh {
                    continue;
                }
                for col in 0..metrics.width {
                    let x = ox + col as i64;
                    if x < 0 || x >= mw {
                        continue;
                    }
                    let coverage = bitmap[row * metrics.width + col];
                    let dst = &mut data[(y * mw + x) as usize];
                    *dst = (*dst).max(coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::system_font;

    fn format(size: f32) -> Option<TextFormat> {
        system_font().map(|f| TextFormat::new(f, size))
    }

    #[test]
    fn empty_text_has_no_glyphs() {
        let Some(fmt) = format(16.0) else { return };
        let layout = TextLayout::new("", &fmt, None);
        assert!(layout.glyphs().is_empty());
        assert_eq!(layout.width(), 0.0);
        assert!(layout.height() >= 16.0);
    }

    #[test]
    fn longer_text_is_wider() {
        let Some(fmt) = format(16.0) else { return };
        let short = TextLayout::new("Hi", &fmt, None);
        let long = TextLayout::new("Hi there", &fmt, None);
        assert!(long.width() > short.width());
        assert!(short.ascent() > 0.0 && short.ascent() < short.height());
    }

    #[test]
    fn measured_width_does_not_wrap_when_reused() {
        let Some(fmt) = format(18.0) else { return };
        let free = TextLayout::new("wrap me not", &fmt, None);
        let bounded = TextLayout::new("wrap me not", &fmt, Some(free.width()));
        assert_eq!(bounded.height(), free.height());
    }

    #[test]
    fn narrow_width_wraps_onto_more_lines() {
        let Some(fmt) = format(18.0) else { return };
        let free = TextLayout::new("one two three four", &fmt, None);
        let wrapped = TextLayout::new("one two three four", &fmt, Some(free.width() / 3.0));
        assert!(wrapped.height() > free.height());
    }

    #[test]
    fn rasterized_coverage_lands_in_mask() {
        let Some(fmt) = format(24.0) else { return };
        let layout = TextLayout::new("X", &fmt, None);
        let mut mask = Mask::new(layout.width().ceil() as u32 + 2, layout.height().ceil() as u32 + 2).unwrap();
        layout.rasterize_into(&mut mask, 1.0, 1.0);
        assert!(mask.data().iter().any(|&c| c > 200));
    }
}
