use std::fmt;
use std::sync::Arc;

/// Error returned by [`Font::from_bytes`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Shared handle to a parsed font. Cloning is cheap.
#[derive(Clone)]
pub struct Font {
    inner: Arc<fontdue::Font>,
}

impl Font {
    /// Parses a TrueType or OpenType font from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        Ok(Self { inner: Arc::new(font) })
    }

    pub(crate) fn raw(&self) -> &fontdue::Font {
        &self.inner
    }

    /// Distance from the top of a line to its baseline at `size` pixels.
    pub fn ascent(&self, size: f32) -> f32 {
        self.inner
            .horizontal_line_metrics(size)
            .map_or(size * 0.8, |m| m.ascent)
    }

    pub fn ptr_eq(&self, other: &Font) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.inner.name())
            .field("glyphs", &self.inner.glyph_count())
            .finish()
    }
}

/// Font and pixel size used to lay out a string.
#[derive(Debug, Clone)]
pub struct TextFormat {
    pub font: Font,
    pub size: f32,
}

impl TextFormat {
    pub fn new(font: Font, size: f32) -> Self {
        Self { font, size }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}
