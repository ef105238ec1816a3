use crate::assets::{Image, ImageData};

/// Image-backed fill source.
///
/// The pattern keeps a handle to its image; a pattern over an image that is
/// still loading paints nothing until the image resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    image: Image,
    repeat: bool,
}

impl Pattern {
    /// `repeat = false` clamps to the edge pixels outside the image bounds.
    pub fn new(image: Image, repeat: bool) -> Self {
        Self { image, repeat }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Shader sampling `data` in logical units (pixel size / image scale).
    pub(crate) fn to_shader<'a>(&self, data: &'a ImageData, alpha: f32) -> tiny_skia::Shader<'a> {
        let spread = if self.repeat {
            tiny_skia::SpreadMode::Repeat
        } else {
            tiny_skia::SpreadMode::Pad
        };
        let inv = 1.0 / data.scale().factor();
        tiny_skia::Pattern::new(
            data.pixmap().as_ref(),
            spread,
            tiny_skia::FilterQuality::Bilinear,
            alpha.clamp(0.0, 1.0),
            tiny_skia::Transform::from_scale(inv, inv),
        )
    }
}
