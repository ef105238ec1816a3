//! Font loading and text layout on top of `fontdue`.

mod font;
mod layout;

pub use font::{Font, FontLoadError, TextFormat};
pub use layout::{PlacedGlyph, TextLayout};

#[cfg(test)]
pub(crate) fn system_font() -> Option<Font> {
    const CANDIDATES: [&str; 3] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
    ];
    CANDIDATES
        .iter()
        .find_map(|p| std::fs::read(p).ok())
        .and_then(|bytes| Font::from_bytes(&bytes).ok())
}
