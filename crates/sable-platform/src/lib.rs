//! Sable platform crate.
//!
//! Desktop implementation of the engine's platform services:
//! - `assets`: scale-aware resolution of images, sounds, text and fonts
//! - `canvas`: immediate-mode 2D drawing with a save/restore state stack
//!
//! Shared value types live in `coords`, `paint` and `text`.

pub mod assets;
pub mod canvas;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod text;
