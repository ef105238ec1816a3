use thiserror::Error;

/// Errors reported by [`Canvas`](super::Canvas).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("canvas dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    /// `restore` called with only the base state on the stack.
    #[error("restore called without a matching save")]
    StateUnderflow,

    #[error("png encoding failed: {0}")]
    Encode(String),
}
