use std::io;

use thiserror::Error;

/// Boxed codec error kept as the `source` of [`AssetError::Decode`].
pub type DecodeSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure taxonomy for asset resolution and decoding.
///
/// Only [`AssetError::NotFound`] is recoverable inside the resolver: search
/// path and scale-variant loops continue past it and stop on anything else.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The resource is absent from the primary lookup and every search directory.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The bytes were found but could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeSource,
    },

    /// Invalid configuration passed by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem or lookup failure other than absence.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// No scale variant of an image could be loaded; wraps the last attempt's error.
    #[error("could not load image {path}: {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: Box<AssetError>,
    },

    /// Remote fetch failed before any bytes could be decoded.
    #[error("remote fetch of {url} failed: {message}")]
    Remote { url: String, message: String },
}

impl AssetError {
    pub(crate) fn decode(path: impl Into<String>, source: impl Into<DecodeSource>) -> Self {
        AssetError::Decode { path: path.into(), source: source.into() }
    }

    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        AssetError::Io { path: path.into(), source }
    }

    /// True for absence, the one failure fallback loops swallow.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound(_))
    }

    /// True when decoding failed, looking through [`AssetError::ImageLoad`].
    pub fn is_decode(&self) -> bool {
        match self {
            AssetError::Decode { .. } => true,
            AssetError::ImageLoad { source, .. } => source.is_decode(),
            _ => false,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
