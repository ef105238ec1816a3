//! Asset resolution for the desktop platform.
//!
//! [`AssetResolver`] maps logical asset paths to streams, bytes, text, fonts,
//! images and sounds. Lookups try the primary [`ResourceLookup`] first (with
//! the configured path prefix), then each search directory in order.
//!
//! Images are resolved against a target [`Scale`]: higher-resolution
//! variants (`hero@2x.png`) are tried first and shrunk to the target, never
//! enlarged. Missing variants are skipped; corrupt ones end the load.

mod config;
mod error;
mod image;
mod lookup;
mod remote;
mod resolver;
mod scale;
mod sound;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::AssetConfig;
pub use error::{AssetError, AssetResult, DecodeSource};
pub use self::image::{pixel_at, Image, ImageData};
pub use lookup::{AssetStream, AssetUrl, DirectoryLookup, EmbeddedLookup, ResourceLookup};
pub use remote::{HttpFetcher, RemoteFetcher};
pub use resolver::{AssetResolver, DEFAULT_PATH_PREFIX, SOUND_SUFFIXES};
pub use scale::{Scale, ScaledResource};
pub use sound::{AudioDecoder, SampleDecoder, Sound, SoundData};
