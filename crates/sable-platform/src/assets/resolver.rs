use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use super::image::{decode_rgba, downscale, to_pixmap};
use super::lookup::join_under;
use super::remote::spawn_fetch;
use super::{
    AssetConfig, AssetError, AssetResult, AssetStream, AssetUrl, AudioDecoder, DirectoryLookup,
    EmbeddedLookup, HttpFetcher, Image, RemoteFetcher, ResourceLookup, SampleDecoder, Scale, Sound,
};
use crate::text::Font;

/// Path prefix used until [`AssetResolver::set_path_prefix`] is called.
pub const DEFAULT_PATH_PREFIX: &str = "assets/";

/// Extensions tried, in order, when loading a sound by its extension-less path.
pub const SOUND_SUFFIXES: [&str; 2] = [".wav", ".mp3"];

/// Resolves logical asset paths against a primary lookup and fallback directories.
///
/// Owned by a single caller; configure it at startup, then read from it on
/// every load. Only remote image fetches leave the calling thread.
pub struct AssetResolver {
    lookup: Box<dyn ResourceLookup>,
    path_prefix: String,
    directories: Vec<PathBuf>,
    asset_scale: Option<Scale>,
    audio: Box<dyn AudioDecoder>,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl AssetResolver {
    /// Resolver over `lookup` with the default prefix, no search directories,
    /// the default audio decoder and the HTTP fetcher.
    pub fn new(lookup: impl ResourceLookup + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            directories: Vec::new(),
            asset_scale: None,
            audio: Box::new(SampleDecoder),
            fetcher: Arc::new(HttpFetcher),
        }
    }

    /// Builds a resolver from startup configuration.
    ///
    /// # Errors
    /// [`AssetError::InvalidArgument`] when the configured prefix is malformed.
    pub fn from_config(config: &AssetConfig) -> AssetResult<Self> {
        let mut resolver = match &config.resource_root {
            Some(root) => Self::new(DirectoryLookup::new(root)),
            None => Self::new(EmbeddedLookup::new()),
        };
        resolver.set_path_prefix(&config.path_prefix)?;
        for dir in &config.directories {
            resolver.add_search_directory(dir);
        }
        if let Some(factor) = config.asset_scale {
            resolver.set_asset_scale(factor);
        }
        Ok(resolver)
    }

    pub fn with_audio_decoder(mut self, decoder: impl AudioDecoder + 'static) -> Self {
        self.audio = Box::new(decoder);
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl RemoteFetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    // ── configuration ─────────────────────────────────────────────────────

    /// Sets the prefix prepended to paths in the primary lookup.
    ///
    /// The prefix always uses `/` and must not start or end with it. It is
    /// not applied to search directories.
    ///
    /// # Errors
    /// [`AssetError::InvalidArgument`] for a leading or trailing `/`.
    pub fn set_path_prefix(&mut self, prefix: &str) -> AssetResult<()> {
        if prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(AssetError::InvalidArgument(format!(
                "path prefix must not start or end with '/': {prefix:?}"
            )));
        }
        self.path_prefix = if prefix.is_empty() { String::new() } else { format!("{prefix}/") };
        Ok(())
    }

    /// Current prefix, with its trailing `/` (empty when unset).
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Appends a fallback directory. Earlier directories win.
    pub fn add_search_directory(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        log::debug!("asset search directory added: {}", dir.display());
        self.directories.push(dir);
    }

    pub fn search_directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Scale used to enumerate image variants, overriding each load's target.
    ///
    /// Lets a 1.0 display prefer 1.5x art (shrunk) over 1x art, or a 1.5
    /// display shrink 2x art instead of stretching 1x art.
    pub fn set_asset_scale(&mut self, factor: f32) {
        self.asset_scale = Some(Scale::new(factor));
    }

    pub fn asset_scale(&self) -> Option<Scale> {
        self.asset_scale
    }

    // ── resolution ────────────────────────────────────────────────────────

    /// Opens `path`: primary lookup of `prefix + path`, then `dir/path` for
    /// each search directory in order.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] when no location has the file;
    /// [`AssetError::Io`] when a location has it but it cannot be opened.
    pub fn resolve_stream(&self, path: &str) -> AssetResult<AssetStream> {
        let name = self.prefixed(path);
        if let Some(stream) = self.lookup.open(&name).map_err(|e| AssetError::io(&name, e))? {
            log::trace!("{path}: primary lookup");
            return Ok(stream);
        }
        let file = self.find_in_directories(path).ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        log::trace!("{path}: {}", file.display());
        let stream = File::open(&file).map_err(|e| AssetError::io(file.display().to_string(), e))?;
        Ok(Box::new(stream))
    }

    /// Like [`resolve_stream`](Self::resolve_stream) but returns where the asset lives.
    /// Directory matches are canonicalized.
    pub fn resolve_url(&self, path: &str) -> AssetResult<AssetUrl> {
        let name = self.prefixed(path);
        if let Some(url) = self.lookup.url(&name).map_err(|e| AssetError::io(&name, e))? {
            return Ok(url);
        }
        let file = self.find_in_directories(path).ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        let canonical = file
            .canonicalize()
            .map_err(|e| AssetError::io(file.display().to_string(), e))?;
        Ok(AssetUrl::File(canonical))
    }

    fn prefixed(&self, path: &str) -> String {
        format!("{}{}", self.path_prefix, path)
    }

    fn find_in_directories(&self, path: &str) -> Option<PathBuf> {
        self.directories
            .iter()
            .map(|dir| join_under(dir, path))
            .find(|candidate| candidate.is_file())
    }

    /// Reads the whole resolved asset.
    pub fn get_bytes_sync(&self, path: &str) -> AssetResult<Vec<u8>> {
        let mut stream = self.resolve_stream(path)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).map_err(|e| AssetError::io(path, e))?;
        Ok(bytes)
    }

    /// Reads the whole resolved asset as UTF-8.
    ///
    /// # Errors
    /// Resolution errors, or [`AssetError::Decode`] for invalid UTF-8.
    pub fn get_text_sync(&self, path: &str) -> AssetResult<String> {
        let bytes = self.get_bytes_sync(path)?;
        String::from_utf8(bytes).map_err(|e| AssetError::decode(path, e))
    }

    // ── typed loads ───────────────────────────────────────────────────────

    /// Loads the best available scale variant of `path` for `target`.
    ///
    /// Candidates come from the asset scale (or `target` when unset), highest
    /// resolution first. A missing candidate moves on to the next one; any
    /// other failure stops the search. A result authored above `target` is
    /// shrunk to `target`.
    ///
    /// # Errors
    /// [`AssetError::ImageLoad`] wrapping the last candidate's error.
    pub fn load_image(&self, path: &str, target: Scale) -> AssetResult<Image> {
        let enumerate_at = self.asset_scale.unwrap_or(target);
        let mut last_err = None;

        for rsrc in enumerate_at.scaled_resources(path) {
            let decoded = self
                .get_bytes_sync(&rsrc.path)
                .and_then(|bytes| decode_rgba(&rsrc.path, &bytes));
            let rgba = match decoded {
                Ok(rgba) => rgba,
                Err(err) if err.is_not_found() => {
                    log::debug!("{path}: no {} variant ({})", rsrc.scale, rsrc.path);
                    last_err = Some(err);
                    continue;
                }
                Err(err) => {
                    last_err = Some(err);
                    break;
                }
            };

            let ratio = target.factor() / rsrc.scale.factor();
            let (rgba, scale) = if ratio < 1.0 {
                log::debug!("{path}: shrinking {} art to {target}", rsrc.scale);
                (downscale(&rgba, ratio), target)
            } else {
                (rgba, rsrc.scale)
            };
            return to_pixmap(&rsrc.path, rgba).map(|pixmap| Image::from_pixmap(pixmap, scale));
        }

        let source = last_err.unwrap_or_else(|| AssetError::NotFound(path.to_string()));
        log::warn!("could not load image {path}: {source}");
        Err(AssetError::ImageLoad { path: path.to_string(), source: Box::new(source) })
    }

    /// Starts fetching an image over HTTP and returns a `width` × `height`
    /// placeholder immediately. Failures land in the placeholder.
    pub fn load_remote_image(&self, url: &str, width: f32, height: f32) -> Image {
        spawn_fetch(Arc::clone(&self.fetcher), url, width, height)
    }

    /// Loads a sound effect or music track from `path` + each of [`SOUND_SUFFIXES`].
    ///
    /// Never fails: when every suffix fails, the returned sound is an error
    /// sentinel carrying the last failure.
    pub fn load_sound(&self, path: &str, music: bool) -> Sound {
        let mut last_err = None;
        for suffix in SOUND_SUFFIXES {
            let sound_path = format!("{path}{suffix}");
            let loaded = self
                .resolve_stream(&sound_path)
                .and_then(|stream| self.audio.create_sound(&sound_path, stream, music));
            match loaded {
                Ok(sound) => return sound,
                Err(err) => {
                    log::debug!("{sound_path}: {err}");
                    last_err = Some(err);
                }
            }
        }
        let err = last_err.unwrap_or_else(|| AssetError::NotFound(path.to_string()));
        log::warn!("sound load error {path}: {err}");
        Sound::error(err)
    }

    pub fn sound(&self, path: &str) -> Sound {
        self.load_sound(path, false)
    }

    pub fn music(&self, path: &str) -> Sound {
        self.load_sound(path, true)
    }

    /// Loads a TrueType/OpenType font.
    pub fn load_font(&self, path: &str) -> AssetResult<Font> {
        let bytes = self.get_bytes_sync(path)?;
        Font::from_bytes(&bytes).map_err(|e| AssetError::decode(path, e))
    }
}
