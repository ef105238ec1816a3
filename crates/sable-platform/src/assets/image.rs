use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use image::RgbaImage;
use tiny_skia::{IntSize, Pixmap, PremultipliedColorU8};

use super::{AssetError, AssetResult, Scale};

/// Decoded pixels of an image together with the scale they were authored at.
#[derive(Debug)]
pub struct ImageData {
    pixmap: Pixmap,
    scale: Scale,
}

impl ImageData {
    pub fn new(pixmap: Pixmap, scale: Scale) -> Self {
        Self { pixmap, scale }
    }

    /// Premultiplied RGBA pixels.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Logical width (pixel width / scale).
    pub fn width(&self) -> f32 {
        self.scale.inv_scaled(self.pixmap.width() as f32)
    }

    /// Logical height (pixel height / scale).
    pub fn height(&self) -> f32 {
        self.scale.inv_scaled(self.pixmap.height() as f32)
    }
}

type ResolvedCallback = Box<dyn FnOnce(Result<&ImageData, &AssetError>) + Send>;

enum CellState {
    Pending(Vec<ResolvedCallback>),
    Ready(Arc<ImageData>),
    Failed(Arc<AssetError>),
}

struct Shared {
    placeholder_width: f32,
    placeholder_height: f32,
    state: Mutex<CellState>,
    resolved: Condvar,
}

/// Shared handle to an image that is either loaded, still loading, or failed.
///
/// Images loaded from local assets are ready on creation. Remote images start
/// as a placeholder of the requested size and are resolved exactly once from
/// the fetching thread; drawing a placeholder is a no-op. Clones share the
/// same resolution.
#[derive(Clone)]
pub struct Image {
    shared: Arc<Shared>,
}

impl Image {
    /// Wraps already decoded pixels.
    pub fn from_pixmap(pixmap: Pixmap, scale: Scale) -> Self {
        let data = ImageData::new(pixmap, scale);
        let (w, h) = (data.width(), data.height());
        Self::with_state(w, h, CellState::Ready(Arc::new(data)))
    }

    /// Unresolved placeholder reporting `width` × `height` until it resolves.
    pub(crate) fn placeholder(width: f32, height: f32) -> Self {
        Self::with_state(width, height, CellState::Pending(Vec::new()))
    }

    fn with_state(width: f32, height: f32, state: CellState) -> Self {
        Self {
            shared: Arc::new(Shared {
                placeholder_width: width,
                placeholder_height: height,
                state: Mutex::new(state),
                resolved: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CellState> {
        // A panicking callback never runs under the lock, so poisoning only
        // means another thread died mid-resolve; the state itself is consistent.
        self.shared.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pixels, if the image has resolved successfully.
    pub fn data(&self) -> Option<Arc<ImageData>> {
        match &*self.lock() {
            CellState::Ready(data) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    /// The failure, if the image failed to resolve.
    pub fn error(&self) -> Option<Arc<AssetError>> {
        match &*self.lock() {
            CellState::Failed(err) => Some(Arc::clone(err)),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.lock(), CellState::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.lock(), CellState::Pending(_))
    }

    /// Logical width; the placeholder width while pending or failed.
    pub fn width(&self) -> f32 {
        self.data().map_or(self.shared.placeholder_width, |d| d.width())
    }

    /// Logical height; the placeholder height while pending or failed.
    pub fn height(&self) -> f32 {
        self.data().map_or(self.shared.placeholder_height, |d| d.height())
    }

    /// Scale of the resolved pixels, [`Scale::ONE`] while unresolved.
    pub fn scale(&self) -> Scale {
        self.data().map_or(Scale::ONE, |d| d.scale())
    }

    /// Registers `callback` to run once the image resolves.
    ///
    /// Runs immediately on the calling thread when already resolved,
    /// otherwise on the thread that resolves the image.
    pub fn on_resolved<F>(&self, callback: F)
    where
        F: FnOnce(Result<&ImageData, &AssetError>) + Send + 'static,
    {
        let mut state = self.lock();
        let outcome = match &mut *state {
            CellState::Pending(callbacks) => {
                callbacks.push(Box::new(callback));
                return;
            }
            CellState::Ready(data) => Ok(Arc::clone(data)),
            CellState::Failed(err) => Err(Arc::clone(err)),
        };
        drop(state);
        match &outcome {
            Ok(data) => callback(Ok(data.as_ref())),
            Err(err) => callback(Err(err.as_ref())),
        }
    }

    /// Blocks until the image resolves.
    pub fn wait(&self) -> Result<Arc<ImageData>, Arc<AssetError>> {
        let mut state = self.lock();
        loop {
            match &*state {
                CellState::Ready(data) => return Ok(Arc::clone(data)),
                CellState::Failed(err) => return Err(Arc::clone(err)),
                CellState::Pending(_) => {}
            }
            state = self
                .shared
                .resolved
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`, returning `None`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Arc<ImageData>, Arc<AssetError>>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            match &*state {
                CellState::Ready(data) => return Some(Ok(Arc::clone(data))),
                CellState::Failed(err) => return Some(Err(Arc::clone(err))),
                CellState::Pending(_) => {}
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            state = self
                .shared
                .resolved
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .0;
        }
    }

    /// Resolves a pending image. Later calls are ignored.
    ///
    /// Returns `false` when the image had already resolved.
    pub(crate) fn resolve(&self, result: AssetResult<ImageData>) -> bool {
        let mut state = self.lock();
        let CellState::Pending(callbacks) = &mut *state else {
            log::warn!("image already resolved; dropping second resolution");
            return false;
        };
        let callbacks = std::mem::take(callbacks);
        *state = match result {
            Ok(data) => CellState::Ready(Arc::new(data)),
            Err(err) => CellState::Failed(Arc::new(err)),
        };
        let outcome = match &*state {
            CellState::Ready(data) => Ok(Arc::clone(data)),
            CellState::Failed(err) => Err(Arc::clone(err)),
            CellState::Pending(_) => unreachable!("state was just resolved"),
        };
        drop(state);
        self.shared.resolved.notify_all();

        for callback in callbacks {
            match &outcome {
                Ok(data) => callback(Ok(data.as_ref())),
                Err(err) => callback(Err(err.as_ref())),
            }
        }
        true
    }
}

impl PartialEq for Image {
    /// Handles are equal when they share a resolution cell.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &*self.lock() {
            CellState::Pending(_) => "pending",
            CellState::Ready(_) => "ready",
            CellState::Failed(_) => "failed",
        };
        f.debug_struct("Image")
            .field("status", &status)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

// ── decoding ──────────────────────────────────────────────────────────────

/// Decodes encoded image bytes (PNG, JPEG, BMP, GIF) into straight RGBA.
pub(crate) fn decode_rgba(path: &str, bytes: &[u8]) -> AssetResult<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|e| AssetError::decode(path, e))?;
    Ok(img.to_rgba8())
}

/// Shrinks `img` by `ratio` (< 1) with a smooth filter; sizes round up.
pub(crate) fn downscale(img: &RgbaImage, ratio: f32) -> RgbaImage {
    let width = ((ratio * img.width() as f32).ceil() as u32).max(1);
    let height = ((ratio * img.height() as f32).ceil() as u32).max(1);
    image::imageops::resize(img, width, height, FilterType::Triangle)
}

/// Converts straight RGBA into a premultiplied pixmap.
pub(crate) fn to_pixmap(path: &str, img: RgbaImage) -> AssetResult<Pixmap> {
    let (width, height) = img.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| AssetError::decode(path, format!("image has no pixels ({width}x{height})")))?;

    let mut data = img.into_raw();
    for px in data.chunks_exact_mut(4) {
        let premul = tiny_skia::ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        px.copy_from_slice(&[premul.red(), premul.green(), premul.blue(), premul.alpha()]);
    }

    Pixmap::from_vec(data, size)
        .ok_or_else(|| AssetError::decode(path, "pixel buffer does not match image size"))
}

/// Decode + premultiply at a single scale, used for remote images.
pub(crate) fn decode_image(path: &str, bytes: &[u8], scale: Scale) -> AssetResult<ImageData> {
    let rgba = decode_rgba(path, bytes)?;
    Ok(ImageData::new(to_pixmap(path, rgba)?, scale))
}

/// Reads one pixel back as straight RGBA; mostly useful for inspection and tests.
pub fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> Option<[u8; 4]> {
    let px: PremultipliedColorU8 = pixmap.pixel(x, y)?;
    let c = px.demultiply();
    Some([c.red(), c.green(), c.blue(), c.alpha()])
}
