use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageReader, RgbaImage};

use super::error::LoadError;
use super::model::{Bitmap, LoadOrigin, LoadToken, Side};

// ---------------------------------------------------------------------------
// Image sources and acceptance
// ---------------------------------------------------------------------------

/// Something that may decode into a [`Bitmap`].
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    /// Dropped data without a filesystem path.
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    /// Short name used in messages.
    pub fn name(&self) -> String {
        match self {
            ImageSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Whether this looks like an image the decoder can read.
    pub fn is_image(&self) -> bool {
        match self {
            ImageSource::Path(path) => is_image_path(path),
            ImageSource::Bytes { bytes, .. } => is_image_bytes(bytes),
        }
    }
}

/// Judge a path by its extension.
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .map(|f| f.reading_enabled())
        .unwrap_or(false)
}

/// Judge raw data by its magic number.
pub fn is_image_bytes(bytes: &[u8]) -> bool {
    image::guess_format(bytes)
        .map(|f| f.reading_enabled())
        .unwrap_or(false)
}

/// Extensions offered by the file picker.
pub fn picker_extensions() -> Vec<&'static str> {
    ImageFormat::all()
        .filter(|f| f.reading_enabled())
        .flat_map(|f| f.extensions_str().iter().copied())
        .collect()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode to RGBA8. Format is sniffed from content, not trusted from the name.
pub fn decode(source: &ImageSource) -> Result<Bitmap, LoadError> {
    if !source.is_image() {
        return Err(LoadError::NotAnImage(source.name()));
    }

    let name = source.name();
    let decoded = match source {
        ImageSource::Path(path) => {
            let io_err = |source| LoadError::Io {
                name: name.clone(),
                source,
            };
            ImageReader::open(path)
                .map_err(io_err)?
                .with_guessed_format()
                .map_err(io_err)?
                .decode()
        }
        ImageSource::Bytes { bytes, .. } => image::load_from_memory(bytes),
    };

    let image = decoded.map_err(|source| LoadError::Decode { name, source })?;
    Ok(Bitmap::new(image.into_rgba8()))
}

/// Downscaled copy for drop zone previews. Small images come back as is.
pub fn make_thumbnail(bitmap: &Bitmap, max_side: u32) -> RgbaImage {
    let (w, h) = bitmap.dimensions();
    let longest = w.max(h);
    if longest <= max_side {
        return bitmap.as_image().clone();
    }
    let ratio = f64::from(max_side) / f64::from(longest);
    let tw = ((f64::from(w) * ratio).round() as u32).max(1);
    let th = ((f64::from(h) * ratio).round() as u32).max(1);
    imageops::resize(bitmap.as_image(), tw, th, FilterType::Triangle)
}

/// Where the bundled default image for `side` is expected.
pub fn default_source(dir: &Path, side: Side) -> ImageSource {
    ImageSource::Path(dir.join(side.default_file_name()))
}

// ---------------------------------------------------------------------------
// Background loads
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LoadRequest {
    pub side: Side,
    pub token: LoadToken,
    pub origin: LoadOrigin,
    pub source: ImageSource,
}

#[derive(Debug)]
pub struct LoadEvent {
    pub side: Side,
    pub token: LoadToken,
    pub origin: LoadOrigin,
    pub result: Result<Bitmap, LoadError>,
}

/// Decode synchronously and wrap the outcome as an event.
pub fn run_load(request: LoadRequest) -> LoadEvent {
    let LoadRequest {
        side,
        token,
        origin,
        source,
    } = request;

    let result = decode(&source).map_err(|e| match origin {
        LoadOrigin::Default => {
            log::warn!("{} failed to load: {e}", source.name());
            LoadError::DefaultUnavailable(side)
        }
        LoadOrigin::User => e,
    });

    LoadEvent {
        side,
        token,
        origin,
        result,
    }
}

/// Decode on a worker thread, send one event, then call `notify`.
///
/// There is no cancellation; superseded results are filtered by the
/// receiving [`Slot`](super::model::Slot) through the token.
pub fn spawn_load<F>(request: LoadRequest, tx: Sender<LoadEvent>, notify: F)
where
    F: Fn() + Send + 'static,
{
    log::debug!("Loading {} image from {}", request.side, request.source.name());
    std::thread::spawn(move || {
        let event = run_load(request);
        // The receiver only goes away when the window is closing.
        if tx.send(event).is_ok() {
            notify();
        }
    });
}
