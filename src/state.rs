use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::data::compose;
use crate::data::error::ComposeError;
use crate::data::loader::{self, ImageSource, LoadEvent, LoadRequest};
use crate::data::model::{LoadOrigin, Settings, Side, Slot};

// ---------------------------------------------------------------------------
// Generated output
// ---------------------------------------------------------------------------

/// The most recent stereograph. `revision` increases with every generation.
#[derive(Debug, Clone)]
pub struct Output {
    pub image: Arc<RgbaImage>,
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// The full UI state, independent of rendering.
pub struct AppState {
    pub left: Slot,
    pub right: Slot,

    /// Control panel values, read when generating.
    pub settings: Settings,

    /// Shown below the controls; `None` keeps the output hidden.
    pub output: Option<Output>,
    revision: u64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    events_tx: Sender<LoadEvent>,
    events_rx: Receiver<LoadEvent>,
    /// Called from worker threads after each finished load.
    repaint: RepaintHook,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_repaint(|| {})
    }
}

impl AppState {
    pub fn with_repaint<F>(repaint: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            left: Slot::new(Side::Left),
            right: Slot::new(Side::Right),
            settings: Settings::default(),
            output: None,
            revision: 0,
            status_message: None,
            events_tx,
            events_rx,
            repaint: Arc::new(repaint),
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    // -- Loading --

    /// Put both slots into `Loading` and fetch the bundled images from `dir`.
    pub fn load_defaults(&mut self, dir: &Path) {
        for side in Side::ALL {
            self.start_load(side, loader::default_source(dir, side), LoadOrigin::Default);
        }
    }

    /// Load a user-picked or dropped file. Non-image files are ignored and
    /// leave the slot untouched; returns whether a load was started.
    pub fn request_load(&mut self, side: Side, source: ImageSource) -> bool {
        if !source.is_image() {
            log::debug!("Ignoring non-image file {}", source.name());
            return false;
        }
        self.start_load(side, source, LoadOrigin::User);
        true
    }

    fn start_load(&mut self, side: Side, source: ImageSource, origin: LoadOrigin) {
        let token = self.slot_mut(side).begin_load(origin);
        let repaint = Arc::clone(&self.repaint);
        loader::spawn_load(
            LoadRequest {
                side,
                token,
                origin,
                source,
            },
            self.events_tx.clone(),
            move || repaint(),
        );
    }

    /// Apply finished loads to their slots.
    pub fn poll_loads(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            let LoadEvent {
                side,
                token,
                origin,
                result,
            } = event;

            let summary = match &result {
                Ok(bitmap) => {
                    format!("{side} image loaded ({}x{})", bitmap.width(), bitmap.height())
                }
                Err(e) => format!("{side} image failed: {e}"),
            };

            if !self.slot_mut(side).finish(token, result) {
                continue;
            }

            match (origin, self.slot(side).is_ready()) {
                (_, true) => log::info!("{summary}"),
                (LoadOrigin::Default, false) => log::warn!("{summary}"),
                (LoadOrigin::User, false) => log::error!("{summary}"),
            }
        }
    }

    // -- Generation --

    /// Compose the current slots with the current settings.
    ///
    /// The previous output and status are cleared first, so a failed
    /// attempt leaves nothing stale on screen.
    pub fn generate(&mut self) -> Result<u64, ComposeError> {
        self.output = None;
        self.status_message = None;

        let (left, right) = match (self.left.bitmap(), self.right.bitmap()) {
            (Some(l), Some(r)) => (l, r),
            (None, _) => return Err(not_ready(Side::Left)),
            (_, None) => return Err(not_ready(Side::Right)),
        };

        let settings = self.settings;
        match compose::compose(left, right, &settings) {
            Ok(image) => {
                self.revision += 1;
                log::info!(
                    "Generated {}x{} stereograph (scale {}, flip {})",
                    image.width(),
                    image.height(),
                    settings.scale,
                    settings.flip
                );
                self.output = Some(Output {
                    image: Arc::new(image),
                    revision: self.revision,
                });
                Ok(self.revision)
            }
            Err(e) => {
                log::warn!("Generation rejected: {e}");
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    // -- Saving --

    /// Write the current output. Without a known extension, PNG is used.
    pub fn save_output(&self, path: &Path) -> Result<PathBuf> {
        let output = self
            .output
            .as_ref()
            .context("no stereograph has been generated yet")?;

        let (path, format) = match ImageFormat::from_path(path) {
            Ok(format) if format.writing_enabled() => (path.to_path_buf(), format),
            _ => (path.with_extension("png"), ImageFormat::Png),
        };

        // JPEG has no alpha channel.
        let result = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgba8((*output.image).clone())
                .to_rgb8()
                .save_with_format(&path, format)
        } else {
            output.image.save_with_format(&path, format)
        };
        result.with_context(|| format!("writing {}", path.display()))?;

        log::info!("Saved stereograph to {}", path.display());
        Ok(path)
    }
}

/// Pressing generate early is not an error the user sees; only logged.
fn not_ready(side: Side) -> ComposeError {
    log::warn!("Images not loaded yet ({side} missing)");
    ComposeError::NotReady(side)
}
