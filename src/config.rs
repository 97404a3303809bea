use std::path::{Path, PathBuf};

use eframe::egui::{vec2, Vec2};

use crate::data::model::Side;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Fixed layout values plus the directory holding the bundled images.
/// Nothing here is persisted or read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub asset_dir: PathBuf,
    pub window_size: Vec2,
    pub min_window_size: Vec2,
    pub zone_size: Vec2,
    /// Longest side of drop zone preview textures.
    pub thumbnail_side: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("."),
            window_size: vec2(1000.0, 800.0),
            min_window_size: vec2(640.0, 480.0),
            zone_size: vec2(280.0, 190.0),
            thumbnail_side: 512,
        }
    }
}

impl AppConfig {
    /// Default layout with the asset directory resolved: next to the
    /// executable if a default image is there, else the working directory.
    pub fn discover() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let cwd = std::env::current_dir().ok();
        let candidates: Vec<PathBuf> = exe_dir.into_iter().chain(cwd).collect();

        let asset_dir = find_asset_dir(&candidates)
            .or_else(|| candidates.last().cloned())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            asset_dir,
            ..Self::default()
        }
    }
}

/// First directory containing at least one default eye image.
pub fn find_asset_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| {
            Side::ALL
                .iter()
                .any(|side| dir.join(side.default_file_name()).is_file())
        })
        .cloned()
}
