use thiserror::Error;

use super::model::Side;

/// Why an image never made it into a slot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The picked or dropped file is not image data. Callers ignore it silently.
    #[error("{0} is not an image file")]
    NotAnImage(String),

    #[error("Could not read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// A bundled default image was missing or unreadable.
    #[error("Failed to load default {} image", .0.label())]
    DefaultUnavailable(Side),
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("{} image is not loaded yet", .0.label())]
    NotReady(Side),

    #[error("Image scale must be a number in (0, {max}], got {scale}")]
    InvalidScale { scale: f64, max: f64 },

    #[error("Stereograph of {width}x{height} is too large to generate")]
    TooLarge { width: u64, height: u64 },
}
