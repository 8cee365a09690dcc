//! Error types for the slider-captcha crate.

use std::fmt::Display;

/// Errors that can occur while generating a slider challenge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A background, piece template, or font could not be supplied.
    #[error("resource unavailable ({resource}): {reason}")]
    ResourceUnavailable {
        /// Which resource was requested (catalog name or file path).
        resource: String,
        /// Why it could not be supplied.
        reason: String,
    },

    /// No non-overlapping pair of offsets was found within the retry ceiling.
    #[error(
        "no placement for {piece_width}px piece and {decoy_width}px decoy on \
         {background_width}px background after {attempts} attempts"
    )]
    PlacementInfeasible {
        /// Background width in pixels.
        background_width: u32,
        /// Real piece width in pixels.
        piece_width: u32,
        /// Decoy piece width in pixels.
        decoy_width: u32,
        /// Number of decoy samples drawn before giving up.
        attempts: u32,
    },

    /// A piece template does not fit inside the background.
    #[error("background ({width}x{height}) too small for {piece_width}x{piece_height} piece")]
    BackgroundTooSmall {
        /// Background width in pixels.
        width: u32,
        /// Background height in pixels.
        height: u32,
        /// Piece width in pixels.
        piece_width: u32,
        /// Piece height in pixels.
        piece_height: u32,
    },

    /// Drawing the watermark text failed.
    #[error("watermark render failed: {0}")]
    RenderFailure(String),

    /// An I/O error occurred while writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding an image failed.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn unavailable(resource: impl Into<String>, reason: &impl Display) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
