//! Error types for dendrogram rendering.

use std::io;
use std::path::PathBuf;

use linkplot_core::define_error_codes;
use thiserror::Error;

/// Errors raised while configuring, drawing or saving a dendrogram image.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image dimensions were outside the supported range.
    #[error("image size {width}x{height} is outside the supported edge range {minimum}..={maximum} pixels")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Smallest accepted edge length.
        minimum: u32,
        /// Largest accepted edge length.
        maximum: u32,
    },
    /// The directory that should hold the output image does not exist.
    #[error("output directory `{path}` does not exist")]
    MissingOutputDirectory {
        /// Directory that was expected to exist.
        path: PathBuf,
    },
    /// The PNG encoder rejected the pixel buffer.
    #[error("failed to encode png: {source}")]
    Encode {
        /// Underlying encoder failure.
        #[source]
        source: Box<image::ImageError>,
    },
    /// Staging or renaming the PNG file failed.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Destination of the image.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The plotting backend rejected a drawing operation.
    #[error("failed to draw dendrogram: {message}")]
    Drawing {
        /// Description reported by the plotting backend.
        message: String,
    },
    /// A font file could not be read.
    #[error("failed to read font `{path}`: {source}")]
    FontRead {
        /// Font file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A font file was not a usable TrueType or OpenType font.
    #[error("`{path}` is not a usable TrueType/OpenType font")]
    InvalidFont {
        /// Font file path.
        path: PathBuf,
    },
}

define_error_codes! {
    /// Stable codes describing [`RenderError`] variants.
    enum RenderErrorCode for RenderError {
        /// Image dimensions were outside the supported range.
        InvalidDimensions => InvalidDimensions { .. } => "RENDER_INVALID_DIMENSIONS",
        /// The output directory does not exist.
        MissingOutputDirectory => MissingOutputDirectory { .. } => "RENDER_MISSING_OUTPUT_DIRECTORY",
        /// The PNG encoder rejected the pixel buffer.
        Encode => Encode { .. } => "RENDER_ENCODE",
        /// Staging or renaming the PNG file failed.
        Write => Write { .. } => "RENDER_WRITE",
        /// The plotting backend rejected a drawing operation.
        Drawing => Drawing { .. } => "RENDER_DRAWING",
        /// A font file could not be read.
        FontRead => FontRead { .. } => "RENDER_FONT_READ",
        /// A font file was not usable.
        InvalidFont => InvalidFont { .. } => "RENDER_INVALID_FONT",
    }
}

impl RenderError {
    /// Returns `true` when the failure concerns the output location rather
    /// than the drawing itself.
    #[must_use]
    pub const fn is_output_access(&self) -> bool {
        matches!(self, Self::MissingOutputDirectory { .. } | Self::Write { .. })
    }
}
