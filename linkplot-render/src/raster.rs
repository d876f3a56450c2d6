//! In-memory RGB images and PNG encoding.

use std::io::Write;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::RenderError;

pub(crate) const BYTES_PER_PIXEL: usize = 3;

/// A rendered dendrogram held as tightly packed 8-bit RGB rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RenderedImage {
    pub(crate) const fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    pub(crate) fn buffer_len(width: u32, height: u32) -> usize {
        to_index(width) * to_index(height) * BYTES_PER_PIXEL
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGB value at `(x, y)`, or `None` outside the image.
    ///
    /// # Examples
    /// ```
    /// use linkplot_core::{ColorThreshold, DendrogramLayout, LinkageMatrix};
    /// use linkplot_render::{FontSource, PlotterBuilder};
    ///
    /// let matrix: LinkageMatrix = "0 1 1.0 2".parse().expect("valid linkage");
    /// let layout = DendrogramLayout::build(&matrix, ColorThreshold::Default);
    /// let image = PlotterBuilder::new()
    ///     .with_size(100, 80)
    ///     .with_font(FontSource::Disabled)
    ///     .build()
    ///     .expect("valid size")
    ///     .render(&layout)
    ///     .expect("render succeeds");
    /// assert_eq!(image.pixel(0, 0), Some([255, 255, 255]));
    /// assert_eq!(image.pixel(100, 0), None);
    /// ```
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (to_index(y) * to_index(self.width) + to_index(x)) * BYTES_PER_PIXEL;
        let bytes = self.pixels.get(start..start + BYTES_PER_PIXEL)?;
        <[u8; 3]>::try_from(bytes).ok()
    }

    /// Encodes the image as PNG.
    ///
    /// # Errors
    /// Returns [`RenderError::Encode`] when the encoder rejects the buffer.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut encoded = Vec::new();
        PngEncoder::new(&mut encoded)
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|source| RenderError::Encode {
                source: Box::new(source),
            })?;
        Ok(encoded)
    }

    /// Encodes the image as PNG at `path`, replacing any existing file.
    ///
    /// The bytes are staged in a temporary file beside `path`, synced, and
    /// renamed over the destination, so a failed write leaves any previous
    /// file untouched.
    ///
    /// # Errors
    /// Returns [`RenderError::Encode`] when encoding fails and
    /// [`RenderError::Write`] when staging, syncing or renaming fails.
    pub fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        let encoded = self.encode_png()?;
        let write_error = |source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        };

        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(directory).map_err(write_error)?;
        staged.write_all(&encoded).map_err(write_error)?;
        staged.flush().map_err(write_error)?;
        staged.as_file().sync_all().map_err(write_error)?;
        staged
            .persist(path)
            .map_err(|err| write_error(err.error))?;
        debug!(path = %path.display(), bytes = encoded.len(), "png written");
        Ok(())
    }
}

fn to_index(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn checker() -> RenderedImage {
        let pixels = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        RenderedImage::new(2, 2, pixels)
    }

    #[test]
    fn pixel_indexes_row_major() {
        let image = checker();
        assert_eq!(image.pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(image.pixel(1, 0), Some([0, 255, 0]));
        assert_eq!(image.pixel(0, 1), Some([0, 0, 255]));
        assert_eq!(image.pixel(1, 1), Some([255, 255, 255]));
        assert_eq!(image.pixel(2, 1), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn buffer_len_counts_three_bytes_per_pixel() {
        assert_eq!(RenderedImage::buffer_len(4, 5), 60);
    }

    #[test]
    fn write_png_reports_unwritable_destination() {
        let dir = TempDir::new().expect("temp dir must be created");
        let path = dir.path().join("missing").join("out.png");
        let err = checker().write_png(&path).expect_err("write must fail");
        assert_eq!(err.code().as_str(), "RENDER_WRITE");
        assert!(!path.exists());
    }

    #[test]
    fn write_png_onto_directory_keeps_destination_and_cleans_up() {
        let dir = TempDir::new().expect("temp dir must be created");
        let occupied = dir.path().join("out.png");
        std::fs::create_dir(&occupied).expect("blocking directory must be created");
        std::fs::write(occupied.join("keep.txt"), b"prior").expect("marker must be written");

        let err = checker()
            .write_png(&occupied)
            .expect_err("renaming over a directory must fail");

        assert_eq!(err.code().as_str(), "RENDER_WRITE");
        assert!(err.is_output_access());
        assert_eq!(
            std::fs::read(occupied.join("keep.txt")).expect("marker must remain"),
            b"prior"
        );
        let entries = std::fs::read_dir(dir.path())
            .expect("temp dir must be listable")
            .count();
        assert_eq!(entries, 1, "staged file must be removed on failure");
    }

    #[test]
    fn write_png_replaces_prior_file_without_leftovers() {
        let dir = TempDir::new().expect("temp dir must be created");
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"stale").expect("stale file must be written");

        checker().write_png(&path).expect("write must succeed");

        let bytes = std::fs::read(&path).expect("png must be readable");
        assert_eq!(bytes, checker().encode_png().expect("encode must succeed"));
        let entries = std::fs::read_dir(dir.path())
            .expect("temp dir must be listable")
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn write_png_produces_png_signature() {
        let dir = TempDir::new().expect("temp dir must be created");
        let path = dir.path().join("out.png");
        checker().write_png(&path).expect("write must succeed");
        let bytes = std::fs::read(&path).expect("png must be readable");
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
