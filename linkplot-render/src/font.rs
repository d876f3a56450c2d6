//! Font discovery and registration for chart text.
//!
//! The plotting backend draws text with fonts registered at runtime. A font
//! is taken from an explicit path when one is configured, otherwise the
//! platform font service is asked for its `sans-serif` face. When nothing
//! usable is found the chart is drawn without text.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use plotters::style::{FontStyle, register_font};
use tracing::{debug, info, instrument, warn};

use crate::error::RenderError;

/// Family name under which the discovered font is registered.
pub(crate) const FONT_FAMILY: &str = "sans-serif";

const MEMORY_FONT: &str = "<system font service>";

static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Where chart text should take its font from.
///
/// # Examples
/// ```
/// use linkplot_render::FontSource;
///
/// assert_eq!(FontSource::default(), FontSource::System);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Ask the platform for its sans-serif face; draw without text if it
    /// has none.
    #[default]
    System,
    /// Load the font at the given path. Failure to load it is an error.
    File(PathBuf),
    /// Draw the chart without any text.
    Disabled,
}

/// Ensures a font is registered for [`FONT_FAMILY`].
///
/// Returns `Ok(true)` when text can be drawn.
#[instrument(name = "render.font", level = "debug", err)]
pub(crate) fn prepare(source: &FontSource) -> Result<bool, RenderError> {
    match source {
        FontSource::Disabled => Ok(false),
        FontSource::File(path) => register_file(path).map(|()| true),
        FontSource::System => {
            let Some(handle) = system_sans_serif() else {
                return Ok(false);
            };
            let registered = match handle {
                Handle::Path { path, .. } => register_file(&path),
                Handle::Memory { bytes, .. } => {
                    register_bytes(Path::new(MEMORY_FONT), bytes.as_ref().clone())
                }
            };
            match registered {
                Ok(()) => Ok(true),
                Err(err) => {
                    warn!(error = %err, "system font unusable; drawing dendrogram without text");
                    Ok(false)
                }
            }
        }
    }
}

/// Resolves the generic `sans-serif` family through the platform font
/// service (fontconfig, Core Text or DirectWrite).
pub(crate) fn system_sans_serif() -> Option<Handle> {
    SystemSource::new()
        .select_best_match(&[FamilyName::SansSerif], &Properties::new())
        .inspect_err(|err| {
            warn!(error = %err, "no system sans-serif font; drawing dendrogram without text");
        })
        .ok()
}

fn register_file(path: &Path) -> Result<(), RenderError> {
    if is_registered(path) {
        return Ok(());
    }
    let bytes = fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    register_bytes(path, bytes)
}

fn is_registered(key: &Path) -> bool {
    let registered = REGISTERED.lock().unwrap_or_else(PoisonError::into_inner);
    let hit = registered.as_deref() == Some(key);
    if hit {
        debug!(font = %key.display(), "font already registered");
    }
    hit
}

fn register_bytes(key: &Path, bytes: Vec<u8>) -> Result<(), RenderError> {
    let mut registered = REGISTERED.lock().unwrap_or_else(PoisonError::into_inner);
    if registered.as_deref() == Some(key) {
        return Ok(());
    }
    // The backend keeps a `'static` reference; each distinct font is leaked once.
    let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, leaked).map_err(|_| {
        RenderError::InvalidFont {
            path: key.to_path_buf(),
        }
    })?;
    info!(font = %key.display(), "registered chart font");
    *registered = Some(key.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn disabled_source_never_draws_text() {
        let ready = prepare(&FontSource::Disabled).expect("disabled source cannot fail");
        assert!(!ready);
    }

    #[test]
    fn system_source_never_fails() {
        assert!(prepare(&FontSource::System).is_ok());
    }

    #[test]
    fn resolvable_system_font_is_registered() {
        if system_sans_serif().is_none() {
            return;
        }
        let ready = prepare(&FontSource::System).expect("system source cannot fail");
        assert!(ready, "a resolvable sans-serif face must enable text");
    }

    #[test]
    fn missing_font_file_is_reported() {
        let path = PathBuf::from("/nonexistent/linkplot/font.ttf");
        let err = prepare(&FontSource::File(path.clone())).expect_err("missing font must fail");
        match err {
            RenderError::FontRead { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let mut file = NamedTempFile::new().expect("temp file must be created");
        file.write_all(b"not a font")
            .expect("temp file must be writable");
        let err = prepare(&FontSource::File(file.path().to_path_buf()))
            .expect_err("garbage font must fail");
        assert!(matches!(err, RenderError::InvalidFont { .. }));
    }
}
