//! Builder for configuring [`DendrogramPlotter`] instances.

use crate::{error::RenderError, font::FontSource, plotter::DendrogramPlotter};

/// Default chart title.
pub const DEFAULT_TITLE: &str = "Dendrogram (Single Linkage)";
/// Default x-axis description.
pub const DEFAULT_X_LABEL: &str = "Objects";
/// Default y-axis description.
pub const DEFAULT_Y_LABEL: &str = "Distance";
/// Default image width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 500;
/// Smallest accepted image edge in pixels.
pub const MIN_EDGE: u32 = 64;
/// Largest accepted image edge in pixels.
pub const MAX_EDGE: u32 = 16_384;

/// Configures and constructs [`DendrogramPlotter`] instances.
///
/// # Examples
/// ```
/// use linkplot_render::PlotterBuilder;
///
/// let plotter = PlotterBuilder::new()
///     .with_title("Merge history")
///     .with_size(640, 480)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(plotter.title(), "Merge history");
/// assert_eq!(plotter.size(), (640, 480));
/// ```
#[derive(Debug, Clone)]
pub struct PlotterBuilder {
    title: String,
    x_label: String,
    y_label: String,
    width: u32,
    height: u32,
    font: FontSource,
    leaf_labels: bool,
}

impl Default for PlotterBuilder {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            x_label: DEFAULT_X_LABEL.to_owned(),
            y_label: DEFAULT_Y_LABEL.to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            font: FontSource::System,
            leaf_labels: false,
        }
    }
}

impl PlotterBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use linkplot_render::{DEFAULT_TITLE, PlotterBuilder};
    ///
    /// let builder = PlotterBuilder::new();
    /// assert_eq!(builder.title(), DEFAULT_TITLE);
    /// assert_eq!(builder.size(), (800, 500));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the chart title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Overrides the axis descriptions.
    #[must_use]
    pub fn with_axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Overrides the image size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Selects where chart text takes its font from.
    #[must_use]
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Draws observation ids beneath the leaves when `enabled`.
    #[must_use]
    pub fn with_leaf_labels(mut self, enabled: bool) -> Self {
        self.leaf_labels = enabled;
        self
    }

    /// Returns the configured title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the configured `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Validates the configuration and constructs a [`DendrogramPlotter`].
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidDimensions`] when either edge lies
    /// outside [`MIN_EDGE`]`..=`[`MAX_EDGE`].
    pub fn build(self) -> Result<DendrogramPlotter, RenderError> {
        let accepted = MIN_EDGE..=MAX_EDGE;
        if !accepted.contains(&self.width) || !accepted.contains(&self.height) {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
                minimum: MIN_EDGE,
                maximum: MAX_EDGE,
            });
        }
        Ok(DendrogramPlotter {
            title: self.title,
            x_label: self.x_label,
            y_label: self.y_label,
            width: self.width,
            height: self.height,
            font: self.font,
            leaf_labels: self.leaf_labels,
        })
    }
}
