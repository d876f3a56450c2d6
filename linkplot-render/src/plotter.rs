//! Rasterization of dendrogram layouts.
//!
//! The chart is drawn into an in-memory RGB buffer and only written to disk
//! once drawing has succeeded. The PNG is staged beside the destination and
//! renamed into place, so neither a failed render nor a failed write leaves
//! a partial image behind.

use std::fs;
use std::path::Path;

use linkplot_core::{DendrogramLayout, LinkColor};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{Span, debug, field, info, instrument};

use crate::{
    error::RenderError,
    font::{self, FONT_FAMILY, FontSource},
    raster::RenderedImage,
};

const MARGIN: u32 = 15;
const X_LABEL_AREA: u32 = 45;
const Y_LABEL_AREA: u32 = 60;
const CAPTION_SIZE: f64 = 20.0;
const DESC_SIZE: f64 = 15.0;
const LABEL_SIZE: f64 = 12.0;
const LEAF_LABEL_GAP: i32 = 4;
const HEADROOM: f64 = 1.05;

/// Colour of links merging at or above the colour threshold.
pub const ABOVE_THRESHOLD_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Colours cycled through for subtrees below the colour threshold.
pub const CLUSTER_PALETTE: [RGBColor; 9] = [
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Maps a [`LinkColor`] onto the drawing palette.
///
/// # Examples
/// ```
/// use linkplot_core::LinkColor;
/// use linkplot_render::{ABOVE_THRESHOLD_COLOR, CLUSTER_PALETTE, link_rgb};
///
/// assert_eq!(link_rgb(LinkColor::AboveThreshold), ABOVE_THRESHOLD_COLOR);
/// assert_eq!(link_rgb(LinkColor::Cluster(9)), CLUSTER_PALETTE[0]);
/// ```
#[must_use]
pub fn link_rgb(color: LinkColor) -> RGBColor {
    match color {
        LinkColor::AboveThreshold => ABOVE_THRESHOLD_COLOR,
        LinkColor::Cluster(slot) => CLUSTER_PALETTE
            .get(slot % CLUSTER_PALETTE.len())
            .copied()
            .unwrap_or(ABOVE_THRESHOLD_COLOR),
    }
}

/// Draws [`DendrogramLayout`]s as raster images.
///
/// Construct instances with [`crate::PlotterBuilder`].
#[derive(Debug, Clone)]
pub struct DendrogramPlotter {
    pub(crate) title: String,
    pub(crate) x_label: String,
    pub(crate) y_label: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) font: FontSource,
    pub(crate) leaf_labels: bool,
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

impl DendrogramPlotter {
    /// Returns the chart title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the `(x, y)` axis descriptions.
    #[must_use]
    pub fn axis_labels(&self) -> (&str, &str) {
        (&self.x_label, &self.y_label)
    }

    /// Returns the image `(width, height)` in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns whether observation ids are drawn beneath the leaves.
    #[must_use]
    pub const fn leaf_labels(&self) -> bool {
        self.leaf_labels
    }

    /// Draws `layout` into an in-memory RGB image.
    ///
    /// # Errors
    /// Returns [`RenderError::FontRead`] or [`RenderError::InvalidFont`] when
    /// an explicitly configured font cannot be used, and
    /// [`RenderError::Drawing`] when the plotting backend fails.
    #[instrument(
        name = "render.draw",
        err,
        skip(self, layout),
        fields(leaves = layout.leaf_count(), annotated = field::Empty),
    )]
    pub fn render(&self, layout: &DendrogramLayout) -> Result<RenderedImage, RenderError> {
        let annotated = font::prepare(&self.font)?;
        Span::current().record("annotated", annotated);

        let mut pixels = vec![0_u8; RenderedImage::buffer_len(self.width, self.height)];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root, layout, annotated)?;
            root.present().map_err(drawing_error)?;
        }
        debug!(bytes = pixels.len(), "dendrogram rasterized");
        Ok(RenderedImage::new(self.width, self.height, pixels))
    }

    /// Draws `layout` and writes it to `path` as PNG, replacing any existing
    /// file.
    ///
    /// Nothing is written unless drawing succeeds.
    ///
    /// # Errors
    /// Returns [`RenderError::MissingOutputDirectory`] when the parent
    /// directory of `path` does not exist, [`RenderError::Encode`] or
    /// [`RenderError::Write`] when encoding or writing fails, or any error
    /// from [`Self::render`].
    #[instrument(
        name = "render.save",
        err,
        skip(self, layout, path),
        fields(path = %path.display()),
    )]
    pub fn save(&self, layout: &DendrogramLayout, path: &Path) -> Result<(), RenderError> {
        ensure_parent_exists(path)?;
        let image = self.render(layout)?;
        image.write_png(path)?;
        info!(
            width = self.width,
            height = self.height,
            "dendrogram image written"
        );
        Ok(())
    }

    fn draw(
        &self,
        root: &Root<'_>,
        layout: &DendrogramLayout,
        annotated: bool,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing_error)?;

        let x_end = DendrogramLayout::leaf_x(layout.leaf_count()) - 0.5;
        let y_end = if layout.max_height() > 0.0 {
            layout.max_height() * HEADROOM
        } else {
            1.0
        };

        let mut builder = ChartBuilder::on(root);
        builder.margin(MARGIN);
        if annotated {
            builder
                .caption(&self.title, (FONT_FAMILY, CAPTION_SIZE))
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA);
        }
        let mut chart = builder
            .build_cartesian_2d(0.0..x_end, 0.0..y_end)
            .map_err(drawing_error)?;

        if annotated {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .label_style((FONT_FAMILY, LABEL_SIZE))
                .axis_desc_style((FONT_FAMILY, DESC_SIZE))
                .draw()
                .map_err(drawing_error)?;
        } else {
            chart
                .draw_series([
                    PathElement::new(vec![(0.0, 0.0), (x_end, 0.0)], BLACK),
                    PathElement::new(vec![(0.0, 0.0), (0.0, y_end)], BLACK),
                ])
                .map_err(drawing_error)?;
        }

        chart
            .draw_series(layout.brackets().iter().map(|bracket| {
                let points: Vec<(f64, f64)> = bracket
                    .polyline()
                    .iter()
                    .map(|point| (point.x, point.y))
                    .collect();
                PathElement::new(points, link_rgb(bracket.color()).stroke_width(1))
            }))
            .map_err(drawing_error)?;

        if annotated && self.leaf_labels {
            let style = (FONT_FAMILY, LABEL_SIZE)
                .into_text_style(root)
                .pos(Pos::new(HPos::Center, VPos::Top));
            for (rank, leaf) in layout.leaf_order().iter().enumerate() {
                let (x, y) = chart.backend_coord(&(DendrogramLayout::leaf_x(rank), 0.0));
                root.draw(&Text::new(
                    leaf.to_string(),
                    (x, y + LEAF_LABEL_GAP),
                    style.clone(),
                ))
                .map_err(drawing_error)?;
            }
        }
        Ok(())
    }
}

fn ensure_parent_exists(path: &Path) -> Result<(), RenderError> {
    let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    match fs::metadata(parent) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(RenderError::MissingOutputDirectory {
            path: parent.to_path_buf(),
        }),
    }
}

fn drawing_error<E>(err: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::Drawing {
        message: err.to_string(),
    }
}
