//! Raster rendering of dendrogram layouts.
//!
//! [`PlotterBuilder`] configures a [`DendrogramPlotter`], which draws a
//! [`linkplot_core::DendrogramLayout`] into a [`RenderedImage`] and writes it
//! out as PNG.

mod builder;
mod error;
mod font;
mod plotter;
mod raster;

pub use crate::{
    builder::{
        DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH, DEFAULT_X_LABEL, DEFAULT_Y_LABEL, MAX_EDGE,
        MIN_EDGE, PlotterBuilder,
    },
    error::{RenderError, RenderErrorCode},
    font::FontSource,
    plotter::{ABOVE_THRESHOLD_COLOR, CLUSTER_PALETTE, DendrogramPlotter, link_rgb},
    raster::RenderedImage,
};
