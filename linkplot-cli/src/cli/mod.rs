//! Command-line interface orchestration for linkplot.
//!
//! A single command reads a linkage matrix from a text file, lays out its
//! dendrogram and saves the rendered PNG.

mod commands;

pub use commands::{
    Cli, CliError, DEFAULT_OUTPUT, PlotSummary, USAGE, load_linkage, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
