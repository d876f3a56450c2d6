//! Argument parsing and the plotting pipeline behind the linkplot CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use linkplot_core::{ColorThreshold, DendrogramLayout, LinkageError, LinkageMatrix};
use linkplot_render::{
    DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH, DendrogramPlotter, FontSource, PlotterBuilder,
    RenderError,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Destination used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "../../data/dendrogram.png";

/// One-line usage printed when no input path is supplied.
pub const USAGE: &str = "Usage: linkplot <path_txt>";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "linkplot",
    about = "Render a hierarchical-clustering linkage matrix as a dendrogram PNG."
)]
pub struct Cli {
    /// Whitespace-delimited linkage matrix: `left right distance size` per row.
    pub path: Option<PathBuf>,

    /// Where to write the PNG image.
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Chart title.
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Image width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Merge distance below which subtrees get their own colour; `0`
    /// disables colouring. Defaults to 70% of the tallest merge.
    #[arg(long = "color-threshold", value_name = "DISTANCE")]
    pub color_threshold: Option<f64>,

    /// Draw observation ids beneath the leaves.
    #[arg(long = "leaf-labels")]
    pub leaf_labels: bool,

    /// TrueType or OpenType font used for chart text.
    #[arg(long, env = "LINKPLOT_FONT", value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Draw the chart without any text, ignoring `--font`.
    #[arg(long = "no-text")]
    pub no_text: bool,
}

/// Errors surfaced while executing the CLI.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CliError {
    /// No input path was supplied.
    #[error("missing input path")]
    Usage,
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    FileAccess {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The linkage matrix was malformed.
    #[error(transparent)]
    Parse(#[from] LinkageError),
    /// Drawing or saving the dendrogram failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CliError {
    /// Returns `true` when the failure stems from reading the input or
    /// writing the output rather than from the content of the matrix.
    #[must_use]
    pub const fn is_file_access(&self) -> bool {
        match self {
            Self::FileAccess { .. } => true,
            Self::Parse(err) => matches!(err, LinkageError::Read { .. }),
            Self::Render(err) => err.is_output_access(),
            Self::Usage => false,
        }
    }

    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Parse(err) => Some(err.code().as_str()),
            Self::Render(err) => Some(err.code().as_str()),
            Self::Usage | Self::FileAccess { .. } => None,
        }
    }
}

/// Summarises a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotSummary {
    /// Path the PNG was written to.
    pub output: PathBuf,
    /// Number of original observations (leaves).
    pub observations: usize,
    /// Number of merges drawn.
    pub merges: usize,
}

/// Executes the plotting pipeline described by `cli`.
///
/// # Errors
/// Returns [`CliError::Usage`] when no input path is given, and the
/// corresponding [`CliError`] variant when loading, rendering or saving fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use linkplot_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("linkage.txt");
/// std::fs::write(&input, "0 1 1.0 2\n2 3 2.0 3\n")?;
/// let output = dir.path().join("dendrogram.png");
/// let input_arg = input.to_str().ok_or("temp path is not UTF-8")?;
/// let output_arg = output.to_str().ok_or("temp path is not UTF-8")?;
/// let cli = Cli::try_parse_from([
///     "linkplot",
///     input_arg,
///     "--no-text",
///     "--output",
///     output_arg,
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.observations, 3);
/// assert!(output.is_file());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(path = field::Empty, output = %cli.output.display()),
)]
pub fn run_cli(cli: Cli) -> Result<PlotSummary, CliError> {
    let Some(path) = cli.path.as_deref() else {
        return Err(CliError::Usage);
    };
    Span::current().record("path", field::display(path.display()));

    let linkage = load_linkage(path)?;
    let layout = DendrogramLayout::build(&linkage, color_threshold(cli.color_threshold));
    build_plotter(&cli)?.save(&layout, &cli.output)?;

    let summary = PlotSummary {
        output: cli.output,
        observations: linkage.observation_count(),
        merges: layout.brackets().len(),
    };
    info!(
        observations = summary.observations,
        merges = summary.merges,
        "dendrogram saved"
    );
    Ok(summary)
}

/// Opens `path` and parses its contents as a linkage matrix.
///
/// # Errors
/// Returns [`CliError::FileAccess`] when the file cannot be opened and
/// [`CliError::Parse`] when its contents are not a valid linkage matrix.
#[instrument(name = "cli.load_linkage", err, fields(path = %path.display(), rows = field::Empty))]
pub fn load_linkage(path: &Path) -> Result<LinkageMatrix, CliError> {
    let file = File::open(path).map_err(|source| CliError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let linkage = LinkageMatrix::from_reader(BufReader::new(file))?;
    Span::current().record("rows", linkage.rows().len());
    Ok(linkage)
}

pub(super) fn color_threshold(raw: Option<f64>) -> ColorThreshold {
    match raw {
        None => ColorThreshold::Default,
        Some(value) if value > 0.0 => ColorThreshold::Fixed(value),
        Some(_) => ColorThreshold::Disabled,
    }
}

pub(super) fn font_source(cli: &Cli) -> FontSource {
    if cli.no_text {
        return FontSource::Disabled;
    }
    cli.font
        .clone()
        .map_or(FontSource::System, FontSource::File)
}

fn build_plotter(cli: &Cli) -> Result<DendrogramPlotter, RenderError> {
    PlotterBuilder::new()
        .with_title(cli.title.as_str())
        .with_size(cli.width, cli.height)
        .with_font(font_source(cli))
        .with_leaf_labels(cli.leaf_labels)
        .build()
}

/// Writes the status line for `summary` to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use linkplot_cli::cli::{PlotSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = PlotSummary {
///     output: "../../data/dendrogram.png".into(),
///     observations: 3,
///     merges: 2,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "Saved dendrogram.png\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &PlotSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.output.file_name() {
        Some(name) => writeln!(writer, "Saved {}", Path::new(name).display()),
        None => writeln!(writer, "Saved {}", summary.output.display()),
    }
}
