//! CLI entry point for rendering linkage matrices as dendrograms.
//!
//! Parses command-line arguments with clap, runs the plotting pipeline,
//! prints the status line to stdout and maps errors to exit codes. Logging is
//! initialized eagerly so subsequent operations can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use linkplot_cli::{
    cli::{Cli, CliError, USAGE, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, run the pipeline, print the status line and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to render dendrogram")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to print status")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let cli_error = err.downcast_ref::<CliError>();
        if matches!(cli_error, Some(CliError::Usage)) {
            print_usage();
            return ExitCode::FAILURE;
        }

        let code_field = cli_error
            .and_then(CliError::code)
            .map(field::display);
        let file_access = cli_error.is_some_and(CliError::is_file_access);

        error!(
            error = %err,
            code = code_field,
            file_access,
            "command execution failed"
        );
        report_failure(&err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(clippy::print_stdout, reason = "Usage text belongs on stdout")]
fn print_usage() {
    println!("{USAGE}");
}

#[expect(
    clippy::print_stderr,
    reason = "Emit a single diagnostic line regardless of the log filter"
)]
fn report_failure(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
