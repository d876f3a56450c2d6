//! Support library for the linkplot CLI binary.
//!
//! Re-exports the CLI and logging modules so doctests and integration tests
//! can exercise the plotting pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
