//! # entscore CLI
//!
//! Command-line interface for entity-aware BM25+ scoring.
//!
//! This binary provides human-friendly access to `entscore-core` functionality.
//! Run `entscore --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
