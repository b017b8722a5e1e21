#![warn(missing_docs)]
//! # template-sheet binary
//!
//! Command-line entry point for template-sheet.

use std::path::Path;

use template_sheet_app::{LOG_ENV, executable_name, parse_command, run};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI entry point.
fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let exe = executable_name();
    let mut stdout = std::io::stdout().lock();

    let result =
        parse_command(&args).and_then(|command| run(command, Path::new("."), &exe, &mut stdout));
    if let Err(error) = result {
        debug!(category = error.category(), "command failed");
        eprintln!("ERROR: {error}");
        std::process::exit(error.exit_code());
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
