//! envspec CLI entry point.
//!
//! Parses arguments, initializes logging from the verbosity flags, runs
//! the selected command, and converts failures into user-friendly
//! messages and exit codes. An unavailable installer namespace exits with
//! a distinct status so scripts can tell "fix your dependencies section"
//! apart from other failures.

use clap::Parser;
use envspec::cli::Cli;
use envspec::core::{EnvspecError, user_friendly_error};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Some(directive) = cli.log_filter() {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(error) = cli.execute() {
        let code = match error.downcast_ref::<EnvspecError>() {
            Some(EnvspecError::InstallerUnavailable { .. }) => 2,
            _ => 1,
        };
        user_friendly_error(error).display();
        std::process::exit(code);
    }
}
