//! Command-line interface for envspec.
//!
//! Two commands cover the lifecycle of a declarative environment:
//!
//! - `create` resolves a document, runs the registered installer for each
//!   dependency namespace against a target prefix, and writes the
//!   activation script pair;
//! - `export` resolves a document and prints (or saves) the merged
//!   definition as round-trippable YAML.
//!
//! Each command lives in its own module with its own argument struct, and
//! the root parser carries the global verbosity flags.

mod create;
mod export;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Root CLI parser for the `envspec` binary.
#[derive(Parser)]
#[command(
    name = "envspec",
    about = "Resolve declarative environment specifications and activate them",
    version,
    long_about = "envspec resolves a YAML environment specification - channels, \
                  dependencies across installer namespaces, variables, aliases and \
                  includes - into a fully merged definition, installs it, and emits \
                  activation/deactivation shell scripts."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an environment from a specification document.
    Create(create::CreateCommand),

    /// Print or save the resolved specification.
    Export(export::ExportCommand),
}

impl Cli {
    /// The tracing filter directive implied by the verbosity flags, or
    /// `None` when logging should stay off.
    #[must_use]
    pub fn log_filter(&self) -> Option<&'static str> {
        if self.quiet {
            None
        } else if self.verbose {
            Some("envspec=debug")
        } else {
            Some("envspec=info")
        }
    }

    /// Dispatch to the selected subcommand.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Create(cmd) => cmd.execute(),
            Commands::Export(cmd) => cmd.execute(),
        }
    }
}
