//! The `envspec export` command.
//!
//! Resolves a specification document (folding in all includes) and prints
//! or saves the merged definition as YAML. The output re-parses to an
//! identical environment, which makes it suitable for freezing a fully
//! flattened copy of a document tree.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::environment::LoadOptions;

use super::create::load_environment;

/// Arguments for `envspec export`.
#[derive(Args)]
pub struct ExportCommand {
    /// Path to the specification document. Defaults to searching for
    /// environment.yml upward from the current directory.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the environment name from the document.
    #[arg(short, long)]
    name: Option<String>,

    /// Write the resolved YAML to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip template pre-processing of the document.
    #[arg(long)]
    no_templating: bool,
}

impl ExportCommand {
    /// Execute the export command.
    pub fn execute(self) -> Result<()> {
        let opts = LoadOptions {
            name: self.name.clone(),
            vars: BTreeMap::new(),
            templating: !self.no_templating,
        };
        let env = load_environment(self.file.as_deref(), &opts)?;
        let yaml = env.to_yaml()?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, yaml)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("exported environment to {}", path.display());
            }
            None => print!("{yaml}"),
        }
        Ok(())
    }
}
