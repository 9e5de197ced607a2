//! The `envspec create` command.
//!
//! Resolves a specification document, routes each dependency namespace to
//! its installer program, and writes the activation script pair under the
//! environment prefix for the host platform.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::activate::{Platform, write_activation_scripts};
use crate::environment::{self, Environment, LoadOptions};
use crate::installer::{CommandInstaller, InstallerRegistry};

/// Arguments for `envspec create`.
#[derive(Args)]
pub struct CreateCommand {
    /// Path to the specification document. Defaults to searching for
    /// environment.yml upward from the current directory.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the environment name from the document.
    #[arg(short, long)]
    name: Option<String>,

    /// Target prefix for the environment. Defaults to envs/<name>.
    #[arg(short, long)]
    prefix: Option<PathBuf>,

    /// Map a dependency namespace to an installer program, e.g.
    /// `--installer pip=pip`. May be given multiple times.
    #[arg(long = "installer", value_name = "NAMESPACE=PROGRAM")]
    installers: Vec<String>,

    /// Skip template pre-processing of the document.
    #[arg(long)]
    no_templating: bool,
}

impl CreateCommand {
    /// Execute the create command.
    pub fn execute(self) -> Result<()> {
        let opts = LoadOptions {
            name: self.name.clone(),
            vars: BTreeMap::new(),
            templating: !self.no_templating,
        };
        let env = load_environment(self.file.as_deref(), &opts)?;

        let prefix = match self.prefix {
            Some(prefix) => prefix,
            None => PathBuf::from("envs").join(env.name.as_deref().unwrap_or("default")),
        };
        std::fs::create_dir_all(&prefix)
            .with_context(|| format!("failed to create prefix {}", prefix.display()))?;

        let registry = build_registry(&self.installers)?;
        registry.install_all(&prefix, &env)?;

        write_activation_scripts(&env, &prefix, Platform::host())?;

        println!(
            "created environment '{}' at {}",
            env.name.as_deref().unwrap_or("default"),
            prefix.display()
        );
        Ok(())
    }
}

/// Load from an explicit file or walk up from the current directory.
pub(crate) fn load_environment(
    file: Option<&std::path::Path>,
    opts: &LoadOptions,
) -> Result<Environment> {
    match file {
        Some(path) => environment::from_file(path, opts),
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            environment::loader::load_from_directory_with(&cwd, opts)
        }
    }
}

/// Build an installer registry from `namespace=program` mappings.
fn build_registry(specs: &[String]) -> Result<InstallerRegistry> {
    let mut registry = InstallerRegistry::new();
    for spec in specs {
        let Some((namespace, program)) = spec.split_once('=') else {
            bail!("invalid --installer '{spec}', expected NAMESPACE=PROGRAM");
        };
        if namespace.is_empty() || program.is_empty() {
            bail!("invalid --installer '{spec}', expected NAMESPACE=PROGRAM");
        }
        registry.register(namespace, Box::new(CommandInstaller::new(namespace, program)));
    }
    Ok(registry)
}
