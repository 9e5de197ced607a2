//! Installer handlers keyed by dependency namespace.
//!
//! Each namespace in a resolved environment's dependency ledger is routed
//! to an opaque handler implementing [`Installer`]. The registry performs
//! the lookup; an unrecognized namespace fails with
//! [`EnvspecError::InstallerUnavailable`], which callers report (naming the
//! namespace) rather than treat as a crash.
//!
//! The built-in [`CommandInstaller`] shells out to an external program,
//! which is how real package managers are attached: `--installer
//! native=conda --installer pip=pip` on the command line maps namespaces
//! to programs.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::core::EnvspecError;
use crate::environment::Environment;

/// An installation handler for one dependency namespace.
pub trait Installer {
    /// Install `specs` into the environment at `prefix`.
    ///
    /// `env` is the fully resolved environment, available for handlers
    /// that need channels or other document fields.
    fn install(&self, prefix: &Path, specs: &[String], env: &Environment) -> Result<()>;
}

/// Maps namespace names to their installation handlers.
#[derive(Default)]
pub struct InstallerRegistry {
    handlers: HashMap<String, Box<dyn Installer>>,
}

impl InstallerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a namespace, replacing any existing one.
    pub fn register(&mut self, namespace: impl Into<String>, handler: Box<dyn Installer>) {
        self.handlers.insert(namespace.into(), handler);
    }

    /// Look up the handler for a namespace.
    pub fn get(&self, namespace: &str) -> Result<&dyn Installer> {
        self.handlers
            .get(namespace)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| {
                EnvspecError::InstallerUnavailable {
                    namespace: namespace.to_string(),
                }
                .into()
            })
    }

    /// Run every namespace of the environment's ledger through its
    /// handler, in ledger order.
    pub fn install_all(&self, prefix: &Path, env: &Environment) -> Result<()> {
        for (namespace, specs) in env.dependencies.by_namespace() {
            // The ledger always materializes the native namespace; an
            // empty spec list needs no handler at all.
            if specs.is_empty() {
                tracing::debug!(%namespace, "no specs, skipping namespace");
                continue;
            }
            let handler = self.get(namespace)?;
            tracing::info!(%namespace, count = specs.len(), "installing dependencies");
            handler.install(prefix, specs, env)?;
        }
        Ok(())
    }
}

/// Handler that delegates to an external program.
///
/// Invokes `<program> install --prefix <prefix> <specs...>`. An empty spec
/// list is a no-op.
pub struct CommandInstaller {
    namespace: String,
    program: String,
}

impl CommandInstaller {
    /// Create a handler that shells out to `program` for `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            program: program.into(),
        }
    }
}

impl Installer for CommandInstaller {
    fn install(&self, prefix: &Path, specs: &[String], _env: &Environment) -> Result<()> {
        if specs.is_empty() {
            tracing::debug!(namespace = %self.namespace, "no specs, skipping handler");
            return Ok(());
        }

        tracing::debug!(program = %self.program, ?specs, "invoking installer program");
        let status = Command::new(&self.program)
            .arg("install")
            .arg("--prefix")
            .arg(prefix)
            .args(specs)
            .status()
            .map_err(|err| EnvspecError::InstallerFailed {
                namespace: self.namespace.clone(),
                reason: format!("failed to run '{}': {err}", self.program),
            })?;

        if !status.success() {
            return Err(EnvspecError::InstallerFailed {
                namespace: self.namespace.clone(),
                reason: format!("'{}' exited with {status}", self.program),
            }
            .into());
        }
        Ok(())
    }
}
