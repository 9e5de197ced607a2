//! Loading environment documents from files, directories, and strings.
//!
//! The loader is the single entry point for turning document text into a
//! resolved [`Environment`]: it reads the file, optionally pre-processes
//! the text with the template engine, parses the YAML, applies caller
//! overrides, and hands the parsed document to [`Environment`] for include
//! resolution. Include resolution calls back into [`from_file_with_visited`]
//! so nested documents flow through exactly the same pipeline.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::{EnvVar, Environment};
use crate::constants::{DEFAULT_DOCUMENT_FILENAME, DOCUMENT_FILENAMES};
use crate::core::EnvspecError;
use crate::environment::dependencies::DependencyEntry;
use crate::templating;

/// The transient, parsed shape of an environment document.
///
/// Unrecognized top-level keys are ignored rather than rejected, so
/// documents may carry annotations meant for other tools.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnvironmentDocument {
    pub(crate) name: Option<String>,
    pub(crate) channels: Option<Vec<String>>,
    pub(crate) dependencies: Option<Vec<DependencyEntry>>,
    pub(crate) environment: Option<Vec<EnvVar>>,
    pub(crate) aliases: Option<IndexMap<String, String>>,
    pub(crate) includes: Option<Vec<String>>,
}

/// Caller-supplied knobs for a load operation.
///
/// These are the typed replacement for an open-ended key/value overlay:
/// `name` overrides the document's own `name` field after parsing, and
/// `vars` are exposed to the template engine as template variables.
/// Overrides apply to the document being loaded, not to documents it
/// includes; the templating toggle is carried through the whole inclusion
/// chain.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Override for the document's `name` field. Wins over document
    /// content.
    pub name: Option<String>,
    /// Extra variables made available during template rendering.
    pub vars: BTreeMap<String, String>,
    /// Whether the template engine is available for this load.
    pub templating: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            name: None,
            vars: BTreeMap::new(),
            templating: true,
        }
    }
}

impl LoadOptions {
    /// Options for loading an included document: no overrides, same
    /// templating availability as the includer.
    pub(crate) fn nested(templating: bool) -> Self {
        Self {
            templating,
            ..Self::default()
        }
    }
}

/// Load an environment by probing `dir` and its ancestors for a document.
///
/// Each directory is probed for `environment.yml` then `environment.yaml`;
/// the first file that exists and parses wins. When a directory has no
/// candidate the search moves to its parent, stopping at the filesystem
/// root (where the parent equals the current path). Fails with
/// [`EnvspecError::DocumentNotFound`] naming the default filename when the
/// whole chain is exhausted.
pub fn load_from_directory(dir: &Path) -> Result<Environment> {
    load_from_directory_with(dir, &LoadOptions::default())
}

/// [`load_from_directory`] with explicit load options.
pub fn load_from_directory_with(dir: &Path, opts: &LoadOptions) -> Result<Environment> {
    let mut current = dir.to_path_buf();
    loop {
        for candidate in DOCUMENT_FILENAMES {
            let path = current.join(candidate);
            if path.exists() {
                return from_file(&path, opts);
            }
        }
        if !current.pop() {
            return Err(EnvspecError::DocumentNotFound {
                path: DEFAULT_DOCUMENT_FILENAME.to_string(),
            }
            .into());
        }
    }
}

/// Load and resolve an environment from a document file.
pub fn from_file(path: &Path, opts: &LoadOptions) -> Result<Environment> {
    let mut visited = HashSet::new();
    from_file_with_visited(path, opts, &mut visited)
}

/// Load a document file, threading the visited set through so the whole
/// resolution pass shares one cycle guard.
pub(crate) fn from_file_with_visited(
    path: &Path,
    opts: &LoadOptions,
    visited: &mut HashSet<PathBuf>,
) -> Result<Environment> {
    if !path.exists() {
        return Err(EnvspecError::DocumentNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let path = path
        .canonicalize()
        .with_context(|| format!("failed to resolve path {}", path.display()))?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loading environment document");
    from_yaml_with_visited(&text, Some(path), opts, visited)
}

/// Load and resolve an environment from document text.
///
/// Used for in-memory documents; file-relative features (the `root`
/// template variable, relative includes) resolve against the current
/// directory.
pub fn from_yaml(text: &str, opts: &LoadOptions) -> Result<Environment> {
    let mut visited = HashSet::new();
    from_yaml_with_visited(text, None, opts, &mut visited)
}

fn from_yaml_with_visited(
    text: &str,
    filename: Option<PathBuf>,
    opts: &LoadOptions,
    visited: &mut HashSet<PathBuf>,
) -> Result<Environment> {
    let rendered = if opts.templating {
        templating::render(text, filename.as_deref(), &opts.vars)?
    } else {
        text.to_string()
    };

    let display_name = filename
        .as_ref()
        .map_or_else(|| "<string>".to_string(), |f| f.display().to_string());

    let mut doc: EnvironmentDocument = match serde_yaml::from_str(&rendered) {
        Ok(doc) => doc,
        Err(err) if !opts.templating => {
            // The failure may be down to unrendered template syntax rather
            // than a malformed document.
            tracing::debug!(error = %err, "parse failed with templating disabled");
            return Err(EnvspecError::TemplateEngineUnavailable { file: display_name }.into());
        }
        Err(err) => {
            return Err(EnvspecError::DocumentParseError {
                file: display_name,
                reason: err.to_string(),
            }
            .into());
        }
    };

    if let Some(name) = &opts.name {
        doc.name = Some(name.clone());
    }

    Environment::from_document(doc, filename, opts.templating, visited)
}
