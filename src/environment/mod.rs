//! Environment documents: loading, recursive inclusion, and serialization.
//!
//! An environment document is a YAML file describing a named package
//! environment: its channels, dependencies (possibly spread across several
//! installer namespaces), custom environment variables, shell aliases, and
//! other documents to include. This module owns the resolution model:
//!
//! - [`loader`] reads a document from a file, directory, or string,
//!   optionally pre-processing it with the template engine;
//! - [`Environment`] folds every transitively included document into a
//!   single flattened definition, with a visited set guarding against
//!   circular includes;
//! - the serializer methods ([`Environment::to_mapping`],
//!   [`Environment::to_yaml`], [`Environment::save`]) round-trip a
//!   resolved environment back to deterministic block-style YAML.
//!
//! # Merge precedence
//!
//! For every list-like field, entries contributed by an included document
//! are ordered before the entries of the document that includes it, at
//! every level of the inclusion chain. The root document's own entries
//! therefore always come last - which makes them win wherever later
//! entries override earlier ones (aliases, redefined variables).

pub mod dependencies;
pub mod loader;

#[cfg(test)]
mod loader_tests;

pub use dependencies::{DependencyEntry, DependencyLedger};
pub use loader::{LoadOptions, from_file, from_yaml, load_from_directory};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::EnvspecError;
use loader::EnvironmentDocument;

/// A single environment variable declaration.
///
/// On the wire this is a single-key mapping (`PATH: /opt/tools/bin`);
/// declarations live in an ordered sequence because later entries may
/// legitimately redefine earlier ones at activation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Variable value. Scalar YAML values are stringified on load.
    pub value: String,
}

impl EnvVar {
    /// Convenience constructor used by programmatic builders and tests.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Serialize for EnvVar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for EnvVar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VarVisitor;

        impl<'de> Visitor<'de> for VarVisitor {
            type Value = EnvVar;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single NAME: value mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (name, value): (String, Value) = map
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("variable mapping must not be empty"))?;
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom(
                        "variable mapping must have exactly one key",
                    ));
                }
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(de::Error::custom(format!(
                            "variable '{name}' must have a scalar value, got {other:?}"
                        )));
                    }
                };
                Ok(EnvVar { name, value })
            }
        }

        deserializer.deserialize_map(VarVisitor)
    }
}

/// A fully resolved environment definition.
///
/// Construction folds in every transitively included document, so the
/// `channels`, `dependencies`, `environment`, and `aliases` fields reflect
/// the complete inclusion closure by the time callers see the value. No
/// lazy re-resolution happens afterwards; the only sanctioned mutations
/// are explicit [`DependencyLedger::add`] / [`DependencyLedger::include`]
/// calls and direct field reassignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Environment name, if the document declared one.
    pub name: Option<String>,
    /// Absolute path of the origin document, or `None` when constructed
    /// in memory.
    pub filename: Option<PathBuf>,
    /// Package source channels. Duplicates are allowed; order is lookup
    /// precedence.
    pub channels: Vec<String>,
    /// The dependency ledger.
    pub dependencies: DependencyLedger,
    /// Ordered environment variable declarations.
    pub environment: Vec<EnvVar>,
    /// Shell aliases; last writer wins on key collision.
    pub aliases: IndexMap<String, String>,
    /// Include paths exactly as declared, relative to the document's own
    /// directory.
    pub includes: Vec<String>,
}

impl Environment {
    /// Construct an environment from a parsed document, resolving its
    /// includes depth-first.
    ///
    /// `visited` carries the set of absolute paths already folded into the
    /// current resolution pass; the origin file is recorded immediately so
    /// a document including itself (directly or through a cycle) is folded
    /// in exactly once. Each include path is resolved relative to the
    /// document's own directory, skipped when already visited, and
    /// otherwise loaded through the loader with the same visited set so
    /// nested inclusions respect the global guard.
    pub(crate) fn from_document(
        doc: EnvironmentDocument,
        filename: Option<PathBuf>,
        templating: bool,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<Self> {
        let mut env = Self {
            name: doc.name,
            filename,
            channels: doc.channels.unwrap_or_default(),
            dependencies: DependencyLedger::new(doc.dependencies.unwrap_or_default()),
            environment: doc.environment.unwrap_or_default(),
            aliases: doc.aliases.unwrap_or_default(),
            includes: doc.includes.unwrap_or_default(),
        };

        if let Some(origin) = &env.filename {
            visited.insert(origin.clone());
        }

        let base_dir = env
            .filename
            .as_ref()
            .and_then(|f| f.parent())
            .map(Path::to_path_buf);

        for include in env.includes.clone() {
            let target = match &base_dir {
                Some(dir) => dir.join(&include),
                None => PathBuf::from(&include),
            };
            if !target.exists() {
                return Err(EnvspecError::DocumentNotFound {
                    path: target.display().to_string(),
                }
                .into());
            }
            let target = target.canonicalize().with_context(|| {
                format!("failed to resolve include path {}", target.display())
            })?;
            if visited.contains(&target) {
                tracing::debug!(path = %target.display(), "include already folded in, skipping");
                continue;
            }

            tracing::debug!(path = %target.display(), "resolving included document");
            let nested = loader::from_file_with_visited(
                &target,
                &LoadOptions::nested(templating),
                visited,
            )?;
            env.merge_included(nested);
        }

        Ok(env)
    }

    /// Fold an included environment into this one.
    ///
    /// Included entries go in front of this environment's own entries for
    /// every list-like field; aliases merge key-wise with this
    /// environment's values winning.
    fn merge_included(&mut self, nested: Environment) {
        self.dependencies.include(&nested.dependencies);

        let mut channels = nested.channels;
        channels.append(&mut self.channels);
        self.channels = channels;

        let mut environment = nested.environment;
        environment.append(&mut self.environment);
        self.environment = environment;

        let mut aliases = nested.aliases;
        aliases.extend(self.aliases.drain(..));
        self.aliases = aliases;
    }

    /// Produce the ordered field mapping used for serialization.
    ///
    /// `name` always comes first (even when null); `channels`,
    /// `dependencies` (raw declarations, not the derived grouping),
    /// `environment`, and `aliases` follow in that fixed order and only
    /// when non-empty. The ordering is load-bearing for human-readable
    /// diffs.
    pub fn to_mapping(&self) -> Result<Mapping> {
        let mut mapping = Mapping::new();
        mapping.insert(
            Value::from("name"),
            match &self.name {
                Some(name) => Value::from(name.clone()),
                None => Value::Null,
            },
        );
        if !self.channels.is_empty() {
            mapping.insert(Value::from("channels"), serde_yaml::to_value(&self.channels)?);
        }
        if !self.dependencies.is_empty() {
            mapping.insert(
                Value::from("dependencies"),
                serde_yaml::to_value(self.dependencies.raw())?,
            );
        }
        if !self.environment.is_empty() {
            mapping.insert(
                Value::from("environment"),
                serde_yaml::to_value(&self.environment)?,
            );
        }
        if !self.aliases.is_empty() {
            mapping.insert(Value::from("aliases"), serde_yaml::to_value(&self.aliases)?);
        }
        Ok(mapping)
    }

    /// Render the environment as block-style YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.to_mapping()?)?;
        Ok(yaml)
    }

    /// Render the environment as YAML into a writer.
    pub fn to_yaml_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_yaml::to_writer(writer, &self.to_mapping()?)?;
        Ok(())
    }

    /// Write the current state back to the origin file.
    ///
    /// Fails with [`EnvspecError::FilenameMissing`] for environments
    /// constructed in memory.
    pub fn save(&self) -> Result<()> {
        let filename = self
            .filename
            .as_ref()
            .ok_or(EnvspecError::FilenameMissing)?;
        std::fs::write(filename, self.to_yaml()?)
            .with_context(|| format!("failed to write {}", filename.display()))?;
        Ok(())
    }
}
