//! envspec - declarative environment specifications.
//!
//! envspec resolves a YAML "environment specification" (a named package
//! environment with channels, dependencies, custom environment variables,
//! and shell aliases) into a fully merged, installable definition, and
//! emits shell artifacts that apply and revert the environment's variables
//! and aliases on activation.
//!
//! # Resolution model
//!
//! A document may include other documents; resolution recursively folds
//! every transitively included document into a single flattened
//! definition. Three rules govern the merge:
//!
//! - included entries are ordered before the includer's own entries for
//!   every list-like field, so the root document's entries come last;
//! - aliases merge by key with the includer winning on collisions;
//! - a visited set of absolute paths guarantees each file is folded in at
//!   most once, which makes circular includes safe.
//!
//! Dependencies keep their declaration order while being grouped by
//! installer namespace: bare strings belong to the native namespace, and
//! single-key mappings like `pip: [...]` route batches to other
//! installers.
//!
//! # Document format (environment.yml)
//!
//! ```yaml
//! name: analysis
//! channels:
//!   - main
//! dependencies:
//!   - python=3.12
//!   - pip:
//!       - rich
//! environment:
//!   - TOOLS_HOME: "{{ root }}/tools"
//! aliases:
//!   ls: ls -la
//! includes:
//!   - ../common/environment.yml
//! ```
//!
//! # Modules
//!
//! - [`environment`] - the [`environment::Environment`] entity, dependency
//!   ledger, document loader, and YAML serializer
//! - [`templating`] - optional Tera pre-processing of document text
//! - [`installer`] - installer handlers keyed by dependency namespace
//! - [`activate`] - activation/deactivation script generation
//! - [`cli`] - command-line interface (`create`, `export`)
//! - [`core`] - error types and user-facing error context

pub mod activate;
pub mod cli;
pub mod constants;
pub mod core;
pub mod environment;
pub mod installer;
pub mod templating;
