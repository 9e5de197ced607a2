//! Shared constants for envspec.
//!
//! Centralizes the well-known filenames and namespace identifiers so that
//! the loader, installer registry, and CLI agree on them.

/// Candidate document filenames probed during directory discovery, in
/// probe order.
pub const DOCUMENT_FILENAMES: [&str; 2] = ["environment.yml", "environment.yaml"];

/// The default document filename, reported in "not found" errors and used
/// when creating a new document.
pub const DEFAULT_DOCUMENT_FILENAME: &str = "environment.yml";

/// The namespace that bare dependency strings are routed to.
///
/// Every parsed ledger that contains at least one entry exposes this
/// namespace, even when all entries were routed elsewhere.
pub const NATIVE_NAMESPACE: &str = "native";

/// Directory under an environment prefix that holds generated
/// activation/deactivation scripts.
pub const SCRIPT_DIR: &str = "etc/envspec";
