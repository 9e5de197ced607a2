//! Error handling for envspec.
//!
//! The error system has two layers:
//! 1. [`EnvspecError`] - strongly-typed errors for precise handling in code
//! 2. [`ErrorContext`] - a wrapper that adds user-friendly messages and
//!    actionable suggestions for CLI display
//!
//! Library code raises [`EnvspecError`] (usually through [`anyhow::Error`])
//! and never retries: document-not-found and parse failures are not
//! transient. The CLI layer converts errors into user-facing messages and
//! process exit codes via [`user_friendly_error`].

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for envspec operations.
///
/// Each variant represents a specific failure mode and carries the context
/// needed to report it: file paths for loading failures, the namespace for
/// installer lookup failures.
#[derive(Error, Debug)]
pub enum EnvspecError {
    /// No environment document exists at an expected location.
    ///
    /// Raised when an explicit path does not exist, when directory
    /// discovery exhausts every parent directory without finding a
    /// candidate document, or when an `includes` entry points at a file
    /// that is missing.
    #[error("environment document not found: {path}")]
    DocumentNotFound {
        /// The path (or default filename, for directory discovery) that
        /// could not be found.
        path: String,
    },

    /// The document failed to parse and templating was disabled.
    ///
    /// Distinguishes "this document may require template rendering" from a
    /// genuine syntax error. When templating is enabled and parsing still
    /// fails, the raw parse error propagates instead - the template engine
    /// is exonerated and the document itself is malformed.
    #[error("unable to parse {file}: templating is disabled and the document may require it")]
    TemplateEngineUnavailable {
        /// Path of the document that failed to parse.
        file: String,
    },

    /// Invalid YAML syntax in an environment document.
    #[error("invalid environment document {file}")]
    DocumentParseError {
        /// Path of the document that failed to parse.
        file: String,
        /// Specific reason for the parsing failure.
        reason: String,
    },

    /// A dependency namespace has no registered installer handler.
    ///
    /// Non-fatal to the surrounding program: the CLI reports the namespace
    /// with a remediation hint and exits with a distinct status instead of
    /// crashing.
    #[error("no installer registered for namespace '{namespace}'")]
    InstallerUnavailable {
        /// The dependency namespace that has no handler.
        namespace: String,
    },

    /// An installer handler ran but reported failure.
    #[error("installer for namespace '{namespace}' failed: {reason}")]
    InstallerFailed {
        /// The namespace whose handler failed.
        namespace: String,
        /// Describes the failure (exit status or spawn error).
        reason: String,
    },

    /// `save()` was called on an environment constructed in memory.
    #[error("environment has no origin file to save to")]
    FilenameMissing,

    /// IO error wrapper for std::io errors.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML serialization error wrapper.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Error wrapper providing user-friendly context and suggestions.
///
/// Wraps any [`anyhow::Error`] with an optional remediation suggestion and
/// extra details, and renders them with color for terminal display.
pub struct ErrorContext {
    /// The underlying error.
    pub error: anyhow::Error,
    /// A suggestion for how the user might fix the problem.
    pub suggestion: Option<String>,
    /// Additional details about the failure.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a remediation suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach extra details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "hint:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a contextual suggestion.
///
/// Recognized [`EnvspecError`] variants get targeted remediation hints;
/// everything else passes through unchanged.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<EnvspecError>() {
        Some(EnvspecError::DocumentNotFound { .. }) => Some(
            "create an environment.yml in this directory, or pass an explicit path with --file"
                .to_string(),
        ),
        Some(EnvspecError::TemplateEngineUnavailable { .. }) => Some(
            "the document may use template syntax; re-run without --no-templating".to_string(),
        ),
        Some(EnvspecError::InstallerUnavailable { namespace }) => Some(format!(
            "double check the spelling of '{namespace}' in the dependencies section, \
             or register a handler with --installer {namespace}=<program>"
        )),
        Some(EnvspecError::FilenameMissing) => {
            Some("use to_yaml() or --output to write in-memory environments".to_string())
        }
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(s) = suggestion {
        ctx = ctx.with_suggestion(s);
    }
    ctx
}
