//! Core types and error handling for envspec.

pub mod error;

pub use error::{EnvspecError, ErrorContext, user_friendly_error};
