//! Optional template pre-processing of document text with Tera.
//!
//! Environment documents may use template syntax to compute values before
//! YAML parsing, most commonly to build paths relative to the document:
//!
//! ```yaml
//! environment:
//!   - TOOLS_HOME: "{{ root }}/tools"
//!   - TOOLS_BIN: "{{ joinpath(a=root, b='bin') }}"
//! ```
//!
//! Two variables are always injected on top of the caller-supplied ones:
//! `root`, the absolute directory of the source file (when loading from a
//! file), and `path_sep`, the platform path separator. The `joinpath`
//! function provides platform-aware path joining. Rendering is strictly a
//! pre-processing step: the loader may skip it entirely, in which case the
//! raw text passes through unmodified.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tera::Tera;

/// Platform-aware path joining for templates: `joinpath(a=..., b=...)`.
fn joinpath(args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let a = args
        .get("a")
        .and_then(tera::Value::as_str)
        .ok_or_else(|| tera::Error::msg("joinpath requires a string argument 'a'"))?;
    let b = args
        .get("b")
        .and_then(tera::Value::as_str)
        .ok_or_else(|| tera::Error::msg("joinpath requires a string argument 'b'"))?;
    let joined = PathBuf::from(a).join(b);
    Ok(tera::Value::String(joined.display().to_string()))
}

/// Render document text with the template engine.
///
/// `filename` is the origin of the text, used to derive the `root`
/// variable; pass `None` for in-memory documents. Template errors (bad
/// syntax, missing variables) propagate to the caller - a failed render is
/// never silently swallowed.
pub fn render(
    text: &str,
    filename: Option<&Path>,
    vars: &BTreeMap<String, String>,
) -> Result<String> {
    let mut context = tera::Context::new();
    for (key, value) in vars {
        context.insert(key, value);
    }
    if let Some(dir) = filename.and_then(Path::parent) {
        context.insert("root", &dir.display().to_string());
    }
    context.insert("path_sep", &std::path::MAIN_SEPARATOR.to_string());

    let mut tera = Tera::default();
    tera.register_function("joinpath", joinpath);
    tera.render_str(text, &context).with_context(|| {
        match filename {
            Some(f) => format!("failed to render template in {}", f.display()),
            None => "failed to render document template".to_string(),
        }
    })
}
