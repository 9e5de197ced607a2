//! Generation of activation and deactivation shell scripts.
//!
//! A resolved environment's `environment` variables and `aliases` are
//! turned into a pair of scripts dropped under the environment prefix:
//! `etc/envspec/activate.d/_activate.<ext>` applies them,
//! `etc/envspec/deactivate.d/_deactivate.<ext>` reverts them. Shells that
//! honor the `activate.d`/`deactivate.d` convention source these on
//! activation.
//!
//! Output is a pure function of the environment and the supplied
//! [`Platform`]; nothing about the current process or host is sensed
//! implicitly, which keeps generation testable for both platforms from
//! anywhere. Generation is skipped entirely when there is nothing to
//! apply.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::SCRIPT_DIR;
use crate::environment::Environment;

/// Target platform descriptor for script generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// POSIX shells: `.sh` scripts using `export`/`alias`.
    Unix,
    /// `cmd.exe`: `.bat` scripts using `set`/`doskey`.
    Windows,
}

impl Platform {
    /// The platform of the running process.
    #[must_use]
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Unix => "sh",
            Self::Windows => "bat",
        }
    }
}

/// Script generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Activate,
    Deactivate,
}

/// Quote a value for a POSIX shell using single quotes.
fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn render_script(env: &Environment, platform: Platform, mode: Mode) -> String {
    let mut lines = Vec::new();
    match platform {
        Platform::Unix => {
            for var in &env.environment {
                match mode {
                    Mode::Activate => {
                        lines.push(format!("export {}={}", var.name, sh_quote(&var.value)));
                    }
                    Mode::Deactivate => lines.push(format!("unset {}", var.name)),
                }
            }
            for (alias, command) in &env.aliases {
                match mode {
                    Mode::Activate => {
                        lines.push(format!("alias {}={}", alias, sh_quote(command)));
                    }
                    Mode::Deactivate => {
                        lines.push(format!("unalias {alias} 2>/dev/null"));
                    }
                }
            }
        }
        Platform::Windows => {
            for var in &env.environment {
                match mode {
                    Mode::Activate => {
                        lines.push(format!("set \"{}={}\"", var.name, var.value));
                    }
                    Mode::Deactivate => lines.push(format!("set \"{}=\"", var.name)),
                }
            }
            for (alias, command) in &env.aliases {
                match mode {
                    Mode::Activate => lines.push(format!("doskey {alias}={command}")),
                    Mode::Deactivate => lines.push(format!("doskey {alias}=")),
                }
            }
        }
    }
    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Write the activation/deactivation script pair for an environment.
///
/// Returns the paths of the two scripts, or `None` when both the variable
/// list and the alias map are empty (in which case nothing is written and
/// no directories are created).
pub fn write_activation_scripts(
    env: &Environment,
    prefix: &Path,
    platform: Platform,
) -> Result<Option<(PathBuf, PathBuf)>> {
    if env.environment.is_empty() && env.aliases.is_empty() {
        tracing::debug!("no variables or aliases, skipping activation scripts");
        return Ok(None);
    }

    let ext = platform.extension();
    let script_root = prefix.join(SCRIPT_DIR);
    let activate_dir = script_root.join("activate.d");
    let deactivate_dir = script_root.join("deactivate.d");
    for dir in [&activate_dir, &deactivate_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let activate_path = activate_dir.join(format!("_activate.{ext}"));
    let deactivate_path = deactivate_dir.join(format!("_deactivate.{ext}"));
    std::fs::write(&activate_path, render_script(env, platform, Mode::Activate))
        .with_context(|| format!("failed to write {}", activate_path.display()))?;
    std::fs::write(
        &deactivate_path,
        render_script(env, platform, Mode::Deactivate),
    )
    .with_context(|| format!("failed to write {}", deactivate_path.display()))?;

    tracing::info!(
        activate = %activate_path.display(),
        deactivate = %deactivate_path.display(),
        "wrote activation scripts"
    );
    Ok(Some((activate_path, deactivate_path)))
}
