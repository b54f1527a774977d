//! `.env` file loading into the process environment.
//!
//! Responsibilities:
//! - Resolve the `.env` path under the project root and hand it to `dotenvy`.
//! - Map `dotenvy` failures onto distinguishable `ConfigError` variants.
//! - Enforce the `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Parsing `.env` syntax (delegated to `dotenvy`).
//! - Reading variables back out with coercion (see `env.rs`).
//!
//! Invariants:
//! - Variables already present in the process environment are never overridden.
//! - A missing file is an error only under `EnvFilePolicy::Strict`.
//! - Errors never include raw `.env` line contents.

use std::path::{Path, PathBuf};

use crate::constants::{DOTENV_DISABLED_VAR, ENV_FILE_NAME};
use crate::error::ConfigError;

/// What to do when the root has no `.env` file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvFilePolicy {
    /// Missing file is silently ignored.
    #[default]
    Lenient,
    /// Missing file aborts store construction.
    Strict,
}

fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}

/// Load `<root>/.env` into the process environment.
///
/// Returns the path that was loaded, or `None` when nothing was loaded
/// (file absent under the lenient policy, or loading disabled).
///
/// # Errors
///
/// - `ConfigError::EnvFileNotFound` when the file is absent under `EnvFilePolicy::Strict`.
/// - `ConfigError::EnvFileLoad` when the file exists but cannot be read or parsed.
pub fn load_env_file(root: &Path, policy: EnvFilePolicy) -> Result<Option<PathBuf>, ConfigError> {
    if dotenv_disabled() {
        tracing::debug!("Skipping .env loading: {} is set", DOTENV_DISABLED_VAR);
        return Ok(None);
    }

    let path = root.join(ENV_FILE_NAME);
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            Ok(Some(path))
        }
        Err(e) if is_not_found(&e) => match policy {
            EnvFilePolicy::Lenient => {
                tracing::debug!(path = %path.display(), "No environment file present");
                Ok(None)
            }
            EnvFilePolicy::Strict => Err(ConfigError::EnvFileNotFound { path }),
        },
        Err(dotenvy::Error::LineParse(_, idx)) => Err(ConfigError::EnvFileLoad {
            path,
            message: format!("invalid syntax at position {idx}"),
        }),
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::EnvFileLoad {
            path,
            message: format!("read failed: {}", io_err.kind()),
        }),
        Err(_) => Err(ConfigError::EnvFileLoad {
            path,
            message: "unrecognized dotenv error".to_string(),
        }),
    }
}
