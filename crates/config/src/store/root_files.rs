//! On-demand loading of individual files from the project root.
//!
//! Responsibilities:
//! - Evaluate a named file at the root (outside the config directory) into
//!   the mapping, under a caller-chosen key or the file stem.
//! - Read or write a dot-path inside that file's value right away.
//!
//! Invariants:
//! - A storage key that is already present is not re-evaluated.
//! - A missing root or a missing file contributes nothing: reads fall back to
//!   the caller's default. Files that exist but fail to evaluate still raise.
//! - Redundant nesting is unwrapped only when the file's value is a mapping
//!   with exactly one member, named like the first segment of the target
//!   key. This is a heuristic, not a general rule.
//! - Unlike `set`, the create-path write may add new top-level keys and
//!   intermediate mappings.

use std::path::{Path, PathBuf};

use super::ConfigStore;
use crate::constants::KEY_SEPARATOR;
use crate::error::ConfigError;
use crate::resolver;
use crate::value::ConfigValue;

fn first_segment(key: &str) -> &str {
    key.split(KEY_SEPARATOR).next().unwrap_or(key)
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Store `{first: inner}` as `inner` when `first` is its only member.
fn unwrap_redundant_nesting(value: ConfigValue, first: &str) -> ConfigValue {
    match value {
        ConfigValue::Object(map) if map.len() == 1 && map.contains_key(first) => map
            .into_iter()
            .next()
            .map(|(_, inner)| inner)
            .unwrap_or_default(),
        other => other,
    }
}

impl ConfigStore {
    fn root_file_path(&self, filename: &str) -> Option<PathBuf> {
        let mut path = self.root_path()?.join(filename);
        if path.extension().is_none() {
            path.set_extension(self.options.evaluator().extension());
        }
        Some(path)
    }

    /// Evaluate `filename` into the mapping unless its storage key is
    /// already present. Returns the storage key.
    fn ensure_root_file(&mut self, filename: &str, key: Option<&str>) -> Result<String, ConfigError> {
        let storage_key = match key {
            Some(key) => first_segment(key).to_string(),
            None => file_stem(filename),
        };
        if self.items().contains_key(&storage_key) {
            tracing::trace!(key = %storage_key, "Root file already loaded");
            return Ok(storage_key);
        }

        let Some(path) = self.root_file_path(filename) else {
            tracing::debug!(file = filename, "No project root; skipping root file");
            return Ok(storage_key);
        };
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Root file does not exist; skipping");
            return Ok(storage_key);
        }

        let mut value = self.options.evaluator().evaluate(&path)?;
        if key.is_some() {
            value = unwrap_redundant_nesting(value, &storage_key);
        }
        tracing::debug!(path = %path.display(), key = %storage_key, "Loaded root configuration file");
        self.items_mut()?.insert(storage_key.clone(), value);
        Ok(storage_key)
    }

    /// Load `filename` from the project root and return either its whole
    /// value (`key == None`) or the value at `key`, falling back to `default`.
    ///
    /// A store without a root, or a file that does not exist, yields `default`.
    ///
    /// # Errors
    ///
    /// Source read/parse errors from evaluating an existing file.
    pub fn load_from_root(
        &mut self,
        filename: &str,
        key: Option<&str>,
        default: impl Into<ConfigValue>,
    ) -> Result<ConfigValue, ConfigError> {
        let storage_key = self.ensure_root_file(filename, key)?;
        Ok(self.get(key.unwrap_or(storage_key.as_str()), default))
    }

    /// Load `filename` from the project root, then write `value` at `key`.
    ///
    /// With `create_path`, missing top-level keys and intermediate mappings
    /// are created and the write always succeeds, even when the file does
    /// not exist. Without it, behaves like `set`: returns `Ok(false)` when
    /// `key` does not resolve.
    pub fn set_from_root(
        &mut self,
        filename: &str,
        key: &str,
        value: impl Into<ConfigValue>,
        create_path: bool,
    ) -> Result<bool, ConfigError> {
        self.ensure_root_file(filename, Some(key))?;
        let value = value.into();

        if create_path {
            resolver::set_creating(self.items_mut()?, key, value)?;
            return Ok(true);
        }
        if !self.has(key) {
            return Ok(false);
        }
        resolver::set_existing(self.items_mut()?, key, value)?;
        Ok(true)
    }
}
