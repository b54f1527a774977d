//! Dot-notation key resolution over the flat configuration mapping.
//!
//! Responsibilities:
//! - Decide which prefix of a dotted key names a top-level entry and which
//!   suffix is traversed inside that entry's value.
//! - Implement the read (`get`/`has`) and write (`set`, create-path) rules on
//!   top of that decomposition.
//!
//! Does NOT handle:
//! - Loading the mapping (see `loader/`).
//! - Lazy initialization or the process-wide instance (see `store/`, `facade.rs`).
//!
//! Invariants:
//! - An exact top-level match always wins over any decomposition.
//! - Prefixes are tried longest first, and the search stops at the first
//!   prefix that exists even when traversal into it then fails. Shorter
//!   prefixes are never retried.
//! - `set` never creates a key that `has` does not already report.

use crate::constants::{KEY_SEPARATOR, KEY_SEPARATOR_STR};
use crate::error::ConfigError;
use crate::value::{ConfigMapping, ConfigValue, WriteMode, lookup, write_path};

/// Split of a dotted key into its owning top-level entry and the remaining
/// nested segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'k> {
    /// Top-level key that owns the lookup.
    pub top: String,
    /// Segments to traverse inside the top-level value.
    pub rest: Vec<&'k str>,
}

/// Read-only resolver over a flat configuration mapping.
#[derive(Debug, Clone, Copy)]
pub struct KeyResolver<'a> {
    items: &'a ConfigMapping,
}

impl<'a> KeyResolver<'a> {
    pub fn new(items: &'a ConfigMapping) -> Self {
        Self { items }
    }

    /// Find the top-level entry owning `key`, longest prefix first.
    pub fn locate<'k>(&self, key: &'k str) -> Option<Resolution<'k>> {
        if self.items.contains_key(key) {
            return Some(Resolution {
                top: key.to_string(),
                rest: Vec::new(),
            });
        }
        if !key.contains(KEY_SEPARATOR) {
            return None;
        }

        let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        (1..segments.len()).rev().find_map(|len| {
            let candidate = segments[..len].join(KEY_SEPARATOR_STR);
            self.items.contains_key(&candidate).then(|| Resolution {
                top: candidate,
                rest: segments[len..].to_vec(),
            })
        })
    }

    /// Resolve `key` to a borrowed value, or `None` when it does not exist.
    pub fn get(&self, key: &str) -> Option<&'a ConfigValue> {
        let resolution = self.locate(key)?;
        let value = self.items.get(&resolution.top)?;
        lookup(value, &resolution.rest)
    }

    /// Whether `key` resolves to a value. A stored null counts as present.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Overwrite an existing key. Returns `false` without mutating anything when
/// the key does not resolve.
pub(crate) fn set(items: &mut ConfigMapping, key: &str, value: ConfigValue) -> bool {
    match assign(items, key, value, WriteMode::Create) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(key, error = %err, "Refusing to set configuration key");
            false
        }
    }
}

/// Overwrite an existing key, failing with [`ConfigError::KeyNotFound`] when
/// it does not resolve.
pub(crate) fn set_or_fail(
    items: &mut ConfigMapping,
    key: &str,
    value: ConfigValue,
) -> Result<(), ConfigError> {
    assign(items, key, value, WriteMode::Create)
}

/// Overwrite an existing key through members that must all already be
/// traversable.
pub(crate) fn set_existing(
    items: &mut ConfigMapping,
    key: &str,
    value: ConfigValue,
) -> Result<(), ConfigError> {
    assign(items, key, value, WriteMode::Existing)
}

fn assign(
    items: &mut ConfigMapping,
    key: &str,
    value: ConfigValue,
    mode: WriteMode,
) -> Result<(), ConfigError> {
    let resolver = KeyResolver::new(items);
    if !resolver.has(key) {
        return Err(ConfigError::KeyNotFound(key.to_string()));
    }
    let Some(Resolution { top, rest }) = resolver.locate(key) else {
        return Err(ConfigError::KeyNotFound(key.to_string()));
    };

    match items.get_mut(&top) {
        Some(target) => write_path(target, &rest, value, mode, key),
        None => Err(ConfigError::KeyNotFound(key.to_string())),
    }
}

/// Write `key`, materializing missing top-level entries and intermediate
/// mappings along the way.
///
/// When no prefix of `key` exists, the first segment becomes a new
/// top-level entry.
pub(crate) fn set_creating(
    items: &mut ConfigMapping,
    key: &str,
    value: ConfigValue,
) -> Result<(), ConfigError> {
    let (top, rest) = match KeyResolver::new(items).locate(key) {
        Some(Resolution { top, rest }) => (top, rest),
        None => {
            let mut segments = key.split(KEY_SEPARATOR);
            let first = segments.next().unwrap_or(key).to_string();
            (first, segments.collect())
        }
    };

    let target = items.entry(top).or_insert(ConfigValue::Null);
    write_path(target, &rest, value, WriteMode::Create, key)
}
