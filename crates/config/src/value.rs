//! Configuration value model and path traversal helpers.
//!
//! Responsibilities:
//! - Name the variant value type evaluated sources produce.
//! - Walk and write nested values one dot-separated segment at a time.
//!
//! Does NOT handle:
//! - Deciding which top-level entry owns a dotted key (see `resolver.rs`).
//!
//! Invariants:
//! - Mappings are traversed by exact member name.
//! - Lists are traversed only by a canonical decimal index (`0`, `12`, never `01`).

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// A single configuration value: null, bool, number, string, list or mapping.
pub type ConfigValue = Value;

/// Mapping from string key to configuration value.
pub type ConfigMapping = Map<String, ConfigValue>;

/// How [`write_path`] treats intermediate members that are missing or not
/// traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Replace missing or scalar intermediates with empty mappings.
    Create,
    /// Fail on missing or scalar intermediates.
    Existing,
}

fn list_index(segment: &str) -> Option<usize> {
    let index: usize = segment.parse().ok()?;
    (index.to_string() == segment).then_some(index)
}

fn empty_mapping() -> ConfigValue {
    ConfigValue::Object(ConfigMapping::new())
}

/// Descend one segment into `value`.
pub(crate) fn child<'a>(value: &'a ConfigValue, segment: &str) -> Option<&'a ConfigValue> {
    match value {
        ConfigValue::Object(map) => map.get(segment),
        ConfigValue::Array(items) => list_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Follow `segments` from `value`, returning `None` as soon as a step fails.
pub(crate) fn lookup<'a>(value: &'a ConfigValue, segments: &[&str]) -> Option<&'a ConfigValue> {
    segments
        .iter()
        .try_fold(value, |current, segment| child(current, segment))
}

fn not_traversable(key: &str, segment: &str) -> ConfigError {
    ConfigError::NotTraversable {
        key: key.to_string(),
        segment: segment.to_string(),
    }
}

/// Index of `segment` when `value` is a list and the index is in range.
fn in_range_index(value: &ConfigValue, segment: &str) -> Option<usize> {
    let index = list_index(segment)?;
    value
        .as_array()
        .is_some_and(|items| index < items.len())
        .then_some(index)
}

/// Turn a non-mapping `value` into an empty mapping under `WriteMode::Create`.
fn make_traversable(
    value: &mut ConfigValue,
    segment: &str,
    mode: WriteMode,
    key: &str,
) -> Result<(), ConfigError> {
    if value.is_object() {
        return Ok(());
    }
    match mode {
        WriteMode::Create => {
            *value = empty_mapping();
            Ok(())
        }
        WriteMode::Existing => Err(not_traversable(key, segment)),
    }
}

fn step_mut<'a>(
    current: &'a mut ConfigValue,
    segment: &str,
    mode: WriteMode,
    key: &str,
) -> Result<&'a mut ConfigValue, ConfigError> {
    if let Some(index) = in_range_index(current, segment) {
        return current
            .get_mut(index)
            .ok_or_else(|| not_traversable(key, segment));
    }

    make_traversable(current, segment, mode, key)?;
    let ConfigValue::Object(map) = current else {
        return Err(not_traversable(key, segment));
    };
    match mode {
        WriteMode::Create => Ok(map
            .entry(segment.to_string())
            .or_insert_with(empty_mapping)),
        WriteMode::Existing => map
            .get_mut(segment)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string())),
    }
}

/// Write `value` at `segments` below `target`.
///
/// An empty segment list replaces `target` itself. `key` is the full dotted
/// key and is only used for error context.
pub(crate) fn write_path(
    target: &mut ConfigValue,
    segments: &[&str],
    value: ConfigValue,
    mode: WriteMode,
    key: &str,
) -> Result<(), ConfigError> {
    let Some((last, parents)) = segments.split_last() else {
        *target = value;
        return Ok(());
    };

    let mut current = target;
    for segment in parents {
        current = step_mut(current, segment, mode, key)?;
    }

    if let Some(index) = in_range_index(current, last) {
        current[index] = value;
        return Ok(());
    }

    make_traversable(current, last, mode, key)?;
    match current {
        ConfigValue::Object(map) => {
            map.insert((*last).to_string(), value);
            Ok(())
        }
        _ => Err(not_traversable(key, last)),
    }
}
