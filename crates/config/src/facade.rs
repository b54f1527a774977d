//! Process-wide default store and free-function accessors.
//!
//! Responsibilities:
//! - Hold one lazily opened `ConfigStore` for callers that do not pass a
//!   store around explicitly.
//! - Mirror the store's operations as free functions.
//!
//! Does NOT handle:
//! - Any resolution logic of its own; every call forwards to `ConfigStore`.
//!
//! Invariants:
//! - The instance is opened at most once between resets, under the mutex.
//! - `reset()` drops the instance; the next call re-runs discovery and loading.
//! - Configuration sources must not call back into these functions while
//!   the instance is being opened (the mutex is not re-entrant).

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::ConfigError;
use crate::store::{ConfigStore, StoreOptions};
use crate::value::{ConfigMapping, ConfigValue};

static STORE: Mutex<Option<ConfigStore>> = Mutex::new(None);

/// Run `f` against the process-wide store, opening it with default options
/// on first use.
pub fn with_store<R>(f: impl FnOnce(&mut ConfigStore) -> R) -> Result<R, ConfigError> {
    let mut guard = STORE.lock().unwrap_or_else(PoisonError::into_inner);
    let store = match guard.take() {
        Some(store) => store,
        None => ConfigStore::open(StoreOptions::default())?,
    };
    Ok(f(guard.insert(store)))
}

/// Replace the process-wide store with `store`.
pub fn install(store: ConfigStore) {
    let mut guard = STORE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(store);
}

/// Drop the process-wide store. The next access reconstructs it.
pub fn reset() {
    let mut guard = STORE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

pub fn get(key: &str, default: impl Into<ConfigValue>) -> Result<ConfigValue, ConfigError> {
    with_store(|store| store.get(key, default))
}

pub fn has(key: &str) -> Result<bool, ConfigError> {
    with_store(|store| store.has(key))
}

pub fn set(key: &str, value: impl Into<ConfigValue>) -> Result<bool, ConfigError> {
    with_store(|store| store.set(key, value))
}

pub fn set_or_fail(key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
    with_store(|store| store.set_or_fail(key, value))?
}

/// Snapshot of every loaded entry.
pub fn all() -> Result<ConfigMapping, ConfigError> {
    with_store(|store| store.all().clone())
}

pub fn root_path() -> Result<Option<PathBuf>, ConfigError> {
    with_store(|store| store.root_path().map(PathBuf::from))
}

pub fn load_from_root(
    filename: &str,
    key: Option<&str>,
    default: impl Into<ConfigValue>,
) -> Result<ConfigValue, ConfigError> {
    with_store(|store| store.load_from_root(filename, key, default))?
}

pub fn set_from_root(
    filename: &str,
    key: &str,
    value: impl Into<ConfigValue>,
    create_path: bool,
) -> Result<bool, ConfigError> {
    with_store(|store| store.set_from_root(filename, key, value, create_path))?
}
