//! The configuration store.
//!
//! Responsibilities:
//! - Run root discovery and `.env` loading once, at construction.
//! - Own the flat configuration mapping, walking the config directory
//!   eagerly or on first use according to `LoadPolicy`.
//! - Expose dot-notation `get`/`has`/`set` over the mapping.
//!
//! Does NOT handle:
//! - The process-wide default instance (see `facade.rs`).
//! - Persisting runtime overrides back to source files.
//!
//! Invariants / Assumptions:
//! - The root is discovered once and never changes for the store's lifetime.
//! - Reads never fail; missing keys resolve to the caller's default.
//! - Under `LoadPolicy::Lazy`, a tree that fails to load during an implicit
//!   read is logged and the read sees an empty mapping. Nothing is cached, so
//!   the next access retries and `ensure_loaded()` still surfaces the error.
//! - Writes never run against a tree that failed to load.
//! - Source evaluation must not call back into the store that is loading it.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::de::DeserializeOwned;

use crate::constants::MAX_ROOT_SEARCH_DEPTH;
use crate::error::ConfigError;
use crate::loader::{build_tree, default_start_dir, load_env_file, locate_root};
use crate::resolver::{self, KeyResolver};
use crate::value::{ConfigMapping, ConfigValue};

mod options;
mod root_files;

pub use options::{LoadPolicy, StoreOptions};

static EMPTY_MAPPING: LazyLock<ConfigMapping> = LazyLock::new(ConfigMapping::new);

/// Dot-notation configuration store rooted at a project directory.
#[derive(Debug)]
pub struct ConfigStore {
    options: StoreOptions,
    root: Option<PathBuf>,
    items: OnceCell<ConfigMapping>,
    seed: Option<ConfigMapping>,
}

impl ConfigStore {
    /// Discover the root, load `.env`, and (under `LoadPolicy::Eager`) load
    /// the configuration tree.
    ///
    /// # Errors
    ///
    /// - `ConfigError::RootNotFound` when discovery fails and the root is required.
    /// - `ConfigError::EnvFileNotFound` / `ConfigError::EnvFileLoad` from `.env` loading.
    /// - Source evaluation errors under `LoadPolicy::Eager`.
    pub fn open(options: StoreOptions) -> Result<Self, ConfigError> {
        let root = discover_root(&options)?;
        if let Some(root) = &root {
            load_env_file(root, options.env_policy())?;
        }

        let store = Self {
            options,
            root,
            items: OnceCell::new(),
            seed: None,
        };
        if store.options.load_policy() == LoadPolicy::Eager {
            store.ensure_loaded()?;
        }
        Ok(store)
    }

    /// Store over an in-memory mapping, with no root and no filesystem access.
    ///
    /// [`ConfigStore::reset`] restores `items` instead of running discovery.
    pub fn from_mapping(items: ConfigMapping) -> Self {
        Self {
            options: StoreOptions::new().with_require_root(false),
            root: None,
            items: OnceCell::from(items.clone()),
            seed: Some(items),
        }
    }

    /// Rebuild this store from its options, discarding runtime overrides.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        if let Some(seed) = &self.seed {
            self.items = OnceCell::from(seed.clone());
            return Ok(());
        }
        *self = Self::open(self.options.clone())?;
        Ok(())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The discovered (or configured) project root.
    pub fn root_path(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Absolute path of the configuration directory, when a root is known.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(self.options.config_dir()))
    }

    /// Whether the configuration tree has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.items.get().is_some()
    }

    /// Load the configuration tree now if it has not been loaded yet,
    /// surfacing evaluation errors.
    pub fn ensure_loaded(&self) -> Result<&ConfigMapping, ConfigError> {
        if let Some(items) = self.items.get() {
            return Ok(items);
        }
        let items = self.build_tree()?;
        Ok(self.items.get_or_init(|| items))
    }

    fn build_tree(&self) -> Result<ConfigMapping, ConfigError> {
        match self.config_dir() {
            Some(dir) => build_tree(&dir, self.options.layout(), self.options.evaluator()),
            None => Ok(ConfigMapping::new()),
        }
    }

    fn items(&self) -> &ConfigMapping {
        self.ensure_loaded().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to load configuration tree; reading from an empty mapping");
            &*EMPTY_MAPPING
        })
    }

    fn items_mut(&mut self) -> Result<&mut ConfigMapping, ConfigError> {
        if self.items.get().is_none() {
            let loaded = self.build_tree()?;
            self.items = OnceCell::from(loaded);
        }
        match self.items.get_mut() {
            Some(items) => Ok(items),
            None => unreachable!("configuration tree is initialized above"),
        }
    }

    /// Every loaded entry, keyed by top-level key.
    pub fn all(&self) -> &ConfigMapping {
        self.items()
    }

    /// Resolve `key`, borrowing the stored value.
    pub fn get_ref(&self, key: &str) -> Option<&ConfigValue> {
        KeyResolver::new(self.items()).get(key)
    }

    /// Resolve `key`, falling back to `default` when it does not exist.
    pub fn get(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.get_ref(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Resolve `key` and deserialize it into `T`.
    ///
    /// Returns `Ok(None)` for missing keys and `ConfigError::Conversion` when
    /// the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get_ref(key)
            .map(|value| {
                T::deserialize(value).map_err(|e| ConfigError::Conversion {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Whether `key` resolves. A stored null counts as present.
    pub fn has(&self, key: &str) -> bool {
        KeyResolver::new(self.items()).has(key)
    }

    /// Overwrite an existing key. Returns `false` (and changes nothing) when
    /// `key` does not already resolve or the tree cannot be loaded.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> bool {
        match self.items_mut() {
            Ok(items) => resolver::set(items, key, value.into()),
            Err(err) => {
                tracing::error!(key, error = %err, "Failed to load configuration tree; ignoring write");
                false
            }
        }
    }

    /// Like [`ConfigStore::set`], but fails with `ConfigError::KeyNotFound`,
    /// or with the load error when the tree cannot be loaded.
    pub fn set_or_fail(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        resolver::set_or_fail(self.items_mut()?, key, value.into())
    }
}

fn discover_root(options: &StoreOptions) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(root) = options.root() {
        tracing::debug!(root = %root.display(), "Using configured project root");
        return Ok(Some(root.to_path_buf()));
    }

    let start = match options.start_dir() {
        Some(dir) => dir.to_path_buf(),
        None => default_start_dir().map_err(|e| ConfigError::StartDirUnavailable(e.to_string()))?,
    };

    match locate_root(&start, options.marker()) {
        Some(root) => {
            tracing::debug!(root = %root.display(), "Discovered project root");
            Ok(Some(root))
        }
        None if options.require_root() => Err(ConfigError::RootNotFound {
            start,
            max_depth: MAX_ROOT_SEARCH_DEPTH,
        }),
        None => {
            tracing::warn!(start = %start.display(), "No project root found; continuing without one");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests;
