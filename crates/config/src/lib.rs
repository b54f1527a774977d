//! Project-rooted configuration access.
//!
//! This crate locates a project's root directory, loads its `.env` file,
//! evaluates a directory tree of configuration sources into a flat keyed
//! mapping, and exposes dot-notation get/set/has over that mapping.

pub mod constants;
mod env;
mod error;
pub mod facade;
mod loader;
mod resolver;
mod store;
mod value;

pub use env::{coerce_env_value, env};
pub use error::ConfigError;
pub use loader::{
    EnvFilePolicy, JsonEvaluator, RootMarker, SourceEvaluator, TreeLayout, YamlEvaluator,
    build_tree, default_start_dir, load_env_file, locate_root,
};
pub use resolver::{KeyResolver, Resolution};
pub use store::{ConfigStore, LoadPolicy, StoreOptions};
pub use value::{ConfigMapping, ConfigValue};
