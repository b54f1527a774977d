//! Evaluation of configuration source files into values.
//!
//! Responsibilities:
//! - Define the `SourceEvaluator` seam turning one source file into a `ConfigValue`.
//! - Provide JSON (default) and YAML evaluators.
//!
//! Does NOT handle:
//! - Choosing which files to evaluate (see `tree.rs`).
//!
//! Invariants:
//! - Read failures and parse failures are reported as distinct error variants,
//!   both carrying the offending path.

use std::fmt;
use std::path::Path;

use crate::error::ConfigError;
use crate::value::ConfigValue;

/// Turns a configuration source file into a value.
///
/// Implementations must be shareable across threads so a store can sit
/// behind the process-wide facade.
pub trait SourceEvaluator: fmt::Debug + Send + Sync {
    /// File extension (without the dot) recognized as a source file.
    fn extension(&self) -> &str;

    /// Evaluate the file at `path`.
    fn evaluate(&self, path: &Path) -> Result<ConfigValue, ConfigError>;
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Evaluates `.json` files with `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEvaluator;

impl SourceEvaluator for JsonEvaluator {
    fn extension(&self) -> &str {
        "json"
    }

    fn evaluate(&self, path: &Path) -> Result<ConfigValue, ConfigError> {
        let content = read_source(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::SourceParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Evaluates `.yaml` files with `serde_yaml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlEvaluator;

impl SourceEvaluator for YamlEvaluator {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn evaluate(&self, path: &Path) -> Result<ConfigValue, ConfigError> {
        let content = read_source(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::SourceParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
