//! Configuration directory walk.
//!
//! Responsibilities:
//! - Enumerate source files below the config directory.
//! - Derive each file's top-level key from its relative path.
//! - Evaluate each file and collect the results into one flat mapping.
//!
//! Does NOT handle:
//! - Evaluating file contents (delegated to a `SourceEvaluator`).
//!
//! Invariants:
//! - Keys join relative path components with `.` and drop the extension
//!   (`services/mail/smtp.json` becomes `services.mail.smtp`).
//! - Enumeration order is whatever the OS reports. When two files normalize
//!   to the same key the later one wins.
//! - Symlinks are not followed.

use std::ffi::OsStr;
use std::path::Path;

use walkdir::WalkDir;

use super::evaluator::SourceEvaluator;
use crate::constants::KEY_SEPARATOR_STR;
use crate::error::ConfigError;
use crate::value::ConfigMapping;

/// How deep the config directory is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeLayout {
    /// Walk every subdirectory; directories contribute key prefixes.
    #[default]
    Recursive,
    /// Only files directly inside the config directory; key is the file stem.
    Flat,
}

/// Derive the top-level key for `path` relative to `base`.
///
/// Returns `None` for paths outside `base` or with non UTF-8 components.
pub(crate) fn source_key(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?.with_extension("");
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join(KEY_SEPARATOR_STR))
}

/// Build the flat configuration mapping from `dir`.
///
/// A missing directory yields an empty mapping.
pub fn build_tree(
    dir: &Path,
    layout: TreeLayout,
    evaluator: &dyn SourceEvaluator,
) -> Result<ConfigMapping, ConfigError> {
    let mut items = ConfigMapping::new();
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "No configuration directory; using empty mapping");
        return Ok(items);
    }

    let max_depth = match layout {
        TreeLayout::Recursive => usize::MAX,
        TreeLayout::Flat => 1,
    };

    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some(evaluator.extension()) {
            tracing::trace!(path = %path.display(), "Skipping non-source file");
            continue;
        }
        let Some(key) = source_key(dir, path) else {
            tracing::warn!(path = %path.display(), "Skipping source with non UTF-8 path");
            continue;
        };

        let value = evaluator.evaluate(path)?;
        tracing::trace!(key = %key, path = %path.display(), "Loaded configuration source");
        if items.insert(key.clone(), value).is_some() {
            tracing::debug!(key = %key, "Configuration source overrides an earlier one with the same key");
        }
    }

    tracing::debug!(dir = %dir.display(), entries = items.len(), "Built configuration tree");
    Ok(items)
}
