//! Project root discovery.
//!
//! Responsibilities:
//! - Walk upward from a start directory until a directory carries the root marker.
//! - Determine the default start directory (the running executable's location).
//!
//! Does NOT handle:
//! - Caching the discovered root (the store keeps it for its lifetime).
//!
//! Invariants:
//! - At most `MAX_ROOT_SEARCH_DEPTH` directories are tested, the start included.
//! - The walk stops at the filesystem root.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::constants::{DEFAULT_MARKER_DIR, MAX_ROOT_SEARCH_DEPTH};

/// Filesystem signal identifying the project root.
///
/// A directory is the root when it contains the marker directory, and, if a
/// bootstrap file is configured, that file exists inside the marker directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMarker {
    dir: String,
    bootstrap_file: Option<String>,
}

impl Default for RootMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_DIR)
    }
}

impl RootMarker {
    /// Marker satisfied by the presence of `dir`.
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            bootstrap_file: None,
        }
    }

    /// Additionally require `file` inside the marker directory.
    pub fn with_bootstrap_file(mut self, file: impl Into<String>) -> Self {
        self.bootstrap_file = Some(file.into());
        self
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn bootstrap_file(&self) -> Option<&str> {
        self.bootstrap_file.as_deref()
    }

    /// Whether `candidate` carries this marker.
    pub fn matches(&self, candidate: &Path) -> bool {
        let marker = candidate.join(&self.dir);
        match &self.bootstrap_file {
            Some(file) => marker.join(file).is_file(),
            None => marker.is_dir(),
        }
    }
}

/// Returns the directory containing the running executable.
///
/// This is where root discovery starts by default, so a library nested
/// inside a deployed project finds that project rather than the caller's
/// working directory.
pub fn default_start_dir() -> Result<PathBuf, anyhow::Error> {
    let exe = std::env::current_exe().context("Failed to determine current executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Current executable has no parent directory")
}

/// Walk upward from `start` looking for a directory matching `marker`.
///
/// Returns `None` when the filesystem root is reached or the step budget is
/// exhausted first.
pub fn locate_root(start: &Path, marker: &RootMarker) -> Option<PathBuf> {
    let mut current = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());

    for _ in 0..MAX_ROOT_SEARCH_DEPTH {
        tracing::trace!(dir = %current.display(), marker = marker.dir(), "Checking for root marker");
        if marker.matches(&current) {
            return Some(current);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }

    None
}
