//! Construction options for `ConfigStore`.
//!
//! Responsibilities:
//! - Collect every knob of the discovery → env → tree pipeline in one builder.
//!
//! Does NOT handle:
//! - Running the pipeline (see `store/mod.rs`).
//!
//! Invariants:
//! - An explicit root always bypasses discovery.
//! - Defaults: marker `vendor/`, lenient `.env`, lazy recursive JSON tree
//!   under `config/`, root required.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::DEFAULT_CONFIG_DIR;
use crate::loader::{EnvFilePolicy, JsonEvaluator, RootMarker, SourceEvaluator, TreeLayout};

/// When the configuration directory is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Defer the walk until the first read or write of the mapping.
    #[default]
    Lazy,
    /// Walk the directory during construction.
    Eager,
}

/// Options controlling how a `ConfigStore` discovers and loads configuration.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    start_dir: Option<PathBuf>,
    root: Option<PathBuf>,
    marker: RootMarker,
    require_root: bool,
    env_policy: EnvFilePolicy,
    load_policy: LoadPolicy,
    layout: TreeLayout,
    config_dir: PathBuf,
    evaluator: Arc<dyn SourceEvaluator>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self {
            start_dir: None,
            root: None,
            marker: RootMarker::default(),
            require_root: true,
            env_policy: EnvFilePolicy::default(),
            load_policy: LoadPolicy::default(),
            layout: TreeLayout::default(),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            evaluator: Arc::new(JsonEvaluator),
        }
    }

    /// Start root discovery from `dir` instead of the executable's directory.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Use `root` as the project root and skip discovery.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_marker(mut self, marker: RootMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Whether a failed discovery aborts construction (default `true`).
    pub fn with_require_root(mut self, required: bool) -> Self {
        self.require_root = required;
        self
    }

    pub fn with_env_policy(mut self, policy: EnvFilePolicy) -> Self {
        self.env_policy = policy;
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_layout(mut self, layout: TreeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Config directory, relative to the root.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    pub fn with_evaluator(mut self, evaluator: impl SourceEvaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    pub fn start_dir(&self) -> Option<&Path> {
        self.start_dir.as_deref()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn marker(&self) -> &RootMarker {
        &self.marker
    }

    pub fn require_root(&self) -> bool {
        self.require_root
    }

    pub fn env_policy(&self) -> EnvFilePolicy {
        self.env_policy
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy
    }

    pub fn layout(&self) -> TreeLayout {
        self.layout
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn evaluator(&self) -> &dyn SourceEvaluator {
        self.evaluator.as_ref()
    }
}
