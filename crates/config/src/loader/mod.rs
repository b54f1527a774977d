//! Discovery and loading of the project root, `.env` file and configuration tree.
//!
//! Responsibilities:
//! - Locate the project root by walking parent directories for a marker.
//! - Populate the process environment from the root's `.env` file.
//! - Evaluate every configuration source below the config directory into a
//!   flat, dot-keyed mapping.
//!
//! Does NOT handle:
//! - Dot-notation lookups over the loaded mapping (see `resolver.rs`).
//! - Deciding when loading happens (see `store/`).
//!
//! Invariants / Assumptions:
//! - Root discovery visits at most `MAX_ROOT_SEARCH_DEPTH` directories.
//! - A missing config directory yields an empty mapping, never an error.
//! - The `DOTENV_DISABLED` variable is checked before any `.env` file is read.

mod dotenv;
mod evaluator;
mod root;
mod tree;

pub use dotenv::{EnvFilePolicy, load_env_file};
pub use evaluator::{JsonEvaluator, SourceEvaluator, YamlEvaluator};
pub use root::{RootMarker, default_start_dir, locate_root};
pub use tree::{TreeLayout, build_tree};
