//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Translate global options into `StoreOptions`.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rootconf_config::constants::{DEFAULT_CONFIG_DIR, DEFAULT_MARKER_DIR};
use rootconf_config::{
    EnvFilePolicy, LoadPolicy, RootMarker, StoreOptions, TreeLayout, YamlEvaluator,
};

#[derive(Parser)]
#[command(name = "rootconf")]
#[command(about = "Inspect project configuration resolved with dot notation", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  rootconf get services.mail.smtp.host\n  rootconf --root /srv/shop has app.debug\n  rootconf get app.locale --default '\"en\"'\n  rootconf env APP_WORKERS --numeric\n  rootconf root-file services.json --key services.queue\n"
)]
pub struct Cli {
    /// Directory to start root discovery from (defaults to the executable's directory)
    #[arg(long, global = true, env = "ROOTCONF_START_DIR")]
    pub start_dir: Option<PathBuf>,

    /// Use this directory as the project root and skip discovery
    #[arg(long, global = true, env = "ROOTCONF_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration directory, relative to the project root
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Directory whose presence marks the project root
    #[arg(long, global = true, default_value = DEFAULT_MARKER_DIR)]
    pub marker: String,

    /// File that must exist inside the marker directory
    #[arg(long, global = true)]
    pub bootstrap_file: Option<String>,

    /// Fail when the project root has no .env file
    #[arg(long, global = true)]
    pub strict_env: bool,

    /// Load the configuration directory at startup instead of on first read
    #[arg(long, global = true)]
    pub eager: bool,

    /// Only read files directly inside the configuration directory
    #[arg(long, global = true)]
    pub flat: bool,

    /// Read .yaml configuration sources instead of .json
    #[arg(long, global = true)]
    pub yaml: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value at a dotted key
    Get {
        /// Dotted key, e.g. services.mail.smtp.host
        key: String,

        /// Value printed when the key is missing (parsed as JSON, else taken as a string)
        #[arg(long)]
        default: Option<String>,
    },

    /// Exit successfully when a dotted key exists
    Has {
        /// Dotted key to test
        key: String,
    },

    /// Print every loaded configuration entry
    All,

    /// Print the discovered project root
    Root,

    /// Print an environment variable with literal coercion applied
    Env {
        /// Variable name
        name: String,

        /// Convert numeric strings to numbers
        #[arg(long)]
        numeric: bool,

        /// Value printed when the variable is unset (parsed as JSON, else taken as a string)
        #[arg(long)]
        default: Option<String>,
    },

    /// Load a file from the project root and print it, or the value at --key
    RootFile {
        /// File name relative to the root; the source extension is appended when missing
        filename: String,

        /// Dotted key to resolve after loading
        #[arg(long)]
        key: Option<String>,
    },
}

impl Cli {
    /// Build store options from the global flags.
    pub fn store_options(&self) -> StoreOptions {
        let mut marker = RootMarker::new(self.marker.clone());
        if let Some(ref file) = self.bootstrap_file {
            marker = marker.with_bootstrap_file(file.clone());
        }

        let mut options = StoreOptions::new()
            .with_marker(marker)
            .with_config_dir(self.config_dir.clone());

        if let Some(ref dir) = self.start_dir {
            options = options.with_start_dir(dir.clone());
        }
        if let Some(ref root) = self.root {
            options = options.with_root(root.clone());
        }
        if self.strict_env {
            options = options.with_env_policy(EnvFilePolicy::Strict);
        }
        if self.eager {
            options = options.with_load_policy(LoadPolicy::Eager);
        }
        if self.flat {
            options = options.with_layout(TreeLayout::Flat);
        }
        if self.yaml {
            options = options.with_evaluator(YamlEvaluator);
        }
        options
    }
}
