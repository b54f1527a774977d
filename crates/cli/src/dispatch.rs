//! Command dispatch logic.
//!
//! Responsibilities:
//! - Open the configuration store from the global options.
//! - Route parsed CLI arguments to the matching store operation.
//! - Print results as JSON on stdout.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//!
//! Invariants:
//! - Store construction failures propagate; they are startup failures.
//! - The `env` command tolerates a missing root so it works outside projects.

use anyhow::{Context, Result};
use rootconf_config::{ConfigStore, ConfigValue, env};

use crate::args::{Cli, Commands};
use crate::error::ExitCode;

/// Parse a `--default` argument as JSON, falling back to a plain string.
fn parse_literal(raw: Option<String>) -> ConfigValue {
    match raw {
        Some(raw) => serde_json::from_str(&raw).unwrap_or(ConfigValue::String(raw)),
        None => ConfigValue::Null,
    }
}

fn print_json(value: &ConfigValue) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render value")?;
    println!("{rendered}");
    Ok(())
}

/// Dispatch CLI commands to their respective store operations.
pub(crate) fn run_command(cli: Cli) -> Result<ExitCode> {
    let mut options = cli.store_options();
    if matches!(cli.command, Commands::Env { .. }) {
        options = options.with_require_root(false);
    }
    let mut store = ConfigStore::open(options).context("Failed to open configuration store")?;
    tracing::debug!(root = ?store.root_path(), "Configuration store ready");

    match cli.command {
        Commands::Get { key, default } => {
            if default.is_none() && !store.has(&key) {
                eprintln!("Configuration key '{key}' not found");
                return Ok(ExitCode::KeyNotFound);
            }
            print_json(&store.get(&key, parse_literal(default)))?;
        }
        Commands::Has { key } => {
            let present = store.has(&key);
            print_json(&ConfigValue::Bool(present))?;
            if !present {
                return Ok(ExitCode::KeyNotFound);
            }
        }
        Commands::All => {
            let items = store.ensure_loaded().context("Failed to load configuration")?;
            print_json(&ConfigValue::Object(items.clone()))?;
        }
        Commands::Root => match store.root_path() {
            Some(root) => println!("{}", root.display()),
            None => return Ok(ExitCode::RootNotFound),
        },
        Commands::Env {
            name,
            numeric,
            default,
        } => {
            print_json(&env(&name, parse_literal(default), numeric))?;
        }
        Commands::RootFile { filename, key } => {
            let value = store
                .load_from_root(&filename, key.as_deref(), ConfigValue::Null)
                .with_context(|| format!("Failed to load '{filename}' from the project root"))?;
            print_json(&value)?;
        }
    }

    Ok(ExitCode::Success)
}
