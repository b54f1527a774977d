//! rootconf - command-line access to project configuration.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Open a configuration store and run one lookup against it.
//!
//! Does NOT handle:
//! - Resolution logic (see `crates/config`).
//!
//! Invariants:
//! - Logging goes to stderr so stdout carries only command output.
//! - Store construction failures exit non-zero with the offending path in the message.

mod args;
mod dispatch;
mod error;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    if exit_code != ExitCode::Success {
        tracing::debug!(code = exit_code.as_i32(), "Exiting with failure");
    }
    std::process::exit(exit_code.as_i32());
}
