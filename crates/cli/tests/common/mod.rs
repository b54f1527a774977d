//! Shared test utilities for rootconf integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Build throwaway projects on disk.
//!
//! Invariants / Assumptions:
//! - All integration tests using `rootconf_cmd` are hermetic by default.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `rootconf` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent `.env` contamination.
/// - Root-selection env vars are cleared to ensure no leakage from the host.
pub fn rootconf_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rootconf");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env_remove("ROOTCONF_START_DIR")
        .env_remove("ROOTCONF_ROOT")
        .env_remove("RUST_LOG");

    cmd
}

pub fn write(base: &Path, relative: &str, content: &str) {
    let path = base.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project with a `vendor/` marker and a small config tree.
pub fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let base = temp.path();
    fs::create_dir_all(base.join("vendor/bin")).unwrap();
    write(base, "config/app.json", r#"{"name": "shop", "debug": false}"#);
    write(
        base,
        "config/services/mail/smtp.json",
        r#"{"host": "smtp.local", "port": 25}"#,
    );
    temp
}
