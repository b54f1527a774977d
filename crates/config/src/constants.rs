//! Centralized constants for the rootconf workspace.
//!
//! This module contains default file names and search bounds used across
//! crates to avoid magic value duplication.

// =============================================================================
// Root Discovery
// =============================================================================

/// Maximum number of parent directories visited while searching for the root.
pub const MAX_ROOT_SEARCH_DEPTH: usize = 10;

/// Directory whose presence marks the project root by default.
pub const DEFAULT_MARKER_DIR: &str = "vendor";

// =============================================================================
// Project Layout
// =============================================================================

/// Name of the dotenv file read from the project root.
pub const ENV_FILE_NAME: &str = ".env";

/// Default directory (relative to the root) holding configuration sources.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Separator used both for nested traversal and directory-derived keys.
pub const KEY_SEPARATOR: char = '.';

/// [`KEY_SEPARATOR`] as a string, for joining segments.
pub const KEY_SEPARATOR_STR: &str = ".";

// =============================================================================
// Environment
// =============================================================================

/// Setting this variable to `1` or `true` skips `.env` loading entirely.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";
