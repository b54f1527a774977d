//! Environment variable access with literal coercion.
//!
//! Responsibilities:
//! - Read a process environment variable, falling back to a default.
//! - Coerce the literal strings `true`, `false`, `null`, `empty` (optionally
//!   parenthesized, case-insensitive) and, on request, numbers.
//!
//! Does NOT handle:
//! - Loading `.env` files (see `loader/dotenv.rs`; it writes into the
//!   process environment this module reads).
//!
//! Invariants:
//! - Unset or non-unicode variables yield the default.
//! - An integer is `-?[0-9]+` that fits in an `i64`; any other numeric
//!   string becomes a float.
//! - Strings that do not coerce are returned unchanged.

use serde_json::Number;

use crate::value::ConfigValue;

/// Read `name` from the process environment and coerce it.
pub fn env(name: &str, default: impl Into<ConfigValue>, convert_numeric: bool) -> ConfigValue {
    match std::env::var(name) {
        Ok(raw) => coerce_env_value(&raw, convert_numeric),
        Err(_) => default.into(),
    }
}

/// Apply the literal-string conversions to a raw environment value.
pub fn coerce_env_value(raw: &str, convert_numeric: bool) -> ConfigValue {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "(true)" => ConfigValue::Bool(true),
        "false" | "(false)" => ConfigValue::Bool(false),
        "null" | "(null)" => ConfigValue::Null,
        "empty" | "(empty)" => ConfigValue::String(String::new()),
        _ => {
            if convert_numeric && let Some(number) = parse_numeric(raw) {
                return number;
            }
            ConfigValue::String(raw.to_string())
        }
    }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn looks_numeric(raw: &str) -> bool {
    raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn parse_numeric(raw: &str) -> Option<ConfigValue> {
    if is_integer(raw)
        && let Ok(integer) = raw.parse::<i64>()
    {
        return Some(ConfigValue::from(integer));
    }
    if !looks_numeric(raw) {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(ConfigValue::Number)
}
