//! JSON output formatting

use serde::Serialize;

/// Render a value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
