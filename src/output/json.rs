//! JSON renderer for machine consumption.

use serde::Serialize;

/// Serialize any report shape as pretty-printed JSON.
pub fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
