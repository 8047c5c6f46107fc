//! `--format json`: pretty-printed serde output.

use serde::Serialize;

pub struct JsonOutput;

impl JsonOutput {
    /// Format data as pretty-printed JSON.
    pub fn format<T: Serialize + ?Sized>(data: &T) -> String {
        serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
    }
}
