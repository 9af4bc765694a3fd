//! Output formatting utilities

pub mod json;
pub mod table;

use serde_json::Value;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    /// Pick the format from the global `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Render one attribute value as a table cell.
///
/// Lists print one item per line and nested objects print as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) => item.to_string(),
                other => format_value(other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(format_value(&json!(null)), "");
        assert_eq!(format_value(&json!("abc")), "abc");
        assert_eq!(format_value(&json!(true)), "True");
        assert_eq!(format_value(&json!(false)), "False");
        assert_eq!(format_value(&json!(4)), "4");
    }

    #[test]
    fn lists_are_one_per_line() {
        assert_eq!(format_value(&json!(["a", "b"])), "a\nb");
        assert_eq!(format_value(&json!([])), "");
    }

    #[test]
    fn objects_are_compact_json() {
        assert_eq!(format_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(format_value(&json!([{"a": 1}])), r#"{"a":1}"#);
    }
}
