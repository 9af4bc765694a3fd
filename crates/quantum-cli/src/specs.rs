//! Free-form `--key value` specifiers
//!
//! Besides their known options, list, create and update commands accept
//! extra options at the end of the command line, e.g.
//! `net-list --name=test4` or `net-update net1 --name new --tags list=true a b`.
//! They become filters or request body attributes.
//!
//! Grammar: `--key=value`, `--key value`, `--key` (boolean true),
//! `--key v1 v2` or `--key list=true v` (list), and a leading
//! `type=bool|int|dict` value to convert the values.

use quantum_client::Record;
use quantum_core::query::QueryParams;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while parsing free-form specifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecsError {
    #[error("duplicated options {0}")]
    Duplicated(String),

    #[error("invalid values_specs {0}")]
    Invalid(String),

    #[error("unsupported type '{kind}' for option --{key}")]
    UnknownType { key: String, kind: String },

    #[error("invalid {kind} value '{value}' for option --{key}")]
    BadValue {
        key: String,
        kind: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Str,
    Bool,
    Int,
    Dict,
}

impl ValueType {
    fn parse(key: &str, kind: &str) -> Result<Self, SpecsError> {
        match kind {
            "str" | "string" => Ok(Self::Str),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "dict" => Ok(Self::Dict),
            _ => Err(SpecsError::UnknownType {
                key: key.to_string(),
                kind: kind.to_string(),
            }),
        }
    }

    fn convert(self, key: &str, raw: &str) -> Result<Value, SpecsError> {
        let bad = |kind| SpecsError::BadValue {
            key: key.to_string(),
            kind,
            value: raw.to_string(),
        };
        match self {
            Self::Str => Ok(Value::String(raw.to_string())),
            Self::Bool => Ok(Value::Bool(raw.eq_ignore_ascii_case("true"))),
            Self::Int => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| bad("int")),
            Self::Dict => {
                let mut object = Record::new();
                for pair in raw.split(',') {
                    let (k, v) = pair.split_once('=').ok_or_else(|| bad("dict"))?;
                    object.insert(k.to_string(), Value::String(v.to_string()));
                }
                Ok(Value::Object(object))
            }
        }
    }
}

#[derive(Debug)]
struct OptionSpec {
    key: String,
    kind: Option<ValueType>,
    list: bool,
    inline: bool,
    values: Vec<String>,
}

impl OptionSpec {
    fn into_value(self, all: &str) -> Result<(String, Value), SpecsError> {
        let kind = self.kind.unwrap_or(ValueType::Str);
        let value = match (self.values.as_slice(), self.list) {
            ([], true) => return Err(SpecsError::Invalid(all.to_string())),
            ([], false) => Value::Bool(true),
            ([single], false) => kind.convert(&self.key, single)?,
            (values, _) => Value::Array(
                values
                    .iter()
                    .map(|v| kind.convert(&self.key, v))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok((self.key, value))
    }
}

fn is_number(item: &str) -> bool {
    item.parse::<f64>().is_ok()
}

/// Parse free-form specifiers into a JSON object.
///
/// Keys lose their leading `--` and have `-` replaced by `_`.
pub fn parse_args_to_dict(values_specs: &[String]) -> Result<Record, SpecsError> {
    let all = values_specs.join(" ");
    let mut items = values_specs.iter().map(String::as_str).peekable();
    if items.peek() == Some(&"--") {
        items.next();
    }

    let mut options: Vec<OptionSpec> = Vec::new();
    for item in items {
        if let Some(rest) = item.strip_prefix("--") {
            let (name, inline) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            if name.is_empty() {
                return Err(SpecsError::Invalid(all));
            }
            let key = name.replace('-', "_");
            if options.iter().any(|o| o.key == key) {
                return Err(SpecsError::Duplicated(all));
            }
            options.push(OptionSpec {
                key,
                kind: None,
                list: false,
                inline: inline.is_some(),
                values: inline.map(str::to_string).into_iter().collect(),
            });
            continue;
        }

        let Some(current) = options.last_mut() else {
            return Err(SpecsError::Invalid(all));
        };
        if let Some(kind) = item.strip_prefix("type=") {
            if current.kind.is_none() {
                current.kind = Some(ValueType::parse(&current.key, kind)?);
                continue;
            }
        }
        if item == "list=true" {
            current.list = true;
            continue;
        }
        if current.inline || (item.starts_with('-') && !is_number(item)) {
            return Err(SpecsError::Invalid(all));
        }
        current.values.push(item.to_string());
    }

    options
        .into_iter()
        .map(|option| option.into_value(&all))
        .collect()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn parsed specifiers into query pairs; lists repeat their key.
pub fn to_query(dict: &Record) -> QueryParams {
    let mut query = QueryParams::new();
    for (key, value) in dict {
        match value {
            Value::Array(items) => query.push_all(key, items.iter().map(query_value)),
            other => query.push(key.as_str(), query_value(other)),
        }
    }
    query
}
