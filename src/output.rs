//! Output formatting for resolved values.
//!
//! Three formats are supported, selected by a format specifier string:
//!
//! - **`go-template='<TEMPLATE>'`** (the default) - the template runs once per
//!   entry with `.Key` and `.Value` bound; outputs are concatenated
//! - **`json`** - the whole result set as one compact JSON object
//! - **`yaml`** - the whole result set as one YAML mapping
//!
//! Entries are always visited in path order, so output is deterministic.
//!
//! # Examples
//!
//! ```
//! use hcl_read::{format, GenericValue, ResultSet};
//!
//! let mut results = ResultSet::new();
//! results.insert("x.y".to_string(), GenericValue::String("5".to_string()));
//!
//! assert_eq!(format(&results, "go-template='{{.Key}}={{.Value}}'").unwrap(), "x.y=5");
//! assert_eq!(format(&results, "json").unwrap(), r#"{"x.y":"5"}"#);
//! ```

use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;
use tracing::debug;

use crate::{
    generic::{GenericValue, ResultSet, TypedList},
    template::{Entry, ExecError, Template, TemplateError},
};

/// Format used when none is given on the command line.
pub const DEFAULT_OUTPUT_FORMAT: &str = "go-template='{{.Value}}'";

const TEMPLATE_PREFIX: &str = "go-template";

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("go-template should be passed as go-template='<TEMPLATE>'")]
    FormatSpec,

    #[error(transparent)]
    TemplateSyntax(#[from] TemplateError),

    #[error(transparent)]
    TemplateExecution(#[from] ExecError),

    #[error("invalid output-format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A parsed output format specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Template(Template),
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        if spec.starts_with(TEMPLATE_PREFIX) {
            let (_, body) = spec.split_once('=').ok_or(FormatError::FormatSpec)?;
            let body = strip_single_quotes(body);
            return Ok(OutputFormat::Template(Template::parse(body)?));
        }

        match spec {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(FormatError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn render(&self, results: &ResultSet) -> Result<String, FormatError> {
        match self {
            OutputFormat::Template(template) => render_template(template, results),
            OutputFormat::Json => to_json(results),
            OutputFormat::Yaml => to_yaml(results),
        }
    }
}

/// Format `results` according to `spec`.
pub fn format(results: &ResultSet, spec: &str) -> Result<String, FormatError> {
    OutputFormat::parse(spec)?.render(results)
}

fn strip_single_quotes(body: &str) -> &str {
    body.strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
        .unwrap_or(body)
}

fn render_template(template: &Template, results: &ResultSet) -> Result<String, FormatError> {
    let mut out = String::new();
    for (key, value) in results {
        let value = value.to_string();
        out.push_str(&template.render(&Entry { key, value: &value })?);
    }
    Ok(out)
}

/// Compact JSON encoding of the whole result set.
pub fn to_json(results: &ResultSet) -> Result<String, FormatError> {
    Ok(serde_json::to_string(&results_to_json(results))?)
}

/// YAML encoding of the whole result set, after recovering lists that
/// arrived as their bracketed text rendering.
pub fn to_yaml(results: &ResultSet) -> Result<String, FormatError> {
    let recovered = recover_stringified_lists(results);
    Ok(serde_yaml::to_string(&results_to_json(&recovered))?)
}

/// Compatibility shim: a top-level string value shaped like `[a b c]` is
/// turned back into a list of strings split on whitespace; `[]` becomes an
/// empty list. Structured lists never need this.
pub fn recover_stringified_lists(results: &ResultSet) -> ResultSet {
    results
        .iter()
        .map(|(key, value)| {
            let value = match value {
                GenericValue::String(s) if s.starts_with('[') && s.ends_with(']') && s.len() >= 2 => {
                    debug!(path = %key, "recovering list from bracketed string");
                    let inner = &s[1..s.len() - 1];
                    GenericValue::List(
                        inner
                            .split_whitespace()
                            .map(|item| GenericValue::String(item.to_string()))
                            .collect(),
                    )
                }
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn results_to_json(results: &ResultSet) -> JsonValue {
    JsonValue::Object(
        results
            .iter()
            .map(|(key, value)| (key.clone(), to_json_value(value)))
            .collect::<Map<_, _>>(),
    )
}

/// Map a generic value onto serde's data model. Homogeneous scalar lists are
/// encoded from their typed view; mixed and nested lists element by element.
pub fn to_json_value(value: &GenericValue) -> JsonValue {
    match value {
        GenericValue::Null => JsonValue::Null,
        GenericValue::Boolean(b) => JsonValue::Bool(*b),
        GenericValue::Number(n) => number_to_json(*n),
        GenericValue::String(s) => JsonValue::String(s.clone()),
        GenericValue::List(items) => match value.as_typed_list() {
            Some(TypedList::Booleans(flags)) => JsonValue::from(flags),
            Some(TypedList::Numbers(numbers)) => {
                JsonValue::Array(numbers.into_iter().map(number_to_json).collect())
            }
            Some(TypedList::Strings(strings)) => JsonValue::from(strings),
            None => JsonValue::Array(items.iter().map(to_json_value).collect()),
        },
        GenericValue::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json_value(value)))
                .collect(),
        ),
    }
}

/// Integral numbers that fit exactly are emitted without a fractional part.
fn number_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        JsonValue::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(key: &str, value: GenericValue) -> ResultSet {
        let mut results = ResultSet::new();
        results.insert(key.to_string(), value);
        results
    }

    #[test]
    fn test_template_quotes_are_optional() {
        let results = single("a", GenericValue::Boolean(true));
        assert_eq!(format(&results, "go-template={{.Value}}").unwrap(), "true");
    }

    #[test]
    fn test_template_without_separator() {
        let results = single("a", GenericValue::Null);
        assert!(matches!(
            format(&results, "go-template"),
            Err(FormatError::FormatSpec)
        ));
    }

    #[test]
    fn test_json_integral_numbers() {
        let results = single("n", GenericValue::Number(3.0));
        assert_eq!(format(&results, "json").unwrap(), r#"{"n":3}"#);
    }

    #[test]
    fn test_typed_and_mixed_lists_encode_alike() {
        let numbers = GenericValue::List(vec![GenericValue::Number(1.0), GenericValue::Number(2.5)]);
        assert_eq!(to_json_value(&numbers), serde_json::json!([1, 2.5]));

        let mixed = GenericValue::List(vec![
            GenericValue::String("a".into()),
            GenericValue::Number(1.0),
            GenericValue::Null,
        ]);
        assert_eq!(to_json_value(&mixed), serde_json::json!(["a", 1, null]));
    }

    #[test]
    fn test_recover_only_bracketed_strings() {
        let mut results = single("list", GenericValue::String("[a b]".into()));
        results.insert("plain".into(), GenericValue::String("[a".into()));
        let recovered = recover_stringified_lists(&results);
        assert_eq!(
            recovered["list"],
            GenericValue::List(vec![
                GenericValue::String("a".into()),
                GenericValue::String("b".into()),
            ])
        );
        assert_eq!(recovered["plain"], GenericValue::String("[a".into()));
    }
}
