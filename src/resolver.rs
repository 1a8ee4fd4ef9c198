use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::{
    document::BodyNode,
    evaluator::{EvalError, evaluate},
    value::TypedValue,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    #[error("attribute {0} not found")]
    AttributeNotFound(String),

    #[error("failed to read {path}: {source}")]
    Evaluate {
        path: String,
        #[source]
        source: EvalError,
    },
}

/// Collects the evaluated value of every attribute a query matches, keyed
/// by the dot-joined key trail leading to it.
///
/// An entry is written only when its attribute evaluates (or falls back)
/// successfully; a failed attribute leaves the results untouched.
///
/// # Examples
///
/// ```
/// use hcl_read::{Document, ReadHandler, TypedValue};
///
/// let doc = Document::parse("zone = \"us-east1-b\"\n").unwrap();
/// let mut handler = ReadHandler::new(false);
/// handler.handle(&doc.root(), "zone", &["zone".to_string()]).unwrap();
///
/// assert_eq!(handler.results()["zone"], TypedValue::from("us-east1-b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadHandler {
    results: BTreeMap<String, TypedValue>,
    fallback: bool,
}

impl ReadHandler {
    pub fn new(fallback: bool) -> Self {
        ReadHandler {
            results: BTreeMap::new(),
            fallback,
        }
    }

    /// Resolve attribute `name` in `node` and store it under `key_trail`.
    pub fn handle(
        &mut self,
        node: &BodyNode<'_>,
        name: &str,
        key_trail: &[String],
    ) -> Result<(), ReadError> {
        let fragment = node
            .attribute_tokens(name)
            .ok_or_else(|| ReadError::AttributeNotFound(name.to_string()))?;
        let path = key_trail.join(".");

        let value = evaluate(&fragment, name, self.fallback).map_err(|source| ReadError::Evaluate {
            path: path.clone(),
            source,
        })?;

        debug!(%path, kind = value.type_name(), "resolved attribute");
        self.results.insert(path, value);
        Ok(())
    }

    pub fn results(&self) -> &BTreeMap<String, TypedValue> {
        &self.results
    }

    pub fn into_results(self) -> BTreeMap<String, TypedValue> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn trail(path: &str) -> Vec<String> {
        path.split('.').map(String::from).collect()
    }

    #[test]
    fn test_missing_attribute_writes_nothing() {
        let doc = Document::parse("a = 1\n").unwrap();
        let mut handler = ReadHandler::new(true);
        let err = handler.handle(&doc.root(), "b", &trail("b")).unwrap_err();
        assert_eq!(err, ReadError::AttributeNotFound("b".into()));
        assert!(handler.results().is_empty());
    }

    #[test]
    fn test_failed_evaluation_writes_nothing() {
        let doc = Document::parse("a = var.region\n").unwrap();
        let mut handler = ReadHandler::new(false);
        let err = handler.handle(&doc.root(), "a", &trail("a")).unwrap_err();
        assert!(matches!(err, ReadError::Evaluate { ref path, .. } if path == "a"));
        assert!(handler.results().is_empty());
    }

    #[test]
    fn test_fallback_stores_source_text() {
        let doc = Document::parse("a = var.region\n").unwrap();
        let mut handler = ReadHandler::new(true);
        handler.handle(&doc.root(), "a", &trail("x.a")).unwrap();
        assert_eq!(handler.results()["x.a"], TypedValue::from("var.region"));
    }
}
