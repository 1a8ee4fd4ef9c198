//! Dotted address queries and the document walk that resolves them.
//!
//! A query like `resource.google_container_node_pool.*.node_count` is split
//! on `.`. Each segment is matched, in order, against block types, block
//! labels, attribute names and object-literal keys. A `*` inside a segment
//! matches any run of characters.

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::{
    ast::Block,
    document::{BodyNode, BodyRef, Document},
    resolver::{ReadError, ReadHandler},
};

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("query segment {0} is empty")]
    EmptySegment(usize),

    #[error("invalid pattern in query segment {segment:?}: {source}")]
    InvalidPattern {
        segment: String,
        #[source]
        source: regex::Error,
    },
}

/// One `.`-separated part of a query.
#[derive(Debug, Clone)]
pub enum Segment {
    Name(String),
    /// A segment containing `*`, compiled to an anchored regex
    Pattern(Regex),
}

impl Segment {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Segment::Name(expected) => expected == name,
            Segment::Pattern(re) => re.is_match(name),
        }
    }
}

/// A parsed address query.
///
/// # Examples
///
/// ```
/// use hcl_read::{Document, Query, ReadHandler};
///
/// let doc = Document::parse("pool \"a\" {\n  size = 1\n}\npool \"b\" {\n  size = 2\n}\n").unwrap();
/// let mut handler = ReadHandler::new(false);
/// Query::parse("pool.*.size").unwrap().walk(&doc, &mut handler).unwrap();
///
/// let paths: Vec<_> = handler.results().keys().cloned().collect();
/// assert_eq!(paths, vec!["pool.a.size", "pool.b.size"]);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    segments: Vec<Segment>,
}

impl Query {
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        if query.is_empty() {
            return Err(QueryError::Empty);
        }

        let segments = query
            .split('.')
            .enumerate()
            .map(|(index, segment)| parse_segment(index, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Query { segments })
    }

    /// Call `handler` for every attribute in `doc` the query addresses.
    ///
    /// Stops at the first resolution error. Matching nothing is not an error.
    pub fn walk(&self, doc: &Document, handler: &mut ReadHandler) -> Result<(), ReadError> {
        let mut trail = vec![];
        walk_body(doc.root(), &self.segments, &mut trail, handler)
    }
}

fn parse_segment(index: usize, segment: &str) -> Result<Segment, QueryError> {
    if segment.is_empty() {
        return Err(QueryError::EmptySegment(index));
    }
    if !segment.contains('*') {
        return Ok(Segment::Name(segment.to_string()));
    }

    let pattern = segment
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", pattern))
        .map(Segment::Pattern)
        .map_err(|source| QueryError::InvalidPattern {
            segment: segment.to_string(),
            source,
        })
}

fn walk_body(
    node: BodyNode<'_>,
    segments: &[Segment],
    trail: &mut Vec<String>,
    handler: &mut ReadHandler,
) -> Result<(), ReadError> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(());
    };

    for name in node.attribute_names() {
        if !first.matches(name) {
            continue;
        }
        trail.push(name.to_string());
        if rest.is_empty() {
            handler.handle(&node, name, trail)?;
        } else if let Some(object) = node.nested_object(name) {
            walk_body(object, rest, trail, handler)?;
        }
        trail.pop();
    }

    if let BodyNode::Body(body) = node {
        for block in body.body.blocks() {
            if !first.matches(&block.block_type) {
                continue;
            }
            trace!(block_type = %block.block_type, "descending into block");
            trail.push(block.block_type.clone());
            walk_labels(block, body.source, 0, rest, trail, handler)?;
            trail.pop();
        }
    }

    Ok(())
}

/// Match the labels of `block` one segment each, then continue in its body.
fn walk_labels(
    block: &Block,
    source: &str,
    label: usize,
    segments: &[Segment],
    trail: &mut Vec<String>,
    handler: &mut ReadHandler,
) -> Result<(), ReadError> {
    let Some(name) = block.labels.get(label) else {
        let body = BodyNode::Body(BodyRef {
            body: &block.body,
            source,
        });
        return walk_body(body, segments, trail, handler);
    };

    match segments.split_first() {
        Some((first, rest)) if first.matches(name) => {
            trail.push(name.clone());
            let result = walk_labels(block, source, label + 1, rest, trail, handler);
            trail.pop();
            result
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedValue;
    use rust_decimal::Decimal;

    const SOURCE: &str = r#"
resource "google_container_node_pool" "nodes" {
  node_count = 3
  node_config {
    machine_type = "n1-standard-4"
    labels = {
      env = "prod"
    }
  }
}
"#;

    fn read(query: &str) -> Vec<(String, TypedValue)> {
        let doc = Document::parse(SOURCE).unwrap();
        let mut handler = ReadHandler::new(false);
        Query::parse(query).unwrap().walk(&doc, &mut handler).unwrap();
        handler.into_results().into_iter().collect()
    }

    #[test]
    fn test_block_labels_are_segments() {
        assert_eq!(
            read("resource.google_container_node_pool.nodes.node_count"),
            vec![(
                "resource.google_container_node_pool.nodes.node_count".to_string(),
                TypedValue::Number(Decimal::from(3)),
            )]
        );
    }

    #[test]
    fn test_descends_into_object_literals() {
        assert_eq!(
            read("resource.*.*.node_config.labels.env"),
            vec![(
                "resource.google_container_node_pool.nodes.node_config.labels.env".to_string(),
                TypedValue::from("prod"),
            )]
        );
    }

    #[test]
    fn test_unmatched_query_is_empty() {
        assert!(read("resource.missing").is_empty());
        assert!(read("resource.google_container_node_pool").is_empty());
    }

    #[test]
    fn test_empty_segment() {
        assert!(matches!(Query::parse("a..b"), Err(QueryError::EmptySegment(1))));
    }
}
