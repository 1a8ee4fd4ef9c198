//! Parsed configuration documents and the body views that attributes are
//! resolved against.
//!
//! An attribute can live in two kinds of body: a file or block body, or the
//! object literal assigned to some attribute. [`BodyNode`] covers both so the
//! resolver and the query walk treat them the same way.

use crate::{
    ast::{Body, Expr, ObjectItem},
    lexer::Lexer,
    parser::{ParseError, Parser},
};

/// A configuration file parsed into a [`Body`], with its source kept for
/// slicing expressions back out.
///
/// # Examples
///
/// ```
/// use hcl_read::Document;
///
/// let doc = Document::parse("region = \"us-east1\"\n").unwrap();
/// assert_eq!(
///     doc.root().attribute_tokens("region").as_deref(),
///     Some("region = \"us-east1\"\n")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    body: Body,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let body = Parser::new(Lexer::new(&source))?.parse_config()?;
        Ok(Document { source, body })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn root(&self) -> BodyNode<'_> {
        BodyNode::Body(BodyRef {
            body: &self.body,
            source: &self.source,
        })
    }
}

/// A file or block body.
#[derive(Debug, Clone, Copy)]
pub struct BodyRef<'a> {
    pub body: &'a Body,
    pub source: &'a str,
}

/// The items of an object literal `{ k = v, ... }`.
#[derive(Debug, Clone, Copy)]
pub struct ObjectLiteral<'a> {
    pub items: &'a [ObjectItem],
    pub source: &'a str,
}

/// Either body representation an attribute can be resolved in.
#[derive(Debug, Clone, Copy)]
pub enum BodyNode<'a> {
    Body(BodyRef<'a>),
    Object(ObjectLiteral<'a>),
}

impl<'a> BodyNode<'a> {
    /// Source text of the value expression of `name`, if present.
    pub fn expression_source(&self, name: &str) -> Option<&'a str> {
        match self {
            BodyNode::Body(b) => b
                .body
                .attribute(name)
                .map(|attr| attr.expr_span.slice(b.source)),
            BodyNode::Object(o) => o
                .items
                .iter()
                .find(|item| item.key_name() == Some(name))
                .map(|item| item.value_span.slice(o.source)),
        }
    }

    /// The attribute re-serialized as a standalone fragment `name = expr`,
    /// ready to be parsed and evaluated on its own.
    pub fn attribute_tokens(&self, name: &str) -> Option<String> {
        self.expression_source(name)
            .map(|expr| format!("{} = {}\n", name, expr))
    }

    /// The object literal assigned to `name`, as a body of its own.
    pub fn nested_object(&self, name: &str) -> Option<BodyNode<'a>> {
        let (expr, source) = match self {
            BodyNode::Body(b) => (&b.body.attribute(name)?.expr, b.source),
            BodyNode::Object(o) => (
                &o.items.iter().find(|item| item.key_name() == Some(name))?.value,
                o.source,
            ),
        };
        match expr {
            Expr::Object(items) => Some(BodyNode::Object(ObjectLiteral { items, source })),
            _ => None,
        }
    }

    /// Names of every attribute directly in this body, in source order.
    pub fn attribute_names(&self) -> Vec<&'a str> {
        match self {
            BodyNode::Body(b) => b.body.attributes().map(|attr| attr.name.as_str()).collect(),
            BodyNode::Object(o) => o.items.iter().filter_map(ObjectItem::key_name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
pool "nodes" {
  node_count = 3
  labels = {
    env  = "prod"
    tier = upper("web")
  }
}
"#;

    #[test]
    fn test_object_literal_attribute_tokens() {
        let doc = Document::parse(SOURCE).unwrap();
        let block = doc.body().blocks().next().unwrap();
        let node = BodyNode::Body(BodyRef {
            body: &block.body,
            source: doc.source(),
        });
        let labels = node.nested_object("labels").unwrap();

        assert_eq!(labels.attribute_names(), vec!["env", "tier"]);
        assert_eq!(
            labels.attribute_tokens("tier").as_deref(),
            Some("tier = upper(\"web\")\n")
        );
        assert!(labels.attribute_tokens("missing").is_none());
    }

    #[test]
    fn test_non_object_has_no_nested_body() {
        let doc = Document::parse("count = 3\n").unwrap();
        assert!(doc.root().nested_object("count").is_none());
    }
}
