use crate::ast::{Expr, Span};

/// A body: the attributes and nested blocks of a file or of a block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub structures: Vec<Structure>,
}

/// A single body entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    Attribute(Attribute),
    Block(Block),
}

/// Attribute definition
///
/// # Example
/// ```text
/// machine_type = "n1-standard-4"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub expr: Expr,
    /// Location of the value expression alone
    pub expr_span: Span,
}

/// Block
///
/// # Example
/// ```text
/// resource "google_container_node_pool" "nodes" {
///   node_count = 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: Body,
}

impl Body {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|attr| attr.name == name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.structures.iter().filter_map(|s| match s {
            Structure::Attribute(attr) => Some(attr),
            Structure::Block(_) => None,
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.structures.iter().filter_map(|s| match s {
            Structure::Block(block) => Some(block),
            Structure::Attribute(_) => None,
        })
    }
}
