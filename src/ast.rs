//! # HCL native syntax - Abstract Syntax Tree
//!
//! This module defines the syntax tree produced by [`crate::parser::Parser`]
//! for HCL configuration files and for the single-attribute fragments that
//! [`crate::evaluator::evaluate`] re-parses.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens and their byte spans
//! - **[expressions]** - Expression nodes (literals, templates, access, operations, constructors)
//! - **[operators]** - Unary and binary operators
//! - **[body]** - Bodies, attributes and blocks
//!
//! ## Structure
//!
//! A file is a body. A body holds attributes and blocks; blocks carry a type,
//! zero or more labels, and a nested body:
//!
//! ```text
//! resource "google_container_node_pool" "nodes" {
//!   node_config {
//!     machine_type = "n1-standard-4"
//!     labels       = { team = "infra", tier = 2 }
//!   }
//! }
//! ```
//!
//! Every attribute remembers the byte span of its value expression so the
//! exact source text can be recovered when evaluation is not possible.
pub mod body;
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use body::{Attribute, Block, Body, Structure};
pub use expressions::{Expr, ForExpr, ObjectItem, ObjectKey, TemplatePart, Traversal};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Span, Token};
