//! Read values out of HCL configuration files.
//!
//! A read runs in four steps:
//!
//! 1. [`Query::walk`] matches an address query against a parsed [`Document`]
//! 2. [`ReadHandler`] evaluates each matched attribute to a [`TypedValue`]
//! 3. [`convert_results`] turns the typed values into [`GenericValue`]s
//! 4. [`format`] renders them as a template, JSON or YAML
//!
//! ```
//! use hcl_read::{Document, Query, ReadHandler, convert_results, format};
//!
//! let doc = Document::parse("pool \"nodes\" {\n  node_count = 3\n}\n").unwrap();
//! let mut handler = ReadHandler::new(false);
//! Query::parse("pool.nodes.node_count").unwrap().walk(&doc, &mut handler).unwrap();
//!
//! let results = convert_results(handler.into_results());
//! assert_eq!(format(&results, "json").unwrap(), r#"{"pool.nodes.node_count":3}"#);
//! ```

pub mod ast;
pub mod cli;
pub mod converter;
pub mod document;
pub mod evaluator;
pub mod generic;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod query;
pub mod resolver;
pub mod template;
pub mod value;

pub use ast::{BinOp, Expr, Token};
pub use converter::{convert, convert_results};
pub use document::{BodyNode, Document};
pub use evaluator::{EvalContext, EvalError, EvaluationFailure, Evaluator, evaluate};
pub use generic::{GenericValue, Kind, ResultSet, TypedList};
pub use lexer::{LexError, Lexer};
pub use output::{FormatError, OutputFormat, format};
pub use parser::{ParseError, Parser};
pub use query::{Query, QueryError};
pub use resolver::{ReadError, ReadHandler};
pub use value::TypedValue;
