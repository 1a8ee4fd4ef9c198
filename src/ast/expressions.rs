use rust_decimal::Decimal;

use crate::ast::{BinOp, Span, UnaryOp};

/// Abstract Syntax Tree node representing a parsed HCL expression.
///
/// Expressions are evaluated without any external variables or functions,
/// so references and calls parse fine but fail at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Null literal
    Null,

    /// Boolean literal
    Boolean(bool),

    /// Numeric literal
    ///
    /// # Example
    /// ```text
    /// 42
    /// 0.25
    /// ```
    Number(Decimal),

    /// Numeric literal outside the range of [`Decimal`], kept as written
    ///
    /// # Example
    /// ```text
    /// 1e30
    /// ```
    RawNumber(String),

    /// Quoted string or heredoc, split into literal text and interpolations.
    ///
    /// # Example
    /// ```text
    /// "plain"
    /// "${name}-suffix"
    /// ```
    Template(Vec<TemplatePart>),

    // References
    /// Variable reference
    ///
    /// # Example
    /// ```text
    /// var.region
    /// ```
    Variable(String),

    /// Function call
    ///
    /// `expand_final` is set when the last argument is followed by `...`.
    ///
    /// # Example
    /// ```text
    /// lookup(local.map, "key")
    /// ```
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        expand_final: bool,
    },

    // Access
    /// Attribute access (`object.name`)
    GetAttr { object: Box<Expr>, name: String },

    /// Index access (`object[key]`, and the legacy `object.0` form)
    Index { object: Box<Expr>, key: Box<Expr> },

    /// Splat (`list[*].name` or `list.*.name`)
    ///
    /// `each` is the traversal applied to every element.
    Splat {
        source: Box<Expr>,
        each: Vec<Traversal>,
    },

    // Operations
    /// Unary operation
    UnaryOp { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Conditional (`condition ? true_result : false_result`)
    Conditional {
        condition: Box<Expr>,
        true_result: Box<Expr>,
        false_result: Box<Expr>,
    },

    /// `for` expression producing a tuple or an object
    For(Box<ForExpr>),

    /// Parenthesized expression
    Parens(Box<Expr>),

    // Collection constructors
    /// Tuple constructor
    ///
    /// # Example
    /// ```text
    /// ["a", "b", 3]
    /// ```
    Tuple(Vec<Expr>),

    /// Object constructor
    ///
    /// # Example
    /// ```text
    /// { name = "x", "quoted-key" = 1, (computed) = true }
    /// ```
    Object(Vec<ObjectItem>),
}

/// One piece of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text with escapes already resolved
    Literal(String),
    /// `${...}` interpolation
    Interpolation(Expr),
    /// `%{ if cond }...%{ else }...%{ endif }` directive
    If {
        condition: Expr,
        then_parts: Vec<TemplatePart>,
        else_parts: Vec<TemplatePart>,
    },
    /// `%{ for k, v in coll }...%{ endfor }` directive; the body is rendered
    /// once per element and the results concatenated
    For {
        key_var: Option<String>,
        value_var: String,
        collection: Expr,
        body: Vec<TemplatePart>,
    },
}

/// One step of a splat traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Traversal {
    Attr(String),
    Index(Expr),
}

/// Key of an object constructor item.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKey {
    /// Bare identifier key, taken literally (`name = ...`)
    Ident(String),
    /// Any other key expression, evaluated to a string
    Expr(Expr),
}

/// One `key = value` (or `key: value`) item of an object constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectItem {
    pub key: ObjectKey,
    pub value: Expr,
    /// Location of the value expression in the source it was parsed from
    pub value_span: Span,
}

impl ObjectItem {
    /// The key as a static name, if it can be known without evaluation.
    ///
    /// Bare identifiers and quoted keys without interpolation qualify.
    pub fn key_name(&self) -> Option<&str> {
        match &self.key {
            ObjectKey::Ident(name) => Some(name),
            ObjectKey::Expr(Expr::Template(parts)) => match parts.as_slice() {
                [TemplatePart::Literal(text)] => Some(text),
                [] => Some(""),
                _ => None,
            },
            ObjectKey::Expr(_) => None,
        }
    }
}

/// `for` expression.
///
/// # Examples
/// ```text
/// [for s in ["a", "b"] : upper(s)]
/// {for k, v in { a = 1 } : k => v if v > 0}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpr {
    pub key_var: Option<String>,
    pub value_var: String,
    pub collection: Expr,
    /// Present only for object-producing `for` expressions
    pub key_expr: Option<Expr>,
    pub value_expr: Expr,
    pub condition: Option<Expr>,
    /// Values with equal keys are collected into lists (`...`)
    pub group: bool,
}
