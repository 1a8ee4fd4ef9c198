use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{BinOp, Expr, ForExpr, ObjectKey, TemplatePart, Traversal, UnaryOp},
    lexer::Lexer,
    parser::{ParseError, Parser},
    value::TypedValue,
};

/// Local variables visible while evaluating an expression.
///
/// Evaluation never sees variables or functions from outside the expression;
/// the only names in scope are iteration variables of enclosing `for`
/// expressions.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub locals: HashMap<String, TypedValue>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new context with one more local variable
    pub fn with_local(&self, name: &str, value: TypedValue) -> Self {
        let mut locals = self.locals.clone();
        locals.insert(name.to_string(), value);
        EvalContext { locals }
    }
}

/// Reasons a syntactically valid expression cannot produce a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationFailure {
    /// Reference to a variable that is not in scope
    #[error("Unknown variable: there is no variable named \"{0}\"")]
    UnknownVariable(String),

    /// Function calls need an evaluation context, which is never provided
    #[error("Function calls not allowed: cannot call \"{0}\" here")]
    FunctionCall(String),

    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Missing attribute, missing key or out-of-range index
    #[error("Access error: {0}")]
    AccessError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Numeric overflow in {0}")]
    Overflow(&'static str),

    /// Arithmetic on a literal that only exists as its source text
    #[error("Number {0} is outside the supported range for {1}")]
    NumberOutOfRange(String, String),

    /// Two iterations of an object `for` expression produced the same key
    #[error("Duplicate object key \"{0}\"")]
    DuplicateKey(String),
}

/// Errors returned by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The fragment is not valid syntax. Never masked by fallback.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("attribute {0} not found")]
    AttributeNotFound(String),

    /// The expression parsed but could not be evaluated
    #[error("failed to evaluate attribute {name}: {failure}")]
    Evaluation {
        name: String,
        #[source]
        failure: EvaluationFailure,
    },
}

/// Parse `source` as a standalone fragment, find the attribute `name` in it
/// and evaluate its expression without any variables or functions.
///
/// With `fallback` set, an expression that parses but fails to evaluate
/// yields its exact source text as a string instead of an error. Syntax
/// errors are always returned.
///
/// # Examples
///
/// ```
/// use hcl_read::{evaluate, TypedValue};
///
/// let value = evaluate("x = undefined_function()\n", "x", true).unwrap();
/// assert_eq!(value, TypedValue::String("undefined_function()".to_string()));
///
/// assert!(evaluate("x = undefined_function()\n", "x", false).is_err());
/// assert!(evaluate("foo = (", "foo", true).is_err());
/// ```
pub fn evaluate(source: &str, name: &str, fallback: bool) -> Result<TypedValue, EvalError> {
    let body = Parser::new(Lexer::new(source))?.parse_config()?;
    let attr = body
        .attribute(name)
        .ok_or_else(|| EvalError::AttributeNotFound(name.to_string()))?;

    match Evaluator::new().eval_expression(&attr.expr) {
        Ok(value) => Ok(value),
        Err(failure) if fallback => {
            debug!(attribute = name, %failure, "evaluation failed, falling back to raw source");
            Ok(TypedValue::String(attr.expr_span.slice(source).to_string()))
        }
        Err(failure) => Err(EvalError::Evaluation {
            name: name.to_string(),
            failure,
        }),
    }
}

/// Context-free expression evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    /// Evaluates an expression with no variables in scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use hcl_read::{Evaluator, Lexer, Parser, TypedValue};
    ///
    /// let expr = Parser::new(Lexer::new("\"v${1 + 1}\"")).unwrap().parse().unwrap();
    /// let value = Evaluator::new().eval_expression(&expr).unwrap();
    /// assert_eq!(value, TypedValue::String("v2".to_string()));
    /// ```
    pub fn eval_expression(&self, expr: &Expr) -> Result<TypedValue, EvaluationFailure> {
        self.eval_expr(expr, &EvalContext::new())
    }

    pub fn eval_expr(
        &self,
        expr: &Expr,
        context: &EvalContext,
    ) -> Result<TypedValue, EvaluationFailure> {
        match expr {
            Expr::Null => Ok(TypedValue::Null),
            Expr::Boolean(b) => Ok(TypedValue::Bool(*b)),
            Expr::Number(n) => Ok(TypedValue::Number(*n)),
            Expr::RawNumber(text) => Ok(TypedValue::RawNumber(text.clone())),
            Expr::Template(parts) => self.eval_template(parts, context),
            Expr::Variable(name) => context
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| EvaluationFailure::UnknownVariable(name.clone())),
            Expr::FunctionCall { name, .. } => Err(EvaluationFailure::FunctionCall(name.clone())),
            Expr::GetAttr { object, name } => {
                let object = self.eval_expr(object, context)?;
                get_attr(&object, name)
            }
            Expr::Index { object, key } => {
                let object = self.eval_expr(object, context)?;
                let key = self.eval_expr(key, context)?;
                index(&object, &key)
            }
            Expr::Splat { source, each } => self.eval_splat(source, each, context),
            Expr::UnaryOp { op, operand } => {
                let operand = self.eval_expr(operand, context)?;
                self.apply_unary(*op, &operand)
            }
            Expr::BinaryOp { op, left, right } => {
                let left_val = self.eval_expr(left, context)?;
                let right_val = self.eval_expr(right, context)?;
                self.apply_binop(*op, &left_val, &right_val)
            }
            Expr::Conditional {
                condition,
                true_result,
                false_result,
            } => {
                let condition = self.eval_expr(condition, context)?;
                if !condition.is_known() {
                    return Ok(TypedValue::Unknown);
                }
                if to_bool(&condition, "condition")? {
                    self.eval_expr(true_result, context)
                } else {
                    self.eval_expr(false_result, context)
                }
            }
            Expr::For(for_expr) => self.eval_for(for_expr, context),
            Expr::Parens(inner) => self.eval_expr(inner, context),
            Expr::Tuple(exprs) => {
                let mut items = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    items.push(self.eval_expr(expr, context)?);
                }
                Ok(TypedValue::List(items))
            }
            Expr::Object(items) => {
                let mut map = BTreeMap::new();
                for item in items {
                    let key = match &item.key {
                        ObjectKey::Ident(name) => name.clone(),
                        ObjectKey::Expr(expr) => {
                            to_string_value(&self.eval_expr(expr, context)?, "object key")?
                        }
                    };
                    let value = self.eval_expr(&item.value, context)?;
                    map.insert(key, value);
                }
                Ok(TypedValue::Object(map))
            }
        }
    }

    fn eval_template(
        &self,
        parts: &[TemplatePart],
        context: &EvalContext,
    ) -> Result<TypedValue, EvaluationFailure> {
        // A lone interpolation yields the interpolated value unchanged
        if let [TemplatePart::Interpolation(expr)] = parts {
            return self.eval_expr(expr, context);
        }

        let mut out = String::new();
        if self.render_parts(parts, context, &mut out)? {
            Ok(TypedValue::String(out))
        } else {
            Ok(TypedValue::Unknown)
        }
    }

    /// Append the rendering of `parts` to `out`. Returns `false` as soon as
    /// an unknown value makes the result unknown.
    fn render_parts(
        &self,
        parts: &[TemplatePart],
        context: &EvalContext,
        out: &mut String,
    ) -> Result<bool, EvaluationFailure> {
        for part in parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Interpolation(expr) => {
                    let value = self.eval_expr(expr, context)?;
                    if !value.is_known() {
                        return Ok(false);
                    }
                    out.push_str(&to_string_value(&value, "template interpolation")?);
                }
                TemplatePart::If {
                    condition,
                    then_parts,
                    else_parts,
                } => {
                    let condition = self.eval_expr(condition, context)?;
                    if !condition.is_known() {
                        return Ok(false);
                    }
                    let branch = if to_bool(&condition, "template if")? {
                        then_parts
                    } else {
                        else_parts
                    };
                    if !self.render_parts(branch, context, out)? {
                        return Ok(false);
                    }
                }
                TemplatePart::For {
                    key_var,
                    value_var,
                    collection,
                    body,
                } => {
                    let collection = self.eval_expr(collection, context)?;
                    let Some(pairs) = iteration_pairs(collection, "template for")? else {
                        return Ok(false);
                    };
                    for (key, value) in pairs {
                        let mut scope = context.with_local(value_var, value);
                        if let Some(key_var) = key_var {
                            scope = scope.with_local(key_var, key);
                        }
                        if !self.render_parts(body, &scope, out)? {
                            return Ok(false);
                        }
                    }
                }
            }
        }
        Ok(true)
    }

    fn eval_splat(
        &self,
        source: &Expr,
        each: &[Traversal],
        context: &EvalContext,
    ) -> Result<TypedValue, EvaluationFailure> {
        let items = match self.eval_expr(source, context)? {
            TypedValue::Null => return Ok(TypedValue::List(vec![])),
            TypedValue::Unknown => return Ok(TypedValue::Unknown),
            TypedValue::List(items) => items,
            // A single value splats as a one-element list
            other => vec![other],
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let mut current = item;
            for step in each {
                current = match step {
                    Traversal::Attr(name) => get_attr(&current, name)?,
                    Traversal::Index(key) => {
                        let key = self.eval_expr(key, context)?;
                        index(&current, &key)?
                    }
                };
            }
            out.push(current);
        }
        Ok(TypedValue::List(out))
    }

    fn eval_for(
        &self,
        for_expr: &ForExpr,
        context: &EvalContext,
    ) -> Result<TypedValue, EvaluationFailure> {
        let collection = self.eval_expr(&for_expr.collection, context)?;
        let Some(pairs) = iteration_pairs(collection, "for expression")? else {
            return Ok(TypedValue::Unknown);
        };

        let mut tuple = vec![];
        let mut object = BTreeMap::new();
        let mut groups: BTreeMap<String, Vec<TypedValue>> = BTreeMap::new();

        for (key, value) in pairs {
            let mut scope = context.with_local(&for_expr.value_var, value);
            if let Some(key_var) = &for_expr.key_var {
                scope = scope.with_local(key_var, key);
            }

            if let Some(condition) = &for_expr.condition {
                let keep = self.eval_expr(condition, &scope)?;
                if !to_bool(&keep, "for condition")? {
                    continue;
                }
            }

            let value = self.eval_expr(&for_expr.value_expr, &scope)?;
            match &for_expr.key_expr {
                None => tuple.push(value),
                Some(key_expr) => {
                    let key = to_string_value(&self.eval_expr(key_expr, &scope)?, "object key")?;
                    if for_expr.group {
                        groups.entry(key).or_default().push(value);
                    } else if object.contains_key(&key) {
                        return Err(EvaluationFailure::DuplicateKey(key));
                    } else {
                        object.insert(key, value);
                    }
                }
            }
        }

        Ok(match (&for_expr.key_expr, for_expr.group) {
            (None, _) => TypedValue::List(tuple),
            (Some(_), true) => TypedValue::Object(
                groups
                    .into_iter()
                    .map(|(k, vs)| (k, TypedValue::List(vs)))
                    .collect(),
            ),
            (Some(_), false) => TypedValue::Object(object),
        })
    }

    fn apply_unary(
        &self,
        op: UnaryOp,
        operand: &TypedValue,
    ) -> Result<TypedValue, EvaluationFailure> {
        if !operand.is_known() {
            return Ok(TypedValue::Unknown);
        }
        match (op, operand) {
            (UnaryOp::Negate, TypedValue::RawNumber(text)) => Ok(TypedValue::RawNumber(
                match text.strip_prefix('-') {
                    Some(positive) => positive.to_string(),
                    None => format!("-{}", text),
                },
            )),
            (UnaryOp::Negate, _) => Ok(TypedValue::Number(-to_number(operand, "negation")?)),
            (UnaryOp::Not, _) => Ok(TypedValue::Bool(!to_bool(operand, "logical not")?)),
        }
    }

    fn apply_binop(
        &self,
        op: BinOp,
        left: &TypedValue,
        right: &TypedValue,
    ) -> Result<TypedValue, EvaluationFailure> {
        if !left.is_known() || !right.is_known() {
            return Ok(TypedValue::Unknown);
        }

        match op {
            BinOp::Equal => Ok(TypedValue::Bool(left == right)),
            BinOp::NotEqual => Ok(TypedValue::Bool(left != right)),
            BinOp::And => Ok(TypedValue::Bool(
                to_bool(left, "&&")? && to_bool(right, "&&")?,
            )),
            BinOp::Or => Ok(TypedValue::Bool(
                to_bool(left, "||")? || to_bool(right, "||")?,
            )),
            BinOp::LessThan => compare(left, right, "<", |a, b| a < b),
            BinOp::GreaterThan => compare(left, right, ">", |a, b| a > b),
            BinOp::LessEqual => compare(left, right, "<=", |a, b| a <= b),
            BinOp::GreaterEqual => compare(left, right, ">=", |a, b| a >= b),
            BinOp::Add => {
                let (a, b) = (to_number(left, "+")?, to_number(right, "+")?);
                checked(a.checked_add(b), "addition")
            }
            BinOp::Subtract => {
                let (a, b) = (to_number(left, "-")?, to_number(right, "-")?);
                checked(a.checked_sub(b), "subtraction")
            }
            BinOp::Multiply => {
                let (a, b) = (to_number(left, "*")?, to_number(right, "*")?);
                checked(a.checked_mul(b), "multiplication")
            }
            BinOp::Divide => {
                let (a, b) = (to_number(left, "/")?, to_number(right, "/")?);
                if b.is_zero() {
                    return Err(EvaluationFailure::DivisionByZero);
                }
                checked(a.checked_div(b), "division")
            }
            BinOp::Modulo => {
                let (a, b) = (to_number(left, "%")?, to_number(right, "%")?);
                if b.is_zero() {
                    return Err(EvaluationFailure::DivisionByZero);
                }
                checked(a.checked_rem(b), "modulo")
            }
        }
    }
}

/// Key/value pairs visited by `for`: list indices or map keys with their
/// elements. `None` when the collection is unknown.
fn iteration_pairs(
    collection: TypedValue,
    operation: &str,
) -> Result<Option<Vec<(TypedValue, TypedValue)>>, EvaluationFailure> {
    match collection {
        TypedValue::List(items) => Ok(Some(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (TypedValue::Number(Decimal::from(i as u64)), v))
                .collect(),
        )),
        TypedValue::Map(map) | TypedValue::Object(map) => Ok(Some(
            map.into_iter()
                .map(|(k, v)| (TypedValue::String(k), v))
                .collect(),
        )),
        TypedValue::Unknown => Ok(None),
        other => Err(EvaluationFailure::TypeError(format!(
            "A {} cannot iterate over {}",
            operation,
            other.type_name()
        ))),
    }
}

fn checked(result: Option<Decimal>, operation: &'static str) -> Result<TypedValue, EvaluationFailure> {
    result
        .map(|n| TypedValue::Number(n.normalize()))
        .ok_or(EvaluationFailure::Overflow(operation))
}

fn compare(
    left: &TypedValue,
    right: &TypedValue,
    symbol: &str,
    cmp: fn(Decimal, Decimal) -> bool,
) -> Result<TypedValue, EvaluationFailure> {
    let a = to_number(left, symbol)?;
    let b = to_number(right, symbol)?;
    Ok(TypedValue::Bool(cmp(a, b)))
}

fn get_attr(object: &TypedValue, name: &str) -> Result<TypedValue, EvaluationFailure> {
    match object {
        TypedValue::Object(map) | TypedValue::Map(map) => {
            map.get(name).cloned().ok_or_else(|| {
                EvaluationFailure::AccessError(format!(
                    "This object does not have an attribute named \"{}\"",
                    name
                ))
            })
        }
        TypedValue::Unknown => Ok(TypedValue::Unknown),
        TypedValue::Null => Err(EvaluationFailure::AccessError(format!(
            "Attempt to get attribute \"{}\" from a null value",
            name
        ))),
        other => Err(EvaluationFailure::TypeError(format!(
            "Cannot get attribute \"{}\" from {}",
            name,
            other.type_name()
        ))),
    }
}

fn index(object: &TypedValue, key: &TypedValue) -> Result<TypedValue, EvaluationFailure> {
    match (object, key) {
        (TypedValue::Unknown, _) | (_, TypedValue::Unknown) => Ok(TypedValue::Unknown),
        (TypedValue::Null, _) => Err(EvaluationFailure::AccessError(
            "Attempt to index a null value".into(),
        )),
        (TypedValue::List(items), key) => {
            let n = to_number(key, "index")?;
            let position = if n.is_integer() && !n.is_sign_negative() {
                n.to_usize()
            } else {
                None
            };
            position
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| {
                    EvaluationFailure::AccessError(format!(
                        "index {} is out of range for a list of length {}",
                        n.normalize(),
                        items.len()
                    ))
                })
        }
        (TypedValue::Object(map) | TypedValue::Map(map), key) => {
            let key = to_string_value(key, "index key")?;
            map.get(&key).cloned().ok_or_else(|| {
                EvaluationFailure::AccessError(format!(
                    "The given key does not identify an element: \"{}\"",
                    key
                ))
            })
        }
        (other, _) => Err(EvaluationFailure::TypeError(format!(
            "Cannot index {}",
            other.type_name()
        ))),
    }
}

fn to_number(value: &TypedValue, operation: &str) -> Result<Decimal, EvaluationFailure> {
    match value {
        TypedValue::Number(n) => Ok(*n),
        TypedValue::RawNumber(text) => Err(EvaluationFailure::NumberOutOfRange(
            text.clone(),
            operation.to_string(),
        )),
        TypedValue::String(s) => parse_number(s).ok_or_else(|| {
            EvaluationFailure::TypeError(format!(
                "{}: cannot convert \"{}\" to a number",
                operation, s
            ))
        }),
        other => Err(EvaluationFailure::TypeError(format!(
            "{}: a number is required, got {}",
            operation,
            other.type_name()
        ))),
    }
}

fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn to_bool(value: &TypedValue, operation: &str) -> Result<bool, EvaluationFailure> {
    match value {
        TypedValue::Bool(b) => Ok(*b),
        TypedValue::String(s) if s == "true" => Ok(true),
        TypedValue::String(s) if s == "false" => Ok(false),
        other => Err(EvaluationFailure::TypeError(format!(
            "{}: a bool is required, got {}",
            operation,
            other.type_name()
        ))),
    }
}

/// Render a primitive for use in string context (interpolation, object keys).
fn to_string_value(value: &TypedValue, operation: &str) -> Result<String, EvaluationFailure> {
    match value {
        TypedValue::String(s) => Ok(s.clone()),
        TypedValue::Number(n) => Ok(n.normalize().to_string()),
        TypedValue::RawNumber(text) => Ok(text.clone()),
        TypedValue::Bool(b) => Ok(b.to_string()),
        TypedValue::Null => Err(EvaluationFailure::TypeError(format!(
            "{}: value is null",
            operation
        ))),
        other => Err(EvaluationFailure::TypeError(format!(
            "{}: cannot convert {} to a string",
            operation,
            other.type_name()
        ))),
    }
}
