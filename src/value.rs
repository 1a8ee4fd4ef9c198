use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// An evaluated configuration value.
///
/// Produced by [`crate::evaluator::Evaluator`] for a single attribute and
/// consumed by [`crate::converter::convert`]. Null and unknown values are
/// distinct variants so they can be checked before looking at any payload.
///
/// # Examples
///
/// ```
/// use hcl_read::TypedValue;
/// use rust_decimal::Decimal;
///
/// let count = TypedValue::Number(Decimal::from(3));
/// let zones = TypedValue::List(vec![
///     TypedValue::String("us-east1-b".to_string()),
///     TypedValue::String("us-east1-c".to_string()),
/// ]);
/// assert_eq!(count.type_name(), "number");
/// assert_eq!(zones.type_name(), "list");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Known to be absent
    Null,

    /// Not yet known
    Unknown,

    /// UTF-8 string
    String(String),

    /// Number at full decimal precision
    Number(Decimal),

    /// Number literal beyond decimal range, as written in the source.
    /// It can be passed through and converted but not computed with.
    RawNumber(String),

    /// Boolean
    Bool(bool),

    /// Ordered sequence (lists and tuples alike)
    List(Vec<TypedValue>),

    /// Homogeneous map keyed by string
    Map(BTreeMap<String, TypedValue>),

    /// Object with named attributes
    Object(BTreeMap<String, TypedValue>),
}

impl TypedValue {
    pub fn is_known(&self) -> bool {
        !matches!(self, TypedValue::Unknown)
    }

    /// Human-readable type name, used in error messages and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Unknown => "unknown",
            TypedValue::String(_) => "string",
            TypedValue::Number(_) | TypedValue::RawNumber(_) => "number",
            TypedValue::Bool(_) => "bool",
            TypedValue::List(_) => "list",
            TypedValue::Map(_) => "map",
            TypedValue::Object(_) => "object",
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<Decimal> for TypedValue {
    fn from(n: Decimal) -> Self {
        TypedValue::Number(n)
    }
}
