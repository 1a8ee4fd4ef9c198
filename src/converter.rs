//! Conversion from evaluated [`TypedValue`]s to serializable [`GenericValue`]s.
//!
//! Conversion is total. Numbers become the nearest `f64`; lists and maps stay
//! structural all the way down, so nothing reaches the formatter as a
//! pre-rendered string. The only degrade path is a number that has no finite
//! double representation, which is kept as its text.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    generic::{GenericValue, ResultSet},
    value::TypedValue,
};

/// Convert one typed value into a generic value tree.
///
/// # Examples
///
/// ```
/// use hcl_read::{convert, GenericValue, TypedValue};
/// use rust_decimal::Decimal;
///
/// assert_eq!(convert(TypedValue::Unknown), GenericValue::Null);
/// assert_eq!(
///     convert(TypedValue::Number(Decimal::new(25, 1))),
///     GenericValue::Number(2.5)
/// );
/// ```
pub fn convert(value: TypedValue) -> GenericValue {
    match value {
        TypedValue::Null | TypedValue::Unknown => GenericValue::Null,
        TypedValue::String(s) => GenericValue::String(s),
        TypedValue::Bool(b) => GenericValue::Boolean(b),
        TypedValue::Number(n) => convert_number(n.normalize().to_string()),
        TypedValue::RawNumber(text) => convert_number(text),
        TypedValue::List(items) => GenericValue::List(items.into_iter().map(convert).collect()),
        TypedValue::Map(map) | TypedValue::Object(map) => GenericValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect(),
        ),
    }
}

/// Convert every resolved value, keeping the paths.
pub fn convert_results(results: BTreeMap<String, TypedValue>) -> ResultSet {
    results
        .into_iter()
        .map(|(path, value)| (path, convert(value)))
        .collect()
}

/// Parse the number's text so the result is the correctly rounded nearest
/// double.
fn convert_number(text: String) -> GenericValue {
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => GenericValue::Number(f),
        _ => {
            debug!(number = %text, "number has no finite double representation, keeping text");
            GenericValue::String(text)
        }
    }
}
