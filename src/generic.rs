use std::{collections::BTreeMap, fmt};

/// Resolved path (dot-joined key trail) to converted value.
///
/// Ordered by path, so every output format iterates it deterministically.
pub type ResultSet = BTreeMap<String, GenericValue>;

/// A language-agnostic value tree, ready for serialization.
///
/// # Examples
///
/// ```
/// use hcl_read::GenericValue;
///
/// let zones = GenericValue::List(vec![
///     GenericValue::String("a".to_string()),
///     GenericValue::String("b".to_string()),
/// ]);
/// assert_eq!(zones.to_string(), "[a b]");
/// assert_eq!(GenericValue::Number(5.0).to_string(), "5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Null,
    Boolean(bool),
    /// Always double precision; round or truncate explicitly for integers
    Number(f64),
    String(String),
    List(Vec<GenericValue>),
    Map(BTreeMap<String, GenericValue>),
}

/// The concrete kind of a [`GenericValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    List,
    Map,
}

/// A list whose elements share one scalar kind, exposed as a typed sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedList<'a> {
    Booleans(Vec<bool>),
    Numbers(Vec<f64>),
    Strings(Vec<&'a str>),
}

impl GenericValue {
    pub fn kind(&self) -> Kind {
        match self {
            GenericValue::Null => Kind::Null,
            GenericValue::Boolean(_) => Kind::Boolean,
            GenericValue::Number(_) => Kind::Number,
            GenericValue::String(_) => Kind::String,
            GenericValue::List(_) => Kind::List,
            GenericValue::Map(_) => Kind::Map,
        }
    }

    /// The shared element kind of a non-empty list, if all elements agree.
    pub fn element_kind(&self) -> Option<Kind> {
        let GenericValue::List(items) = self else {
            return None;
        };
        let first = items.first()?.kind();
        items.iter().all(|v| v.kind() == first).then_some(first)
    }

    /// View a homogeneous list of booleans, numbers or strings as a typed
    /// sequence. Empty, mixed and nested lists stay generic.
    pub fn as_typed_list(&self) -> Option<TypedList<'_>> {
        let GenericValue::List(items) = self else {
            return None;
        };
        match self.element_kind()? {
            Kind::Boolean => Some(TypedList::Booleans(
                items
                    .iter()
                    .filter_map(|v| match v {
                        GenericValue::Boolean(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
            )),
            Kind::Number => Some(TypedList::Numbers(
                items
                    .iter()
                    .filter_map(|v| match v {
                        GenericValue::Number(n) => Some(*n),
                        _ => None,
                    })
                    .collect(),
            )),
            Kind::String => Some(TypedList::Strings(
                items
                    .iter()
                    .filter_map(|v| match v {
                        GenericValue::String(s) => Some(s.as_str()),
                        _ => None,
                    })
                    .collect(),
            )),
            Kind::Null | Kind::List | Kind::Map => None,
        }
    }
}

/// Default textual rendering: strings verbatim, lists as `[a b c]`, maps as
/// `map[k:v]`, null as `<nil>`.
impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::Null => write!(f, "<nil>"),
            GenericValue::Boolean(b) => write!(f, "{}", b),
            GenericValue::Number(n) => write!(f, "{}", n),
            GenericValue::String(s) => write!(f, "{}", s),
            GenericValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            GenericValue::Map(map) => {
                write!(f, "map[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_list_stays_generic() {
        let list = GenericValue::List(vec![
            GenericValue::Boolean(true),
            GenericValue::String("x".into()),
        ]);
        assert_eq!(list.element_kind(), None);
        assert_eq!(list.as_typed_list(), None);
    }

    #[test]
    fn test_empty_list_has_no_element_kind() {
        assert_eq!(GenericValue::List(vec![]).element_kind(), None);
    }

    #[test]
    fn test_map_rendering() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), GenericValue::Number(2.5));
        map.insert("a".to_string(), GenericValue::Null);
        assert_eq!(GenericValue::Map(map).to_string(), "map[a:<nil> b:2.5]");
    }
}
