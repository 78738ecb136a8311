use std::borrow::Cow;
use std::collections::HashMap;

pub const ID_FIELD: &str = "id";

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of the value. Nulls render as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Null => Cow::Borrowed(""),
        }
    }

    /// Numeric interpretation of the value, if it has one.
    ///
    /// Text counts as numeric when it parses to a finite float, so `"12.5"`
    /// is a number while `"inf"` or `"NaN"` are not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Null => None,
        }
    }

    /// True for nulls and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
            Value::Null => true,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One row of data: an open mapping from field name to value.
///
/// The view engine never mutates records, it only reorders and windows
/// references to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_a_number() {
        assert_eq!(Value::from("12.5").as_number(), Some(12.5));
        assert_eq!(Value::from(" 7 ").as_number(), Some(7.0));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Value::from(42_i64).as_text(), "42");
        assert_eq!(Value::from(1.5).as_text(), "1.5");
        assert_eq!(Value::Null.as_text(), "");
    }

    #[test]
    fn record_from_pairs() {
        let r: Record = [("id", Value::from(1_i64)), ("name", Value::from("red"))]
            .into_iter()
            .collect();
        assert_eq!(r.id(), Some(&Value::Number(1.0)));
        assert_eq!(r.get("name").map(|v| v.as_text()), Some("red".into()));
        assert!(r.get("hex").is_none());
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("  ").is_blank());
        assert!(!Value::from(0.0).is_blank());
        assert!(Value::from(None::<String>).is_null());
    }
}
