//! Attribute values and maps.
//!
//! Option bags and model attributes speak a small value vocabulary:
//! [`AttributeValue`] holds one value, [`AttributeMap`] is a string-keyed
//! map of them. Accessors are total (`as_*` returns `Option`) so resolution
//! misses stay branchable rather than panicking.

use std::collections::HashMap;
use std::fmt;

/// A single attribute value.
///
/// The variants cover what option bags and rendered templates need; richer
/// payloads belong in the host application, keyed from here by name or id.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttributeValue {
    /// No value. Distinct from an absent key.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Ordered list of values.
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Returns `true` if this is [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a text slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an owned string.
    pub fn into_text(self) -> Option<String> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the value as a list slice.
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Renders a value the way a template placeholder would show it.
///
/// `Null` renders as the empty string; lists render comma-separated.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(n) => write!(f, "{n}"),
            AttributeValue::Float(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        AttributeValue::List(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => AttributeValue::Null,
        }
    }
}

/// A string-keyed map of attribute values.
///
/// This is the currency of option bags, factory defaults, and instance
/// attributes. Key iteration order is unspecified; ordering guarantees live
/// in collections, not attribute maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap {
    entries: HashMap<String, AttributeValue>,
}

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, for literal maps in options and tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Returns the value for a key as a text slice, if it is text.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_text)
    }

    /// Returns `true` if the key is present (even if its value is `Null`).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
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
    fn test_value_accessors() {
        assert_eq!(AttributeValue::from(7).as_int(), Some(7));
        assert_eq!(AttributeValue::from(7).as_text(), None);
        assert_eq!(AttributeValue::from("seven").as_text(), Some("seven"));
        assert_eq!(AttributeValue::from(true).as_bool(), Some(true));
        assert!(AttributeValue::Null.is_null());
        assert!(AttributeValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(AttributeValue::Null.to_string(), "");
        assert_eq!(AttributeValue::from(3.5).to_string(), "3.5");
        let list = AttributeValue::List(vec![1.into(), "two".into()]);
        assert_eq!(list.to_string(), "1, two");
    }

    #[test]
    fn test_map_builder_and_lookup() {
        let map = AttributeMap::new().with("name", "Widget").with("qty", 3);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_text("name"), Some("Widget"));
        assert_eq!(map.get("qty").and_then(AttributeValue::as_int), Some(3));
        assert!(!map.contains_key("color"));
    }

    #[test]
    fn test_map_null_is_present() {
        let map = AttributeMap::new().with("pending", AttributeValue::Null);
        assert!(map.contains_key("pending"));
        assert!(map.get("pending").unwrap().is_null());
    }

    #[test]
    fn test_map_from_iter() {
        let map: AttributeMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.get("b").and_then(AttributeValue::as_int), Some(2));
    }
}
