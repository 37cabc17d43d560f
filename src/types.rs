//! Per-call request DTOs shared by item and batch operations.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// A full or partial record: attribute name to typed value.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Scalar value allowed in a primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    S(String),
    N(String),
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::S(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::S(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::N(value.to_string())
    }
}

impl From<KeyValue> for AttributeValue {
    fn from(value: KeyValue) -> Self {
        match value {
            KeyValue::S(s) => AttributeValue::S(s),
            KeyValue::N(n) => AttributeValue::N(n),
        }
    }
}

/// Primary key of one item: partition key plus optional sort key.
///
/// ```
/// use dynokit::ItemKey;
///
/// let key = ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata");
/// assert_eq!(key.to_attribute_map().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    partition: (String, KeyValue),
    sort: Option<(String, KeyValue)>,
}

impl ItemKey {
    pub fn new(name: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self {
            partition: (name.into(), value.into()),
            sort: None,
        }
    }

    pub fn with_sort(mut self, name: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        self.sort = Some((name.into(), value.into()));
        self
    }

    pub fn partition_name(&self) -> &str {
        &self.partition.0
    }

    pub fn sort_name(&self) -> Option<&str> {
        self.sort.as_ref().map(|(name, _)| name.as_str())
    }

    /// Wire form of the key.
    pub fn to_attribute_map(&self) -> AttributeMap {
        self.clone().into_attribute_map()
    }

    pub fn into_attribute_map(self) -> AttributeMap {
        let mut map = HashMap::with_capacity(2);
        map.insert(self.partition.0, self.partition.1.into());
        if let Some((name, value)) = self.sort {
            map.insert(name, value.into());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_only_key() {
        let key = ItemKey::new("Artist", "No One You Know");
        let map = key.to_attribute_map();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("Artist"),
            Some(&AttributeValue::S("No One You Know".to_string()))
        );
        assert_eq!(key.sort_name(), None);
    }

    #[test]
    fn composite_key_with_numeric_sort() {
        let key = ItemKey::new("pk", "x@y.com").with_sort("version", 3);
        let map = key.into_attribute_map();
        assert_eq!(map.get("pk"), Some(&AttributeValue::S("x@y.com".to_string())));
        assert_eq!(map.get("version"), Some(&AttributeValue::N("3".to_string())));
    }
}
