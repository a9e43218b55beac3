use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-instance data bag filled in by the start form and completed tasks.
///
/// An open JSON object: field name to string/boolean/number value. Merging is
/// shallow; later submissions overwrite same-named fields and leave the rest
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap(Map<String, Value>);

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Shallow merge: every field in `submitted` overwrites the field of the
    /// same name here; fields only present here survive.
    pub fn merge(&mut self, submitted: &VariableMap) {
        for (field, value) in &submitted.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged_with(mut self, submitted: &VariableMap) -> Self {
        self.merge(submitted);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for VariableMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> VariableMap {
        match value {
            Value::Object(map) => VariableMap::from(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_overwrites_and_preserves() {
        let mut base = vars(json!({"days": 5, "reason": "vacation"}));
        let submitted = vars(json!({"days": 7, "is_academic": true}));

        base.merge(&submitted);

        assert_eq!(base.get("days"), Some(&json!(7)));
        assert_eq!(base.get("reason"), Some(&json!("vacation")));
        assert_eq!(base.get("is_academic"), Some(&json!(true)));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut base = vars(json!({"days": 5}));
        base.merge(&VariableMap::new());
        assert_eq!(base, vars(json!({"days": 5})));
    }

    #[test]
    fn serializes_as_plain_object() {
        let map = vars(json!({"is_academic": false}));
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"is_academic":false}"#);
    }
}
