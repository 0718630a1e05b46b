//! Document selection.
//!
//! The store only understands equality on a single top-level field, e.g.
//! `Query::field("dni").equals("47526381")`.

use serde_json::Value;

use crate::core::tables::Fields;

/// An equality predicate on one top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    field: String,
    value: Value,
}

/// The left-hand side of a [`Query`] under construction.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
}

impl Query {
    pub fn field(name: impl Into<String>) -> Field {
        Field { name: name.into() }
    }

    pub fn field_name(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether a document satisfies the predicate. A document without the
    /// field never matches, not even a query for `null`.
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

impl Field {
    pub fn equals(self, value: impl Into<Value>) -> Query {
        Query {
            field: self.name,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_matches() {
        let q = Query::field("dni").equals("47526381");
        assert!(q.matches(&doc(json!({"dni": "47526381", "nombre": "Juan"}))));
        assert!(!q.matches(&doc(json!({"dni": "46193480"}))));
        assert!(!q.matches(&doc(json!({"nombre": "Juan"}))));
    }

    #[test]
    fn test_no_type_coercion() {
        let q = Query::field("nota").equals(6);
        assert!(q.matches(&doc(json!({"nota": 6}))));
        assert!(!q.matches(&doc(json!({"nota": "6"}))));
    }

    #[test]
    fn test_missing_field_is_not_null() {
        let q = Query::field("dni").equals(Value::Null);
        assert!(q.matches(&doc(json!({"dni": null}))));
        assert!(!q.matches(&doc(json!({}))));
    }
}
