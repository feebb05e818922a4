// src/query.rs
//! The predicate facade: binds a query to a reusable `test`/`validate`
//! object.
//!
//! Matching itself lives in [`operators`]; this module is just the glue
//! that binds a query tree to a callable, reusable object.

pub mod operators;

use crate::error::Result;
use crate::validator;
use crate::value::Value;

/// A query bound for repeated matching against documents.
///
/// Construction pre-warms the shared regex cache (one pass over the query
/// tree) so `$regex` terminals never pay compilation cost on the first
/// document. A `Predicate` is immutable after construction: `test` never
/// mutates it, and it may be shared across threads (`Value` is `Send + Sync`).
#[derive(Debug, Clone)]
pub struct Predicate {
    query: Value,
}

impl Predicate {
    /// Binds `query` into a reusable predicate. Does not validate; call
    /// [`Predicate::validate`] to surface structural errors eagerly.
    pub fn new(query: Value) -> Self {
        operators::warm_regex_cache(&query);
        Predicate { query }
    }

    /// Convenience constructor from `serde_json::Value`, for host code that
    /// builds queries with `serde_json::json!` rather than hand-writing
    /// [`Value`] trees.
    pub fn from_json(json: &serde_json::Value) -> Self {
        Self::new(Value::from_json(json))
    }

    /// Runs structural validation once. Returns `self` on success so
    /// construction can be chained: `Predicate::new(q).validate()?`.
    pub fn validate(self) -> Result<Self> {
        validator::validate(&self.query)?;
        Ok(self)
    }

    /// Evaluates the bound query against `document`. Total over any input:
    /// ill-typed operator arguments resolve to `false` for that clause
    /// rather than raising (see [`operators`]).
    pub fn test(&self, document: &Value) -> bool {
        operators::match_query(document, &self.query)
    }

    /// The query this predicate was constructed from.
    pub fn query(&self) -> &Value {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_query_matches_every_document() {
        let pred = Predicate::from_json(&json!({}));
        assert!(pred.test(&Value::from_json(&json!({"a": 1}))));
        assert!(pred.test(&Value::from_json(&json!(null))));
    }

    #[test]
    fn validate_chains_and_returns_self() {
        let pred = Predicate::from_json(&json!({"age": {"$gte": 18}}))
            .validate()
            .expect("structurally valid query");
        assert!(pred.test(&Value::from_json(&json!({"age": 21}))));
        assert!(!pred.test(&Value::from_json(&json!({"age": 10}))));
    }

    #[test]
    fn validate_surfaces_structural_error() {
        let err = Predicate::from_json(&json!({"a": {"$mod": [2, "x"]}}))
            .validate()
            .unwrap_err();
        assert_eq!(err.operator, "$mod");
    }

    #[test]
    fn test_never_panics_on_ill_typed_operator_arguments() {
        let pred = Predicate::from_json(&json!({"a": {"$size": "not-a-number"}}));
        assert!(!pred.test(&Value::from_json(&json!({"a": [1, 2]}))));
    }

    #[test]
    fn repeated_test_is_idempotent() {
        let pred = Predicate::from_json(&json!({"foo.bar": {"$gt": 1}}));
        let doc = Value::from_json(&json!({"foo": {"bar": 2}}));
        assert!(pred.test(&doc));
        assert!(pred.test(&doc));
    }

    #[test]
    fn predicate_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predicate>();
    }
}
