// Property-based tests for the engine's universal matching invariants.
use docpred_core::query::operators::match_query;
use docpred_core::validator::validate;
use docpred_core::Value;
use proptest::prelude::*;

/// A small, depth-bounded `Value` strategy: scalars at the leaves, maps and
/// arrays of at most 3 children above them. Regex and Function are excluded
/// here (deep-equal symmetry is only contracted for non-regex, non-array
/// leaves; arrays get their own dedicated property).
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000.0..1000.0f64).prop_map(Value::Number),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = arb_scalar();
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|pairs| {
                let mut map = docpred_core::value::OrderedMap::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                Value::Map(map)
            }),
        ]
    })
}

/// A document built as a map of 1-3 scalar fields, to exercise absence/path
/// properties without needing arbitrarily deep traversal.
fn arb_document() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,6}", arb_scalar()), 0..4).prop_map(|pairs| {
        let mut map = docpred_core::value::OrderedMap::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        Value::Map(map)
    })
}

fn empty_query() -> Value {
    Value::from_json(&serde_json::json!({}))
}

proptest! {
    #[test]
    fn prop_conjunction_identity(doc in arb_document()) {
        prop_assert!(match_query(&doc, &empty_query()));
    }

    #[test]
    fn prop_idempotence(doc in arb_document(), limit in -1000.0..1000.0f64) {
        let query = Value::from_json(&serde_json::json!({"age": {"$gt": limit}}));
        let first = match_query(&doc, &query);
        let second = match_query(&doc, &query);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_ne_is_not_eq(doc in arb_document(), operand in arb_scalar()) {
        let eq_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut expr = docpred_core::value::OrderedMap::new();
            expr.insert("$eq".to_string(), operand.clone());
            m.insert("age".to_string(), Value::Map(expr));
            Value::Map(m)
        };
        let ne_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut expr = docpred_core::value::OrderedMap::new();
            expr.insert("$ne".to_string(), operand);
            m.insert("age".to_string(), Value::Map(expr));
            Value::Map(m)
        };
        prop_assert_eq!(match_query(&doc, &ne_q), !match_query(&doc, &eq_q));
    }

    #[test]
    fn prop_nin_is_not_in(doc in arb_document(), items in prop::collection::vec(arb_scalar(), 0..4)) {
        let in_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut expr = docpred_core::value::OrderedMap::new();
            expr.insert("$in".to_string(), Value::Array(items.clone()));
            m.insert("age".to_string(), Value::Map(expr));
            Value::Map(m)
        };
        let nin_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut expr = docpred_core::value::OrderedMap::new();
            expr.insert("$nin".to_string(), Value::Array(items));
            m.insert("age".to_string(), Value::Map(expr));
            Value::Map(m)
        };
        prop_assert_eq!(match_query(&doc, &nin_q), !match_query(&doc, &in_q));
    }

    #[test]
    fn prop_nor_single_is_not_or_single(doc in arb_document(), operand in arb_scalar()) {
        let clause = {
            let mut m = docpred_core::value::OrderedMap::new();
            m.insert("age".to_string(), operand);
            Value::Map(m)
        };
        let or_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            m.insert("$or".to_string(), Value::Array(vec![clause.clone()]));
            Value::Map(m)
        };
        let nor_q = {
            let mut m = docpred_core::value::OrderedMap::new();
            m.insert("$nor".to_string(), Value::Array(vec![clause]));
            Value::Map(m)
        };
        prop_assert_eq!(match_query(&doc, &nor_q), !match_query(&doc, &or_q));
    }

    #[test]
    fn prop_not_negates_same_path_expression(doc in arb_document(), limit in -1000.0..1000.0f64) {
        let bare = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut expr = docpred_core::value::OrderedMap::new();
            expr.insert("$gt".to_string(), Value::Number(limit));
            m.insert("age".to_string(), Value::Map(expr));
            Value::Map(m)
        };
        let negated = {
            let mut m = docpred_core::value::OrderedMap::new();
            let mut not_expr = docpred_core::value::OrderedMap::new();
            let mut inner = docpred_core::value::OrderedMap::new();
            inner.insert("$gt".to_string(), Value::Number(limit));
            not_expr.insert("$not".to_string(), Value::Map(inner));
            m.insert("age".to_string(), Value::Map(not_expr));
            Value::Map(m)
        };
        prop_assert_eq!(match_query(&doc, &negated), !match_query(&doc, &bare));
    }

    #[test]
    fn prop_and_or_nor_empty_list_algebra(doc in arb_document()) {
        prop_assert!(match_query(&doc, &Value::from_json(&serde_json::json!({"$and": []}))));
        prop_assert!(!match_query(&doc, &Value::from_json(&serde_json::json!({"$or": []}))));
        prop_assert!(match_query(&doc, &Value::from_json(&serde_json::json!({"$nor": []}))));
    }

    #[test]
    fn prop_and_is_commutative(doc in arb_document(), a in arb_scalar(), b in arb_scalar()) {
        let clause_a = { let mut m = docpred_core::value::OrderedMap::new(); m.insert("x".to_string(), a); Value::Map(m) };
        let clause_b = { let mut m = docpred_core::value::OrderedMap::new(); m.insert("y".to_string(), b); Value::Map(m) };
        let forward = { let mut m = docpred_core::value::OrderedMap::new(); m.insert("$and".to_string(), Value::Array(vec![clause_a.clone(), clause_b.clone()])); Value::Map(m) };
        let backward = { let mut m = docpred_core::value::OrderedMap::new(); m.insert("$and".to_string(), Value::Array(vec![clause_b, clause_a])); Value::Map(m) };
        prop_assert_eq!(match_query(&doc, &forward), match_query(&doc, &backward));
    }

    #[test]
    fn prop_validate_never_panics(query in arb_value()) {
        let _ = validate(&query);
    }

    #[test]
    fn prop_deep_equal_symmetry(v in arb_scalar()) {
        let mut m = docpred_core::value::OrderedMap::new();
        m.insert("x".to_string(), v.clone());
        let query = { let mut q = docpred_core::value::OrderedMap::new(); q.insert("x".to_string(), v); Value::Map(q) };
        prop_assert!(match_query(&Value::Map(m), &query));
    }

    #[test]
    fn prop_absence_symmetry(doc in arb_document(), field in "[a-z]{7,12}") {
        // `field` is long/random enough to almost never collide with the
        // short generated document keys; skip the rare collision.
        if doc.as_map().is_some_and(|m| m.contains_key(&field)) {
            return Ok(());
        }
        let query = {
            let mut m = docpred_core::value::OrderedMap::new();
            m.insert(field, Value::Null);
            Value::Map(m)
        };
        prop_assert!(match_query(&doc, &query));
    }
}
