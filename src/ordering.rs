//! The typed total order used by `$gt`/`$gte`/`$lt`/`$lte`.
//!
//! Numbers compare numerically and strings lexicographically; `Array` and
//! `Map` compare lexicographically (element-wise, and key-then-value
//! respectively); `Null` compares equal to `Null`; `Bool` and any mixed-type
//! pairing are left uncontracted, falling through to `None`, which every
//! caller here treats as "no match".

use crate::value::Value;
use std::cmp::Ordering;

/// Returns `Some(ordering)` for the within-type comparisons the matcher
/// contracts: `Number`/`Number`, `String`/`String`, `Null`/`Null`,
/// `Array`/`Array`, `Map`/`Map`. Every other pairing, including `Bool`
/// against anything, is `None` (incomparable: the four comparison operators
/// all treat this as no match).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Map(x), Value::Map(y)) => compare_maps(x, y),
        _ => None,
    }
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for i in 0..a.len().max(b.len()) {
        match (a.get(i), b.get(i)) {
            (None, None) => return Some(Ordering::Equal),
            (None, Some(_)) => return Some(Ordering::Less),
            (Some(_), None) => return Some(Ordering::Greater),
            (Some(x), Some(y)) => match compare_values(x, y) {
                Some(Ordering::Equal) => continue,
                other => return other,
            },
        }
    }
    Some(Ordering::Equal)
}

fn compare_maps(a: &indexmap::IndexMap<String, Value>, b: &indexmap::IndexMap<String, Value>) -> Option<Ordering> {
    let mut ia = a.iter();
    let mut ib = b.iter();
    loop {
        match (ia.next(), ib.next()) {
            (None, None) => return Some(Ordering::Equal),
            (None, Some(_)) => return Some(Ordering::Less),
            (Some(_), None) => return Some(Ordering::Greater),
            (Some((ka, va)), Some((kb, vb))) => {
                if ka != kb {
                    return Some(ka.cmp(kb));
                }
                match compare_values(va, vb) {
                    Some(Ordering::Equal) => continue,
                    other => return other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }
    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values(&num(10.0), &num(5.0)), Some(Ordering::Greater));
        assert_eq!(compare_values(&num(5.0), &num(5.0)), Some(Ordering::Equal));
    }

    #[test]
    fn strings_compare_lexicographically() {
        assert_eq!(compare_values(&s("apple"), &s("banana")), Some(Ordering::Less));
    }

    #[test]
    fn null_equals_null() {
        assert_eq!(compare_values(&Value::Null, &Value::Null), Some(Ordering::Equal));
    }

    #[test]
    fn mixed_types_are_incomparable() {
        assert_eq!(compare_values(&num(1.0), &s("1")), None);
        assert_eq!(compare_values(&Value::Bool(true), &Value::Bool(false)), None);
    }

    #[test]
    fn arrays_compare_lexicographically_shorter_is_less() {
        let a = Value::Array(vec![num(1.0)]);
        let b = Value::Array(vec![num(1.0), num(2.0)]);
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));

        let c = Value::Array(vec![num(1.0), num(5.0)]);
        let d = Value::Array(vec![num(1.0), num(2.0)]);
        assert_eq!(compare_values(&c, &d), Some(Ordering::Greater));
    }

    #[test]
    fn maps_compare_by_insertion_ordered_keys_then_values() {
        let mut a = indexmap::IndexMap::new();
        a.insert("baz".to_string(), s("bux"));
        let mut b = indexmap::IndexMap::new();
        b.insert("baz".to_string(), s("qux"));
        assert_eq!(compare_values(&Value::Map(a), &Value::Map(b)), Some(Ordering::Less));

        let mut c = indexmap::IndexMap::new();
        c.insert("bla".to_string(), s("jaz"));
        let mut d = indexmap::IndexMap::new();
        d.insert("baz".to_string(), s("qux"));
        assert_eq!(compare_values(&Value::Map(c), &Value::Map(d)), Some(Ordering::Greater));
    }

    #[test]
    fn empty_maps_are_equal() {
        let a: indexmap::IndexMap<String, Value> = indexmap::IndexMap::new();
        let b: indexmap::IndexMap<String, Value> = indexmap::IndexMap::new();
        assert_eq!(compare_values(&Value::Map(a), &Value::Map(b)), Some(Ordering::Equal));
    }
}
