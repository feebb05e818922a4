//! The document/query value model.
//!
//! Both documents and queries are trees built from the same [`Value`] sum
//! type: nested maps, ordered arrays, scalars, regular expressions, and
//! null. Maps preserve insertion order (backed by [`indexmap::IndexMap`])
//! because the `$gte`/`$lte` map comparison in [`crate::ordering`] depends
//! on it.

use indexmap::IndexMap;
use std::fmt;

/// An order-preserving string-keyed map.
pub type OrderedMap = IndexMap<String, Value>;

/// A document or query value.
///
/// `Number` is a single double-precision variant, matching JSON's own
/// number model rather than splitting integers and floats: the engine only
/// ever needs truncation (`$size`, `$mod`) or direct comparison, both of
/// which are well-defined on `f64`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A regular expression operand: `(pattern, flags)`. Flags are the raw
    /// MongoDB option letters (e.g. `"im"`); only `i`, `m`, `s` are ever
    /// honored by the matcher (see [`crate::query::operators::build_pattern`]).
    Regex(String, String),
    Array(Vec<Value>),
    Map(OrderedMap),
    /// Reserved for a host embedding to wire up `$where` with a pre-parsed
    /// callable. The core engine never constructs or evaluates this variant.
    Function,
}

impl Value {
    pub fn as_map(&self) -> Option<&OrderedMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Builds a `Value` tree from a `serde_json::Value`, preserving object
    /// key order (requires the `preserve_order` feature on `serde_json`,
    /// enabled in this crate's manifest). JSON has no native regex or
    /// function literal, so neither variant is ever produced here; hosts
    /// that need them construct `Value::Regex`/`Value::Function` directly.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut out = OrderedMap::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), Value::from_json(v));
                }
                Value::Map(out)
            }
        }
    }

    /// Converts back to a `serde_json::Value`, the inverse of
    /// [`Value::from_json`] for the subset of variants JSON can represent.
    /// `Regex` serializes as `{"$regex": pattern, "$options": flags}` (its
    /// own query-dialect spelling); `Function` has no JSON form and
    /// serializes as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Regex(pattern, flags) => {
                let mut out = serde_json::Map::new();
                out.insert("$regex".to_string(), serde_json::Value::String(pattern.clone()));
                out.insert("$options".to_string(), serde_json::Value::String(flags.clone()));
                serde_json::Value::Object(out)
            }
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
            Value::Function => serde_json::Value::Null,
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Regex(pat, flags) => write!(f, "/{pat}/{flags}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Function => write!(f, "<function>"),
        }
    }
}

/// Structural equality over [`Value`]: same variant, same content.
///
/// `Map` equality ignores insertion order but requires equal key sets and
/// equal values at each key; `Array` equality requires equal length and
/// element-wise equality in order; `Regex` equality compares `(pattern,
/// flags)`. Reflexive, symmetric, and transitive.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Regex(px, fx), Value::Regex(py, fy)) => px == py && fx == fy,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(i, j)| deep_equal(i, j))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|ov| deep_equal(v, ov)))
        }
        (Value::Function, Value::Function) => true,
        _ => false,
    }
}
