//! Operator dispatch and the document matcher.
//!
//! This is the bulk of the engine. Every condition operator shares the
//! traversal skeleton in [`crate::path::traverse`] and differs only in its
//! terminal predicate and absence policy, via strategy-style dispatch that
//! carries the traversal itself rather than doing a flat field lookup per
//! operator.

use lazy_static::lazy_static;
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::path::{split_path, traverse};
use crate::value::{deep_equal, OrderedMap, Value};
use crate::validator::is_expression_map;
use crate::{log_trace, log_warn};

const COMBINATORS: &[&str] = &["$and", "$or", "$nor"];

const CONDITION_OPERATORS: &[&str] = &[
    "$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$in", "$nin", "$not", "$regex", "$options",
    "$mod", "$all", "$elemMatch", "$size",
];

pub fn is_combinator(key: &str) -> bool {
    COMBINATORS.contains(&key)
}

pub fn is_known_operator(key: &str) -> bool {
    CONDITION_OPERATORS.contains(&key)
}

lazy_static! {
    static ref REGEX_CACHE: Mutex<LruCache<String, Regex>> =
        Mutex::new(LruCache::new(NonZeroUsize::new(100).unwrap()));
}

/// Builds the inline-flag prefix MongoDB-style, restricted to the `{i, m,
/// s}` subset this crate honors (the `x` extended flag is dropped).
fn build_pattern(pattern: &str, options: &str) -> String {
    let flags: String = options.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
    if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    }
}

fn get_or_compile_regex(pattern: &str, options: &str) -> Option<Regex> {
    let key = format!("{pattern}\u{0}{options}");
    let mut cache = REGEX_CACHE.lock().unwrap();
    if let Some(re) = cache.get(&key) {
        return Some(re.clone());
    }
    match Regex::new(&build_pattern(pattern, options)) {
        Ok(re) => {
            cache.put(key, re.clone());
            Some(re)
        }
        Err(err) => {
            log_warn!("failed to compile regex {pattern:?} with options {options:?}: {err}");
            None
        }
    }
}

fn regex_is_match(text: &str, pattern: &str, options: &str) -> bool {
    match get_or_compile_regex(pattern, options) {
        Some(re) => re.is_match(text),
        None => false,
    }
}

/// Walks a query tree once, pre-compiling every `$regex`(+`$options`) pair
/// it finds into the shared cache, so the first document matched against a
/// freshly constructed predicate never pays compilation cost inline. Purely
/// a cache-warming pass; matching still goes through [`regex_is_match`].
pub fn warm_regex_cache(query: &Value) {
    match query {
        Value::Map(map) => {
            match map.get("$regex") {
                Some(Value::String(pattern)) => {
                    let options = match map.get("$options") {
                        Some(Value::String(opts)) => opts.as_str(),
                        _ => "",
                    };
                    get_or_compile_regex(pattern, options);
                }
                Some(Value::Regex(pattern, flags)) => {
                    get_or_compile_regex(pattern, flags);
                }
                _ => {}
            }
            for v in map.values() {
                warm_regex_cache(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                warm_regex_cache(item);
            }
        }
        _ => {}
    }
}

/// Entry point: evaluates `query` (implicit top-level `$and`) against `doc`.
pub fn match_query(doc: &Value, query: &Value) -> bool {
    let Some(map) = query.as_map() else {
        return false;
    };
    map.iter().all(|(key, value)| {
        if is_combinator(key) {
            match_combinator(key, value, doc)
        } else {
            match_path_condition(doc, key, value)
        }
    })
}

fn match_combinator(key: &str, value: &Value, doc: &Value) -> bool {
    let Some(list) = value.as_array() else {
        return false;
    };
    match key {
        "$and" => list.iter().all(|sub| match_query(doc, sub)),
        "$or" => list.iter().any(|sub| match_query(doc, sub)),
        "$nor" => !list.iter().any(|sub| match_query(doc, sub)),
        _ => false,
    }
}

/// Evaluates a single top-level query key: either an expression (all keys
/// are known operators) evaluated at `path`, or a plain operand treated as
/// implicit `$eq`.
fn match_path_condition(doc: &Value, path: &str, value: &Value) -> bool {
    match_condition_at(doc, &split_path(path), value)
}

/// Same as [`match_path_condition`], but takes already-split segments so
/// `$elemMatch` can re-enter this logic with an *empty* segment list (the
/// element stands in for a whole document) without going through
/// `split_path`, which treats `""` as a literal one-segment path rather than
/// "no path at all".
fn match_condition_at(doc: &Value, segments: &[&str], value: &Value) -> bool {
    if let Some(expr) = is_expression_map(value) {
        match_expression_at(doc, segments, expr)
    } else {
        match_operator(doc, segments, "$eq", value, None)
    }
}

/// ANDs every operator key in an expression map at the same path. `$options`
/// is skipped as a standalone key (it's a `$regex` modifier only).
fn match_expression_at(doc: &Value, segments: &[&str], expr: &OrderedMap) -> bool {
    let options = expr.get("$options");
    expr.iter().all(|(op, operand)| {
        if op == "$options" {
            true
        } else {
            match_operator(doc, segments, op, operand, options)
        }
    })
}

/// Dispatches a single operator at `segments`, threading the shared
/// traversal skeleton through each operator's terminal predicate and
/// absence policy.
fn match_operator(doc: &Value, segments: &[&str], op: &str, operand: &Value, options: Option<&Value>) -> bool {
    match op {
        "$eq" => {
            let absent = operand.is_null();
            traverse(doc, segments, absent, true, &|leaf| eq_terminal(leaf, operand))
        }
        "$ne" => !match_operator(doc, segments, "$eq", operand, None),
        "$gt" => traverse(doc, segments, false, true, &|leaf| {
            cmp_terminal(leaf, operand, |ord| ord == std::cmp::Ordering::Greater)
        }),
        "$gte" => {
            let absent = operand.is_null();
            traverse(doc, segments, absent, true, &|leaf| {
                cmp_terminal(leaf, operand, |ord| ord != std::cmp::Ordering::Less)
            })
        }
        "$lt" => traverse(doc, segments, false, true, &|leaf| {
            cmp_terminal(leaf, operand, |ord| ord == std::cmp::Ordering::Less)
        }),
        "$lte" => {
            let absent = operand.is_null();
            traverse(doc, segments, absent, true, &|leaf| {
                cmp_terminal(leaf, operand, |ord| ord != std::cmp::Ordering::Greater)
            })
        }
        "$in" => {
            let Some(list) = operand.as_array() else {
                log_trace!("$in operand is not an array, no match");
                return false;
            };
            let absent = list.iter().any(|v| v.is_null());
            traverse(doc, segments, absent, true, &|leaf| {
                list.iter().any(|item| eq_terminal(leaf, item))
            })
        }
        "$nin" => !match_operator(doc, segments, "$in", operand, None),
        "$not" => !match_condition_at(doc, segments, operand),
        "$regex" => {
            // Operand is either a bare pattern string (flags come from the
            // sibling `$options` key) or a precompiled `Value::Regex`, which
            // carries its own flags and ignores `$options`.
            let (pattern, opts): (&str, &str) = match operand {
                Value::String(p) => {
                    let opts = match options {
                        Some(Value::String(o)) => o.as_str(),
                        _ => "",
                    };
                    (p.as_str(), opts)
                }
                Value::Regex(p, f) => (p.as_str(), f.as_str()),
                _ => return false,
            };
            traverse(doc, segments, false, true, &|leaf| match leaf {
                Value::String(s) => regex_is_match(s, pattern, opts),
                _ => false,
            })
        }
        "$mod" => traverse(doc, segments, false, true, &|leaf| mod_terminal(leaf, operand)),
        "$size" => traverse(doc, segments, false, false, &|leaf| size_terminal(leaf, operand)),
        "$elemMatch" => traverse(doc, segments, false, true, &|leaf| elem_match_terminal(leaf, operand)),
        "$all" => match_all(doc, segments, operand),
        _ => {
            log_warn!("unknown operator {op:?} reached the matcher, treating as no match");
            false
        }
    }
}

/// `$eq`'s terminal predicate: deep-equality, plus a regex-as-string and an
/// array-fan-out allowance. Written to recurse into array leaves itself
/// (not just rely on the outer traversal's single-level fan-out) so it can
/// be reused directly by `$in`/`$all` against list elements.
fn eq_terminal(leaf: &Value, operand: &Value) -> bool {
    if deep_equal(leaf, operand) {
        return true;
    }
    if let (Value::Regex(pattern, flags), Value::String(s)) = (operand, leaf) {
        if regex_is_match(s, pattern, flags) {
            return true;
        }
    }
    if let Value::Array(items) = leaf {
        return items.iter().any(|item| eq_terminal(item, operand));
    }
    false
}

fn cmp_terminal(leaf: &Value, operand: &Value, accept: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    crate::ordering::compare_values(leaf, operand).is_some_and(accept)
}

fn mod_terminal(leaf: &Value, operand: &Value) -> bool {
    let Some(args) = operand.as_array() else {
        return false;
    };
    let [divisor, remainder] = args else {
        return false;
    };
    let (Value::Number(leaf_n), Value::Number(divisor_n), Value::Number(remainder_n)) =
        (leaf, divisor, remainder)
    else {
        return false;
    };
    let d = divisor_n.floor() as i64;
    if d == 0 {
        return false;
    }
    let l = leaf_n.floor() as i64;
    let r = remainder_n.floor() as i64;
    l % d == r
}

fn size_terminal(leaf: &Value, operand: &Value) -> bool {
    let (Value::Array(items), Value::Number(n)) = (leaf, operand) else {
        return false;
    };
    items.len() as f64 == n.trunc()
}

fn elem_match_terminal(leaf: &Value, operand: &Value) -> bool {
    let Value::Array(items) = leaf else {
        return false;
    };
    items.iter().any(|item| match is_expression_map(operand) {
        // An all-operator expression applies directly to the element (e.g.
        // a scalar array member), with no path segments to traverse.
        Some(expr) => match_expression_at(item, &[], expr),
        // A field-keyed sub-query treats the element as a whole document.
        None => match_query(item, operand),
    })
}

/// `$all`: scalar-form at the leaf, or a rewrite into an AND of per-path
/// `$elemMatch` clauses when every operand element carries `$elemMatch`.
fn match_all(doc: &Value, segments: &[&str], operand: &Value) -> bool {
    let Some(reqs) = operand.as_array() else {
        return false;
    };
    if reqs.is_empty() {
        return false;
    }
    let elem_match_form = reqs.iter().all(|el| el.as_map().is_some_and(|m| m.contains_key("$elemMatch")));
    if elem_match_form {
        reqs.iter().all(|req| match_condition_at(doc, segments, req))
    } else {
        traverse(doc, segments, false, false, &|leaf| all_scalar_terminal(leaf, reqs))
    }
}

fn all_scalar_terminal(leaf: &Value, reqs: &[Value]) -> bool {
    let Value::Array(items) = leaf else {
        return false;
    };
    reqs.iter().all(|req| {
        items.iter().any(|item| deep_equal(item, req)) || deep_equal(&Value::Array(items.clone()), req)
    })
}
