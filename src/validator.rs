//! One-pass structural validation of a query tree.
//!
//! This never inspects documents; it only checks that combinators and
//! operator arguments have the right shape, so it can run once at
//! `Predicate::validate()` time rather than per match.

use crate::error::{Result, StructuralError};
use crate::log_debug;
use crate::query::operators::{is_combinator, is_known_operator};
use crate::value::{OrderedMap, Value};

/// Validates a query tree, recursing into combinator branches.
pub fn validate(query: &Value) -> Result<()> {
    let map = query.as_map().ok_or_else(|| {
        log_debug!("query root is not an object");
        StructuralError::new("query", "query must be an object")
    })?;

    for (key, value) in map {
        if is_combinator(key) {
            let list = value.as_array().ok_or_else(|| {
                log_debug!("{key} requires an array argument");
                StructuralError::new(key, format!("{key} requires an array argument"))
            })?;
            for sub in list {
                validate(sub)?;
            }
        } else if let Some(expr) = is_expression_map(value) {
            validate_expression(key, expr)?;
        }
        // else: a plain operand, treated as implicit $eq, no structural check.
    }
    Ok(())
}

/// Returns `Some(map)` when `value` is a non-empty map whose every key is a
/// known condition operator (an *expression*); otherwise `None`.
pub fn is_expression_map(value: &Value) -> Option<&OrderedMap> {
    let map = value.as_map()?;
    if map.is_empty() {
        return None;
    }
    if map.keys().all(|k| is_known_operator(k)) {
        Some(map)
    } else {
        None
    }
}

fn validate_expression(path: &str, expr: &OrderedMap) -> Result<()> {
    for (op, operand) in expr {
        match op.as_str() {
            "$in" | "$nin" => {
                require_array(op, operand)?;
            }
            "$all" => {
                let list = require_array(op, operand)?;
                validate_all_argument(list)?;
            }
            "$mod" => {
                let list = require_array(op, operand)?;
                let all_numbers = list.iter().all(|v| matches!(v, Value::Number(_)));
                if list.len() != 2 || !all_numbers {
                    return Err(StructuralError::new(
                        "$mod",
                        "$mod requires a 2-element array of numbers",
                    ));
                }
            }
            "$size" => {
                if !matches!(operand, Value::Number(_)) {
                    return Err(StructuralError::new("$size", "$size requires a number"));
                }
            }
            _ => {}
        }
        let _ = path;
    }
    Ok(())
}

fn require_array<'a>(op: &str, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_array()
        .ok_or_else(|| StructuralError::new(op, format!("{op} requires an array argument")))
}

/// If every element of `$all`'s list looks like an elemMatch-form entry (a
/// map with at least one `$`-prefixed key), each such element must actually
/// carry `$elemMatch`.
fn validate_all_argument(list: &[Value]) -> Result<()> {
    if list.is_empty() {
        return Ok(());
    }
    let looks_elem_match_form = list.iter().all(|el| {
        el.as_map()
            .is_some_and(|m| m.keys().any(|k| k.starts_with('$')))
    });
    if looks_elem_match_form {
        for el in list {
            let m = el.as_map().expect("checked above");
            if !m.contains_key("$elemMatch") {
                return Err(StructuralError::new(
                    "$all",
                    "$all elements using operator keys must use $elemMatch",
                ));
            }
        }
    }
    Ok(())
}
