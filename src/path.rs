//! Dot-path splitting and the shared document-traversal skeleton.
//!
//! Every operator's matching behavior is `traverse` parameterized by an
//! absence policy and a terminal predicate; this is the one place the
//! map-vs-array-index precedence rule and the array fan-out rules live, so
//! individual operators in `query::operators` never repeat them.

use crate::value::Value;
use crate::{log_trace, log_warn};

/// Defensive ceiling on recursion depth, so pathological nesting degrades to
/// the operator's absence policy instead of blowing the call stack. No
/// realistic document/query pairing should come close to this.
const MAX_TRAVERSAL_DEPTH: usize = 1000;

/// Splits a dotted path into segments. Empty segments (`"a..b"`, leading or
/// trailing dots) are kept literally, matching a document field that is
/// itself an empty string.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// A segment is an index candidate if it is entirely ASCII digits.
pub fn is_index_candidate(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Walks a dotted path through a document, applying `terminal` once the
/// path is exhausted.
///
/// `absent` is the operator's absence policy outcome (what to return when a
/// map doesn't have the next key, or the path runs into a scalar/null with
/// segments still remaining). `leaf_fanout` controls whether the base case
/// additionally tries `terminal` against each element when the reached
/// value is an array (`$size` disables this; every other operator enables
/// it).
pub fn traverse(
    doc: &Value,
    segments: &[&str],
    absent: bool,
    leaf_fanout: bool,
    terminal: &dyn Fn(&Value) -> bool,
) -> bool {
    traverse_at_depth(doc, segments, absent, leaf_fanout, terminal, 0)
}

fn traverse_at_depth(
    doc: &Value,
    segments: &[&str],
    absent: bool,
    leaf_fanout: bool,
    terminal: &dyn Fn(&Value) -> bool,
    depth: usize,
) -> bool {
    if depth > MAX_TRAVERSAL_DEPTH {
        log_warn!("traversal depth limit ({MAX_TRAVERSAL_DEPTH}) exceeded, treating as absent");
        return absent;
    }

    match segments.split_first() {
        None => {
            if terminal(doc) {
                return true;
            }
            if leaf_fanout {
                if let Value::Array(items) = doc {
                    return items.iter().any(|item| terminal(item));
                }
            }
            false
        }
        Some((&key, rest)) => match doc {
            Value::Map(map) => match map.get(key) {
                Some(v) => traverse_at_depth(v, rest, absent, leaf_fanout, terminal, depth + 1),
                None => {
                    log_trace!("path segment {key:?} absent from map");
                    absent
                }
            },
            Value::Array(items) => {
                if is_index_candidate(key) {
                    if let Ok(idx) = key.parse::<usize>() {
                        if let Some(v) = items.get(idx) {
                            if traverse_at_depth(v, rest, absent, leaf_fanout, terminal, depth + 1) {
                                return true;
                            }
                        }
                    }
                }
                items
                    .iter()
                    .any(|item| traverse_at_depth(item, segments, absent, leaf_fanout, terminal, depth + 1))
            }
            _ => absent,
        },
    }
}
