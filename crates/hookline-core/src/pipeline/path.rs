//! Dotted-path access over JSON value trees.
//!
//! An explicit recursive walker over `serde_json::Value` -- never dynamic
//! property lookup. Reads are total (absence anywhere along the path
//! yields `None`, never an error). Writes create intermediate objects as
//! needed; an existing non-object value at an intermediate segment is
//! overwritten with an object. That truncation is a real contract of the
//! payload transformer, not an error.

use serde_json::{Map, Value};

/// Resolve the value at a dotted path, e.g. `user.address.city`.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at a dotted path, creating intermediate objects.
///
/// Any intermediate segment that is missing or not itself an object is
/// replaced with a fresh object before descending.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = match segments.split_last() {
        Some(parts) => parts,
        None => return,
    };

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    // `current` is an object on entry to every iteration: the root is
    // forced above and each visited entry is coerced before descending.
    let mut current = root;
    for segment in intermediate {
        let Value::Object(map) = current else { return };
        let entry = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }

    let Value::Object(map) = current else { return };
    map.insert(last.to_string(), value);
}
