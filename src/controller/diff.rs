//! # Essence Diffs
//!
//! Field-level differences between the last handled essence of a resource
//! and its current one.
//!
//! Paths start at the essence root, so a change of the monitor type shows up
//! as `change ["spec", "type"]`. The wire shape `[[op, [path...], old, new], ...]`
//! produced by the previous operator generation is accepted by [`parse_diff`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOperation {
    Add,
    Change,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub operation: DiffOperation,
    pub path: Vec<String>,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Compute the diff between two essences
///
/// Objects are compared key by key; any other differing values (scalars,
/// arrays, type mismatches) produce a single `change` entry.
#[must_use]
pub fn compute_diff(old: &Value, new: &Value) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    diff_into(&mut path, old, new, &mut entries);
    entries
}

fn diff_into(path: &mut Vec<String>, old: &Value, new: &Value, out: &mut Vec<DiffEntry>) {
    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_value) in old_map {
                path.push(key.clone());
                match new_map.get(key) {
                    Some(new_value) => diff_into(path, old_value, new_value, out),
                    None => out.push(DiffEntry {
                        operation: DiffOperation::Remove,
                        path: path.clone(),
                        old: Some(old_value.clone()),
                        new: None,
                    }),
                }
                path.pop();
            }
            for (key, new_value) in new_map {
                if !old_map.contains_key(key) {
                    let mut added = path.clone();
                    added.push(key.clone());
                    out.push(DiffEntry {
                        operation: DiffOperation::Add,
                        path: added,
                        old: None,
                        new: Some(new_value.clone()),
                    });
                }
            }
        }
        _ if old != new => out.push(DiffEntry {
            operation: DiffOperation::Change,
            path: path.clone(),
            old: Some(old.clone()),
            new: Some(new.clone()),
        }),
        _ => {}
    }
}

/// True iff some entry changes a field whose path ends in `type`
#[must_use]
pub fn type_changed(diff: &[DiffEntry]) -> bool {
    diff.iter().any(|entry| {
        entry.operation == DiffOperation::Change
            && entry.path.last().is_some_and(|key| key == "type")
    })
}

/// Parse a wire diff, skipping entries that do not have the expected shape
#[must_use]
pub fn parse_diff(value: &Value) -> Vec<DiffEntry> {
    value
        .as_array()
        .map(|entries| entries.iter().filter_map(parse_entry).collect())
        .unwrap_or_default()
}

fn parse_entry(entry: &Value) -> Option<DiffEntry> {
    let items = entry.as_array()?;
    let operation = match items.first()?.as_str()? {
        "add" => DiffOperation::Add,
        "change" => DiffOperation::Change,
        "remove" => DiffOperation::Remove,
        _ => return None,
    };
    let path = items
        .get(1)?
        .as_array()?
        .iter()
        .map(|segment| segment.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    Some(DiffEntry {
        operation,
        path,
        old: items.get(2).filter(|v| !v.is_null()).cloned(),
        new: items.get(3).filter(|v| !v.is_null()).cloned(),
    })
}
