//! # External Identifier Lookup
//!
//! Finds the UptimeRobot identifier owned by a resource. The typed binding is
//! authoritative; resources last handled by the previous operator generation
//! only carry handler-namespaced entries, where the update entry wins over
//! the create entry.

use crate::crd::{ObjectKind, ResourceStatus};
use serde_json::Value;
use thiserror::Error;

/// Status entry written by the create handler of the previous generation
pub const ON_CREATE: &str = "on_create";

/// Status entry written by the update handler of the previous generation
pub const ON_UPDATE: &str = "on_update";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status has neither a binding nor a {key} entry")]
pub struct IdentifierError {
    pub key: &'static str,
}

/// Resolve the external identifier recorded in a status
///
/// # Errors
///
/// Fails when neither the binding nor any legacy handler entry holds an identifier.
pub fn get_identifier(status: &ResourceStatus, kind: ObjectKind) -> Result<String, IdentifierError> {
    if let Some(binding) = &status.binding {
        return Ok(binding.id.clone());
    }

    [ON_UPDATE, ON_CREATE]
        .iter()
        .find_map(|handler| {
            status
                .handlers
                .get(*handler)
                .and_then(|entry| entry.get(kind.identifier_key()))
                .and_then(identifier_from_value)
        })
        .ok_or(IdentifierError {
            key: kind.identifier_key(),
        })
}

fn identifier_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
