//! # Resource Status
//!
//! Status shared by all four custom resources.
//!
//! Besides the typed fields the status keeps any other top-level entries it
//! finds. Resources created by the previous operator generation carry their
//! identifier in handler-namespaced entries (`on_create`, `on_update`), which
//! must survive round trips through this type.

use crate::crd::ObjectKind;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Condition type reported on every resource
pub const READY_CONDITION: &str = "Ready";

/// Status of a declarative UptimeRobot resource
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    /// Binding to the external object owned by this resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<ExternalBinding>,
    /// Conditions represent the latest available observations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Generation last handled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    /// Untyped entries, including legacy handler results
    #[serde(flatten)]
    pub handlers: BTreeMap<String, serde_json::Value>,
}

/// Typed link between a resource and its external object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalBinding {
    pub kind: ObjectKind,
    /// Identifier assigned by UptimeRobot
    pub id: String,
    /// Hash of the essence last applied to the external object
    pub spec_hash: String,
    /// Compact JSON of the essence last applied to the external object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<String>,
}

impl ExternalBinding {
    /// Essence last applied, when recorded and readable
    #[must_use]
    pub fn applied_essence(&self) -> Option<serde_json::Value> {
        serde_json::from_str(self.applied.as_deref()?).ok()
    }
}

/// Status condition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// Build a `Ready` condition stamped with the current time
    #[must_use]
    pub fn ready(ready: bool, reason: &str, message: impl Into<String>) -> Self {
        Self {
            r#type: READY_CONDITION.to_string(),
            status: if ready { "True" } else { "False" }.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message: Some(message.into()),
        }
    }
}

impl ResourceStatus {
    /// The `Ready` condition, if one has been reported
    #[must_use]
    pub fn ready_condition(&self) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|condition| condition.r#type == READY_CONDITION)
    }
}

impl JsonSchema for ResourceStatus {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("ResourceStatus")
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        // Legacy handler entries have no fixed shape
        let schema_value = serde_json::json!({
            "type": "object",
            "description": "Reconciliation state of the resource and its binding to the UptimeRobot object",
            "x-kubernetes-preserve-unknown-fields": true
        });
        Schema::try_from(schema_value).expect("Failed to create Schema for ResourceStatus")
    }
}
