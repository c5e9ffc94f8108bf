//! # MaintenanceWindow
//!
//! Declarative UptimeRobot maintenance window.

use crate::crd::codes::MaintenanceWindowType;
use serde::{Deserialize, Serialize};

/// MaintenanceWindow Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: uroperator.brennerm.github.io/v1beta1
/// kind: MaintenanceWindow
/// metadata:
///   name: weekly-patching
/// spec:
///   type: WEEKLY
///   value: 2-4
///   startTime: "02:00"
///   duration: 3600
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "MaintenanceWindow",
    group = "uroperator.brennerm.github.io",
    version = "v1beta1",
    plural = "maintenancewindows",
    namespaced,
    status = "crate::crd::ResourceStatus",
    shortname = "mw",
    printcolumn = r#"{"name":"ID", "type":"string", "jsonPath":".status.binding.id"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindowSpec {
    /// the type of maintenance window, one of: ONCE,DAILY,WEEKLY,MONTHLY
    pub r#type: MaintenanceWindowType,
    /// the start time of the maintenance window, in seconds since epoch for type ONCE, in HH:mm format for the other types
    pub start_time: String,
    /// the number of seconds the maintenance window will be active
    pub duration: u64,
    /// friendly name of the maintenance window, defaults to name of the MaintenanceWindow object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// allows to specify the maintenance window selection, e.g. 2-4-5 for Tuesday-Thursday-Friday or 10-17-26 for the days of the month, only valid and required for WEEKLY and MONTHLY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}
