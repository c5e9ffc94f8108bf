//! # Custom Resource Definitions
//!
//! CRD types for the UptimeRobot operator.
//!
//! ## Module Structure
//!
//! - `monitor.rs` - `UptimeRobotMonitor`
//! - `alert_contact.rs` - `AlertContact`
//! - `maintenance_window.rs` - `MaintenanceWindow`
//! - `status_page.rs` - `PublicStatusPage`
//! - `status.rs` - Status shared by all kinds, including the external binding
//! - `codes.rs` - Enumerations and their UptimeRobot codes
//! - `kind.rs` - External object kinds and their API names
//! - `schema.rs` - Generated schema introspection

mod alert_contact;
mod codes;
mod kind;
mod maintenance_window;
mod monitor;
pub mod schema;
mod status;
mod status_page;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;
use schemars::{Schema, SchemaGenerator};

pub use alert_contact::{AlertContact, AlertContactSpec};
pub use codes::{
    AlertContactType, MaintenanceWindowType, MonitorHttpAuthType, MonitorHttpMethod,
    MonitorKeywordType, MonitorPostContentType, MonitorPostType, MonitorSubType, MonitorType,
    StatusPageSort, StatusPageStatus, UnknownVariant,
};
pub use kind::ObjectKind;
pub use maintenance_window::{MaintenanceWindow, MaintenanceWindowSpec};
pub use monitor::{UptimeRobotMonitor, UptimeRobotMonitorSpec};
pub use status::{Condition, ExternalBinding, ResourceStatus, READY_CONDITION};
pub use status_page::{PublicStatusPage, PublicStatusPageSpec};

/// All CRDs served by the operator, in registration order
#[must_use]
pub fn custom_resource_definitions() -> Vec<CustomResourceDefinition> {
    vec![
        UptimeRobotMonitor::crd(),
        AlertContact::crd(),
        MaintenanceWindow::crd(),
        PublicStatusPage::crd(),
    ]
}

/// Schema for free-form JSON objects (`postValue`, `customHttpHeaders`)
pub(crate) fn free_object_schema(_gen: &mut SchemaGenerator) -> Schema {
    let schema_value = serde_json::json!({
        "type": "object",
        "nullable": true,
        "x-kubernetes-preserve-unknown-fields": true
    });
    Schema::try_from(schema_value).expect("Failed to create Schema for free-form object")
}
