//! # Object Kinds
//!
//! The four UptimeRobot object kinds the operator manages, and how each one is
//! addressed on the UptimeRobot API.

use serde::{Deserialize, Serialize};

/// Kind of external UptimeRobot object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Monitor,
    AlertContact,
    MaintenanceWindow,
    StatusPage,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Monitor,
        ObjectKind::AlertContact,
        ObjectKind::MaintenanceWindow,
        ObjectKind::StatusPage,
    ];

    /// Suffix shared by the `new*`, `edit*` and `delete*` API methods
    #[must_use]
    pub const fn api_suffix(self) -> &'static str {
        match self {
            ObjectKind::Monitor => "Monitor",
            ObjectKind::AlertContact => "AlertContact",
            ObjectKind::MaintenanceWindow => "MWindow",
            ObjectKind::StatusPage => "PSP",
        }
    }

    #[must_use]
    pub fn create_method(self) -> String {
        format!("new{}", self.api_suffix())
    }

    #[must_use]
    pub fn edit_method(self) -> String {
        format!("edit{}", self.api_suffix())
    }

    #[must_use]
    pub fn delete_method(self) -> String {
        format!("delete{}", self.api_suffix())
    }

    /// Key of the object payload in a successful API response
    #[must_use]
    pub const fn payload_key(self) -> &'static str {
        match self {
            ObjectKind::Monitor => "monitor",
            ObjectKind::AlertContact => "alertcontact",
            ObjectKind::MaintenanceWindow => "mwindow",
            ObjectKind::StatusPage => "psp",
        }
    }

    /// Key under which handler-namespaced status entries store the identifier
    #[must_use]
    pub const fn identifier_key(self) -> &'static str {
        match self {
            ObjectKind::Monitor => "monitor_id",
            ObjectKind::AlertContact => "alert_contact_id",
            ObjectKind::MaintenanceWindow => "mwindow_id",
            ObjectKind::StatusPage => "psp_id",
        }
    }

    /// Kubernetes kind of the custom resource mirroring this object
    #[must_use]
    pub const fn resource_kind(self) -> &'static str {
        match self {
            ObjectKind::Monitor => "UptimeRobotMonitor",
            ObjectKind::AlertContact => "AlertContact",
            ObjectKind::MaintenanceWindow => "MaintenanceWindow",
            ObjectKind::StatusPage => "PublicStatusPage",
        }
    }

    /// The edit endpoint rejects `type` for these kinds
    #[must_use]
    pub const fn strips_type_on_update(self) -> bool {
        matches!(
            self,
            ObjectKind::AlertContact | ObjectKind::MaintenanceWindow
        )
    }

    /// Human readable label used in log messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ObjectKind::Monitor => "monitor",
            ObjectKind::AlertContact => "alert contact",
            ObjectKind::MaintenanceWindow => "maintenance window",
            ObjectKind::StatusPage => "public status page",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
