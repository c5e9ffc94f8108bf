//! # PublicStatusPage
//!
//! Declarative UptimeRobot public status page.

use crate::crd::codes::{StatusPageSort, StatusPageStatus};
use serde::{Deserialize, Serialize};

/// PublicStatusPage Custom Resource Definition
///
/// The password can be given inline (deprecated) or through `passwordSecret`,
/// the name of a Secret in the same namespace whose `password` key is used.
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "PublicStatusPage",
    group = "uroperator.brennerm.github.io",
    version = "v1beta1",
    plural = "publicstatuspages",
    namespaced,
    status = "crate::crd::ResourceStatus",
    shortname = "psp",
    printcolumn = r#"{"name":"ID", "type":"string", "jsonPath":".status.binding.id"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPageSpec {
    /// the list of monitor IDs to be displayed in status page (the values are seperated with "-" or 0 for all monitors)
    pub monitors: String,
    /// Friendly name of public status page, defaults to name of PublicStatusPage object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// the domain or subdomain that the status page will run on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    /// the password for the status page, deprecated: use passwordSecret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// reference to a Kubernetes secret in the same namespace containing the password for the status page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_secret: Option<String>,
    /// the sorting of the monitors on the status page, one of: FRIENDLY_NAME_A_Z,FRIENDLY_NAME_Z_A,STATUS_UP_DOWN_PAUSED,STATUS_DOWN_UP_PAUSED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<StatusPageSort>,
    /// the status of the status page, one of: PAUSED,ACTIVE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusPageStatus>,
    /// Flag to remove the UptimeRobot link from the status page (pro plan feature)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_url_links: Option<bool>,
}
