//! # AlertContact
//!
//! Declarative UptimeRobot alert contact.

use crate::crd::codes::AlertContactType;
use serde::{Deserialize, Serialize};

/// AlertContact Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: uroperator.brennerm.github.io/v1beta1
/// kind: AlertContact
/// metadata:
///   name: ops-mail
/// spec:
///   type: EMAIL
///   value: ops@example.com
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "AlertContact",
    group = "uroperator.brennerm.github.io",
    version = "v1beta1",
    plural = "alertcontacts",
    namespaced,
    status = "crate::crd::ResourceStatus",
    shortname = "ac",
    printcolumn = r#"{"name":"ID", "type":"string", "jsonPath":".status.binding.id"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AlertContactSpec {
    /// the type of alert contact, one of: SMS,EMAIL,TWITTER_DM,BOXCAR,WEB_HOOK,PUSHBULLET,ZAPIER,PUSHOVER,HIPCHAT,SLACK
    pub r#type: AlertContactType,
    /// the alert contact's mail address / phone number / URL / connection string
    pub value: String,
    /// friendly name of the alert contact, defaults to name of the AlertContact object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}
