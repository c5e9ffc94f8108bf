//! # UptimeRobotMonitor
//!
//! Declarative UptimeRobot monitor.

use crate::crd::codes::{
    MonitorHttpAuthType, MonitorHttpMethod, MonitorKeywordType, MonitorPostContentType,
    MonitorPostType, MonitorSubType, MonitorType,
};
use crate::crd::free_object_schema;
use serde::{Deserialize, Serialize};

/// UptimeRobotMonitor Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: uroperator.brennerm.github.io/v1beta1
/// kind: UptimeRobotMonitor
/// metadata:
///   name: my-monitor
/// spec:
///   url: https://foo.com
///   type: HTTPS
///   interval: 600
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "UptimeRobotMonitor",
    group = "uroperator.brennerm.github.io",
    version = "v1beta1",
    plural = "uptimerobotmonitors",
    namespaced,
    status = "crate::crd::ResourceStatus",
    shortname = "urm",
    printcolumn = r#"{"name":"ID", "type":"string", "jsonPath":".status.binding.id"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct UptimeRobotMonitorSpec {
    /// Friendly name of monitor, defaults to name of UptimeRobotMonitor object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// URL that will be monitored
    pub url: String,
    /// Type of monitor, one of: HTTP_HTTPS,HTTP,HTTPS,KEYWORD,PING,PORT,HEARTBEAT
    pub r#type: MonitorType,
    /// Subtype of monitor, one of: HTTP,HTTPS,FTP,SMTP,POP3,IMAP,CUSTOM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<MonitorSubType>,
    /// Port to monitor when using monitor type PORT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    /// Keyword type when using monitor type KEYWORD, one of: EXISTS,NOT_EXISTS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_type: Option<MonitorKeywordType>,
    /// Keyword value when using monitor type KEYWORD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_value: Option<String>,
    /// The interval for the monitoring check (300 seconds by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(extend("multipleOf" = 60))]
    pub interval: Option<u32>,
    /// Used for password protected pages when using monitor type HTTP,HTTPS or KEYWORD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_username: Option<String>,
    /// Used for password protected pages when using monitor type HTTP,HTTPS or KEYWORD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_password: Option<String>,
    /// Used for password protected pages when using monitor type HTTP,HTTPS or KEYWORD, one of: BASIC_AUTH,DIGEST
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_auth_type: Option<MonitorHttpAuthType>,
    /// The HTTP method to be used, one of: HEAD,GET,POST,PUT,PATCH,DELETE,OPTIONS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<MonitorHttpMethod>,
    /// The format of data to be sent with POST, PUT, PATCH, DELETE, OPTIONS requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<MonitorPostType>,
    /// The Content-Type header to be sent with POST, PUT, PATCH, DELETE, OPTIONS requests, one of: TEXT_HTML,APPLICATION_JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content_type: Option<MonitorPostContentType>,
    /// The data to be sent with POST, PUT, PATCH, DELETE, OPTIONS requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "free_object_schema")]
    pub post_value: Option<serde_json::Value>,
    /// Custom HTTP headers to be sent along monitor request, formatted as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "free_object_schema")]
    pub custom_http_headers: Option<serde_json::Value>,
    /// Allows to define HTTP status codes that will be handled as up or down, e.g. 404:0_200:1 to accept 404 as down and 200 as up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_http_statuses: Option<String>,
    /// Flag to ignore SSL certificate related issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_ssl_errors: Option<bool>,
    /// Alert contacts to be notified when monitor goes up or down. For syntax check https://uptimerobot.com/api/#newMonitorWrap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_contacts: Option<String>,
    /// Maintenance window IDs for this monitor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mwindows: Option<String>,
}

impl UptimeRobotMonitorSpec {
    /// Minimal spec with only the required fields set
    #[must_use]
    pub fn new(url: impl Into<String>, r#type: MonitorType) -> Self {
        Self {
            friendly_name: None,
            url: url.into(),
            r#type,
            sub_type: None,
            port: None,
            keyword_type: None,
            keyword_value: None,
            interval: None,
            http_username: None,
            http_password: None,
            http_auth_type: None,
            http_method: None,
            post_type: None,
            post_content_type: None,
            post_value: None,
            custom_http_headers: None,
            custom_http_statuses: None,
            ignore_ssl_errors: None,
            alert_contacts: None,
            mwindows: None,
        }
    }
}
