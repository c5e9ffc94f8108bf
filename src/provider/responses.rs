//! # Response Types
//!
//! UptimeRobot API v2 response envelope.
//!
//! Every method answers with `{"stat": "ok" | "fail", ...}`. Successful
//! object calls carry the object under a kind specific key
//! (`{"stat": "ok", "monitor": {"id": 777}}`), failures carry an `error`
//! object with at least a `type`.

use crate::crd::ObjectKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error `type` reported for objects that do not exist
pub const NOT_FOUND: &str = "not_found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Ok,
    Fail,
}

/// Response envelope of any API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub stat: Stat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    /// Remaining payload, e.g. `monitor` or `account`
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Error payload of a failed call, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ApiResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.stat == Stat::Ok
    }

    /// Identifier of the object returned for `kind`, as a string
    #[must_use]
    pub fn identifier(&self, kind: ObjectKind) -> Option<String> {
        match self.payload.get(kind.payload_key())?.get("id")? {
            Value::Number(id) => Some(id.to_string()),
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            _ => None,
        }
    }

    /// Error payload of a failed call, or an empty one if the service sent none
    #[must_use]
    pub fn error_or_default(&self) -> ApiError {
        self.error.clone().unwrap_or_else(|| ApiError {
            error_type: None,
            message: None,
            details: Map::new(),
        })
    }

    /// Whether the call failed because the object does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error.as_ref().is_some_and(ApiError::is_not_found)
    }
}

impl ApiError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some(NOT_FOUND)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(raw) => f.write_str(&raw),
            Err(_) => write!(f, "{:?}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_from_numeric_id() {
        let response: ApiResponse =
            serde_json::from_value(json!({"stat": "ok", "monitor": {"id": 777, "status": 1}}))
                .unwrap();
        assert!(response.is_ok());
        assert_eq!(response.identifier(ObjectKind::Monitor), Some("777".to_string()));
        assert_eq!(response.identifier(ObjectKind::StatusPage), None);
    }

    #[test]
    fn test_identifier_from_string_id() {
        let response: ApiResponse =
            serde_json::from_value(json!({"stat": "ok", "alertcontact": {"id": "0993765"}}))
                .unwrap();
        assert_eq!(
            response.identifier(ObjectKind::AlertContact),
            Some("0993765".to_string())
        );
    }

    #[test]
    fn test_not_found_error() {
        let response: ApiResponse = serde_json::from_value(json!({
            "stat": "fail",
            "error": {"type": "not_found", "parameter_name": "id", "passed_value": "1", "message": "monitor not found."}
        }))
        .unwrap();
        assert!(!response.is_ok());
        assert!(response.is_not_found());
    }

    #[test]
    fn test_error_display_is_verbatim_payload() {
        let error: ApiError = serde_json::from_value(json!({
            "type": "invalid_parameter",
            "parameter_name": "type",
            "message": "type parameter is wrong."
        }))
        .unwrap();
        let rendered: serde_json::Value = serde_json::from_str(&error.to_string()).unwrap();
        assert_eq!(
            rendered,
            json!({
                "type": "invalid_parameter",
                "parameter_name": "type",
                "message": "type parameter is wrong."
            })
        );
    }
}
