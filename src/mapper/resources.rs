use super::{ExternalSpec, Parameters};
use crate::crd::{
    AlertContactSpec, AlertContactType, MaintenanceWindowSpec, ObjectKind, PublicStatusPageSpec,
    UptimeRobotMonitorSpec,
};
use serde_json::Value;

impl ExternalSpec for UptimeRobotMonitorSpec {
    const KIND: ObjectKind = ObjectKind::Monitor;

    fn enum_codes(&self) -> Vec<(&'static str, i64)> {
        let optional = [
            ("sub_type", self.sub_type.map(|v| v.code())),
            ("keyword_type", self.keyword_type.map(|v| v.code())),
            ("http_auth_type", self.http_auth_type.map(|v| v.code())),
            ("http_method", self.http_method.map(|v| v.code())),
            ("post_type", self.post_type.map(|v| v.code())),
            ("post_content_type", self.post_content_type.map(|v| v.code())),
        ];
        std::iter::once(("type", self.r#type.code()))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(key, code)| code.map(|code| (key, code))),
            )
            .collect()
    }
}

impl ExternalSpec for AlertContactSpec {
    const KIND: ObjectKind = ObjectKind::AlertContact;

    fn enum_codes(&self) -> Vec<(&'static str, i64)> {
        vec![("type", self.r#type.code())]
    }

    // Only web hook contacts can be edited; every other type is recreated
    fn supports_in_place_edit(&self) -> bool {
        self.r#type == AlertContactType::WebHook
    }
}

impl ExternalSpec for MaintenanceWindowSpec {
    const KIND: ObjectKind = ObjectKind::MaintenanceWindow;

    fn enum_codes(&self) -> Vec<(&'static str, i64)> {
        vec![("type", self.r#type.code())]
    }

    fn apply_defaults(&self, parameters: &mut Parameters) {
        parameters
            .entry("value".to_string())
            .or_insert_with(|| Value::String(String::new()));
    }
}

impl ExternalSpec for PublicStatusPageSpec {
    const KIND: ObjectKind = ObjectKind::StatusPage;

    fn enum_codes(&self) -> Vec<(&'static str, i64)> {
        [
            ("sort", self.sort.map(|v| v.code())),
            ("status", self.status.map(|v| v.code())),
        ]
        .into_iter()
        .filter_map(|(key, code)| code.map(|code| (key, code)))
        .collect()
    }

    fn password_secret(&self) -> Option<&str> {
        self.password_secret.as_deref()
    }
}
