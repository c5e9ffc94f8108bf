//! # Monitor Annotations
//!
//! Ingress annotations under `uroperator.brennerm.github.io/monitor.` seed
//! the spec of every monitor derived from that Ingress. The annotation value
//! is typed according to the matching property of the UptimeRobotMonitor
//! schema; annotations naming unknown properties are ignored.

use crate::config::parse_bool_flag;
use crate::constants::MONITOR_ANNOTATION_PREFIX;
use crate::crd::schema::spec_property_types;
use crate::crd::UptimeRobotMonitor;
use kube::CustomResourceExt;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Annotations carrying monitor overrides, keyed by spec property name
#[must_use]
pub fn monitor_annotations(annotations: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    annotations
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(MONITOR_ANNOTATION_PREFIX)
                .filter(|property| !property.is_empty())
                .map(|property| (property.to_string(), value.clone()))
        })
        .collect()
}

/// Property types of the monitor spec used to type annotation values
#[derive(Debug, Clone)]
pub struct AnnotationSchema {
    types: BTreeMap<String, String>,
}

impl AnnotationSchema {
    #[must_use]
    pub fn new(types: BTreeMap<String, String>) -> Self {
        Self { types }
    }

    /// Schema derived from the generated UptimeRobotMonitor CRD
    #[must_use]
    pub fn for_monitor() -> Self {
        Self::new(spec_property_types(&UptimeRobotMonitor::crd()))
    }

    /// Build a partial monitor spec from override annotations
    ///
    /// Values that cannot be parsed as their declared type are skipped.
    #[must_use]
    pub fn seed_spec(&self, overrides: &BTreeMap<String, String>) -> Map<String, Value> {
        let mut seed = Map::new();
        for (property, raw) in overrides {
            let Some(ty) = self.types.get(property) else {
                continue;
            };
            match parse_typed(ty, raw) {
                Ok(value) => {
                    seed.insert(property.clone(), value);
                }
                Err(reason) => warn!(
                    annotation = %format!("{MONITOR_ANNOTATION_PREFIX}{property}"),
                    "Ignoring monitor annotation with invalid {ty} value: {reason}"
                ),
            }
        }
        seed
    }
}

fn parse_typed(ty: &str, raw: &str) -> Result<Value, String> {
    match ty {
        "integer" => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| e.to_string()),
        "object" => serde_json::from_str::<Value>(raw).map_err(|e| e.to_string()),
        "boolean" => match raw.trim().to_lowercase().as_str() {
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            value if parse_bool_flag(value) => Ok(Value::Bool(true)),
            _ => Err(format!("'{raw}' is not a boolean")),
        },
        _ => Ok(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_monitor_annotations_strip_prefix() {
        let filtered = monitor_annotations(&annotations(&[
            ("uroperator.brennerm.github.io/monitor.interval", "600"),
            ("uroperator.brennerm.github.io/monitor.", "empty"),
            ("uroperator.brennerm.github.io/last-handled-configuration", "{}"),
            ("kubernetes.io/ingress.class", "nginx"),
        ]));
        assert_eq!(filtered, annotations(&[("interval", "600")]));
    }

    #[test]
    fn test_seed_spec_types_values() {
        let schema = AnnotationSchema::for_monitor();
        let seed = schema.seed_spec(&annotations(&[
            ("interval", "600"),
            ("type", "HTTPS"),
            ("customHttpHeaders", r#"{"X-Check": "1"}"#),
            ("ignoreSslErrors", "true"),
        ]));
        assert_eq!(seed.get("interval"), Some(&json!(600)));
        assert_eq!(seed.get("type"), Some(&json!("HTTPS")));
        assert_eq!(seed.get("customHttpHeaders"), Some(&json!({"X-Check": "1"})));
        assert_eq!(seed.get("ignoreSslErrors"), Some(&json!(true)));
    }

    #[test]
    fn test_seed_spec_ignores_unknown_and_invalid() {
        let schema = AnnotationSchema::for_monitor();
        let seed = schema.seed_spec(&annotations(&[
            ("notAField", "x"),
            ("port", "eighty"),
            ("ignoreSslErrors", "sometimes"),
            ("postValue", "{broken"),
        ]));
        assert!(seed.is_empty());
    }
}
