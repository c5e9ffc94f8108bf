//! # Ingress Fan-out
//!
//! Derives one UptimeRobotMonitor per eligible Ingress host rule.
//!
//! A rule is eligible when it has a host that is not a wildcard (`*.foo.com`).
//! The monitor for the eligible rule at position `i` is named `{ingress}-{i}`
//! and owned by the Ingress, so Kubernetes garbage collects it together with
//! its parent.
//!
//! When the rule list changes, children below the previous eligible count are
//! updated in place (unconditionally), children above it are created and
//! children between the new and the previous count are deleted.

mod annotations;
mod children;

pub use annotations::{monitor_annotations, AnnotationSchema};
pub use children::{KubeMonitorStore, MonitorStore, SyncError};

use crate::crd::{MonitorType, UptimeRobotMonitor, UptimeRobotMonitorSpec};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// The parts of an Ingress the fan-out depends on
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub namespace: String,
    /// Host of every rule, in rule order
    pub hosts: Vec<Option<String>>,
    /// Monitor overrides keyed by spec property name
    pub monitor_annotations: BTreeMap<String, String>,
    pub owner: Option<OwnerReference>,
}

impl Route {
    #[must_use]
    pub fn from_ingress(ingress: &Ingress) -> Self {
        let hosts = ingress
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.as_ref())
            .map(|rules| rules.iter().map(|rule| rule.host.clone()).collect())
            .unwrap_or_default();

        Self {
            name: ingress.name_any(),
            namespace: ingress.namespace().unwrap_or_default(),
            hosts,
            monitor_annotations: monitor_annotations(ingress.annotations()),
            owner: ingress.controller_owner_ref(&()),
        }
    }

    /// Hosts of the eligible rules, in rule order
    #[must_use]
    pub fn eligible_hosts(&self) -> Vec<&str> {
        eligible(self.hosts.iter().map(Option::as_deref))
    }

    /// Essence recorded as last handled configuration
    #[must_use]
    pub fn essence(&self) -> Value {
        let rules: Vec<Value> = self.hosts.iter().map(|host| json!({ "host": host })).collect();
        json!({
            "spec": { "rules": rules },
            "annotations": self.monitor_annotations,
        })
    }

    /// Number of eligible rules recorded in a previously handled essence
    #[must_use]
    pub fn eligible_count_of(essence: &Value) -> usize {
        let rules = essence
            .pointer("/spec/rules")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        eligible(rules.iter().map(|rule| rule.get("host").and_then(Value::as_str))).len()
    }
}

fn eligible<'a>(hosts: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    hosts
        .flatten()
        .filter(|host| !host.is_empty() && !host.starts_with('*'))
        .collect()
}

/// Name of the child monitor for the eligible rule at `index`
#[must_use]
pub fn child_name(route_name: &str, index: usize) -> String {
    format!("{route_name}-{index}")
}

/// URL monitored for `host`, derived from the monitor type
#[must_use]
pub fn monitor_url(host: &str, monitor_type: MonitorType) -> String {
    match monitor_type {
        MonitorType::Http => format!("http://{host}"),
        MonitorType::Https => format!("https://{host}"),
        _ => host.to_string(),
    }
}

/// Names of the children touched by one synchronization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

/// Keeps the children of Ingresses in line with their host rules
#[derive(Clone)]
pub struct RouteSynchronizer {
    store: Arc<dyn MonitorStore>,
    schema: AnnotationSchema,
    enabled: bool,
}

impl std::fmt::Debug for RouteSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteSynchronizer")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl RouteSynchronizer {
    #[must_use]
    pub fn new(store: Arc<dyn MonitorStore>, enabled: bool) -> Self {
        Self {
            store,
            schema: AnnotationSchema::for_monitor(),
            enabled,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Derive the child monitors for every eligible rule
    ///
    /// # Errors
    ///
    /// Fails when the annotation overrides do not form a valid monitor spec.
    pub fn build_children(&self, route: &Route) -> Result<Vec<UptimeRobotMonitor>, SyncError> {
        let seed = self.schema.seed_spec(&route.monitor_annotations);

        route
            .eligible_hosts()
            .into_iter()
            .enumerate()
            .map(|(index, host)| {
                let spec = derive_monitor_spec(host, &seed)?;
                Ok(UptimeRobotMonitor {
                    metadata: ObjectMeta {
                        name: Some(child_name(&route.name, index)),
                        namespace: Some(route.namespace.clone()),
                        owner_references: route.owner.clone().map(|owner| vec![owner]),
                        ..ObjectMeta::default()
                    },
                    spec,
                    status: None,
                })
            })
            .collect()
    }

    /// Create a child for every eligible rule of a new Ingress
    ///
    /// # Errors
    ///
    /// Fails when a child spec is invalid or a child cannot be written.
    pub async fn on_create(&self, route: &Route) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        if !self.enabled {
            info!("handling of Ingress resources has been disabled");
            return Ok(report);
        }

        for child in self.build_children(route)? {
            self.store.create(&child).await?;
            info!(
                resource.name = %child.name_any(),
                "created new UptimeRobotMonitor object for URL {}",
                child.spec.url
            );
            report.created.push(child.name_any());
        }
        Ok(report)
    }

    /// Bring the children of a changed Ingress in line with its rules
    ///
    /// `previous_count` is the number of eligible rules when the Ingress was
    /// last handled.
    ///
    /// # Errors
    ///
    /// Fails when a child spec is invalid or a child cannot be written.
    pub async fn on_update(
        &self,
        route: &Route,
        previous_count: usize,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        if !self.enabled {
            info!("handling of Ingress resources has been disabled");
            return Ok(report);
        }

        let children = self.build_children(route)?;
        let current_count = children.len();

        for (index, child) in children.iter().enumerate() {
            if index >= previous_count {
                self.store.create(child).await?;
                info!(
                    resource.name = %child.name_any(),
                    "created new UptimeRobotMonitor object for URL {}",
                    child.spec.url
                );
                report.created.push(child.name_any());
            } else {
                self.store.update(child).await?;
                info!(
                    resource.name = %child.name_any(),
                    "updated UptimeRobotMonitor object for URL {}",
                    child.spec.url
                );
                report.updated.push(child.name_any());
            }
        }

        for index in current_count..previous_count {
            let name = child_name(&route.name, index);
            self.store.delete(&route.namespace, &name).await?;
            info!(resource.name = %name, "deleted obsolete UptimeRobotMonitor object");
            report.deleted.push(name);
        }

        Ok(report)
    }
}

/// Monitor spec for `host`: the seed, `type` defaulting to `PING`, and the derived URL
///
/// # Errors
///
/// Fails when the seed contains values the monitor spec does not accept.
pub fn derive_monitor_spec(
    host: &str,
    seed: &serde_json::Map<String, Value>,
) -> Result<UptimeRobotMonitorSpec, SyncError> {
    let mut fields = seed.clone();
    fields
        .entry("type".to_string())
        .or_insert_with(|| Value::String(MonitorType::Ping.as_str().to_string()));
    fields.insert("url".to_string(), Value::String(host.to_string()));

    let mut spec: UptimeRobotMonitorSpec =
        serde_json::from_value(Value::Object(fields)).map_err(|source| {
            SyncError::InvalidMonitorSpec {
                host: host.to_string(),
                source,
            }
        })?;
    spec.url = monitor_url(host, spec.r#type);
    Ok(spec)
}
