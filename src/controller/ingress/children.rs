//! # Child Monitor Store
//!
//! Writes the UptimeRobotMonitor resources derived from Ingresses.

use crate::constants::FIELD_MANAGER;
use crate::crd::UptimeRobotMonitor;
use async_trait::async_trait;
use kube::api::{DeleteParams, Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to derive monitor spec for host {host}: {source}")]
    InvalidMonitorSpec {
        host: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to {action} UptimeRobotMonitor {namespace}/{name}: {source}")]
    Kube {
        action: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("failed to record handled configuration on Ingress {namespace}/{name}: {source}")]
    Annotate {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

impl SyncError {
    /// Invalid annotation overrides will not fix themselves
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, SyncError::InvalidMonitorSpec { .. })
    }
}

/// Storage of child monitors
#[async_trait]
pub trait MonitorStore: Send + Sync {
    /// Create a child; an already existing child is updated instead
    async fn create(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError>;

    /// Replace the spec of an existing child
    async fn update(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError>;

    /// Delete a child; a missing child counts as deleted
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), SyncError>;
}

/// Monitor store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeMonitorStore {
    client: Client,
}

impl KubeMonitorStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<UptimeRobotMonitor> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeMonitorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeMonitorStore").finish_non_exhaustive()
    }
}

fn kube_error(action: &'static str, monitor: &UptimeRobotMonitor, source: kube::Error) -> SyncError {
    SyncError::Kube {
        action,
        namespace: monitor.namespace().unwrap_or_default(),
        name: monitor.name_any(),
        source,
    }
}

#[async_trait]
impl MonitorStore for KubeMonitorStore {
    async fn create(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError> {
        let namespace = monitor.namespace().unwrap_or_default();
        match self
            .api(&namespace)
            .create(&PostParams::default(), monitor)
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                debug!(
                    resource.name = %monitor.name_any(),
                    "UptimeRobotMonitor already exists, updating it instead"
                );
                self.update(monitor).await
            }
            Err(source) => Err(kube_error("create", monitor, source)),
        }
    }

    async fn update(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError> {
        let namespace = monitor.namespace().unwrap_or_default();
        let name = monitor.name_any();
        // Server-side apply so annotation overrides removed from the Ingress disappear
        self.api(&namespace)
            .patch(
                &name,
                &PatchParams::apply(FIELD_MANAGER).force(),
                &Patch::Apply(monitor),
            )
            .await
            .map(|_| ())
            .map_err(|source| kube_error("update", monitor, source))
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), SyncError> {
        match self.api(namespace).delete(name, &DeleteParams::default()).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                info!(resource.name = name, "UptimeRobotMonitor already gone");
                Ok(())
            }
            Err(source) => Err(SyncError::Kube {
                action: "delete",
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            }),
        }
    }
}
