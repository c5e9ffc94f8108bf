//! # Resource Reconciler
//!
//! Translates the lifecycle events of one resource kind into UptimeRobot calls.
//!
//! ```text
//! Absent --create--> Present(id) --update--> Present(id') ... --delete--> Absent
//! ```
//!
//! - **Create**: map the spec, create the external object, return its ID
//! - **Update**: edit in place, or delete and recreate when the type changed
//!   (or the kind cannot be edited in its current type)
//! - **Delete**: delete the external object; a missing object counts as deleted
//!
//! The reconciler never writes to Kubernetes. Its outcome is persisted into
//! the resource status by the dispatcher in `runtime::dispatch`.

mod handlers;
mod types;

pub use types::{HandlerOutcome, Operation, ReconcilerError};

use crate::controller::secrets::SecretResolver;
use crate::mapper::ExternalSpec;
use crate::provider::MonitoringService;
use std::marker::PhantomData;
use std::sync::Arc;

/// Reconciler for resources whose spec is `S`
pub struct ResourceReconciler<S: ExternalSpec> {
    service: Arc<dyn MonitoringService>,
    secrets: Arc<dyn SecretResolver>,
    _spec: PhantomData<fn() -> S>,
}

impl<S: ExternalSpec> ResourceReconciler<S> {
    #[must_use]
    pub fn new(service: Arc<dyn MonitoringService>, secrets: Arc<dyn SecretResolver>) -> Self {
        Self {
            service,
            secrets,
            _spec: PhantomData,
        }
    }
}

impl<S: ExternalSpec> Clone for ResourceReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            secrets: Arc::clone(&self.secrets),
            _spec: PhantomData,
        }
    }
}

impl<S: ExternalSpec> std::fmt::Debug for ResourceReconciler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceReconciler")
            .field("kind", &S::KIND)
            .finish_non_exhaustive()
    }
}
