//! # Error Policy
//!
//! Requeue decisions for failed reconciliations.
//!
//! Only transient failures reach this layer; permanent ones are reported in
//! the resource status and wait for the next change. Each object backs off
//! on its own Fibonacci sequence, reset by the next successful run.

use crate::controller::backoff::BackoffRegistry;
use crate::controller::ingress::SyncError;
use crate::observability::metrics;
use crate::runtime::dispatch::{backoff_key, Context, DispatchError, IngressContext, ManagedResource};
use crate::mapper::ExternalSpec;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use kube_runtime::finalizer::Error as FinalizerError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Handle a failed reconciliation of a declarative resource
pub fn handle_reconciliation_error<K: ManagedResource>(
    obj: Arc<K>,
    error: &DispatchError,
    ctx: Arc<Context<K>>,
) -> Action {
    let kind = K::Spec::KIND.resource_kind();
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.reconciliation_error",
        resource.kind = kind,
        resource.name = %name,
        resource.namespace = %namespace,
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {:?}", name, error);
    metrics::increment_reconciliation_errors(kind, error_class(error));

    requeue(
        &ctx.backoff,
        &backoff_key(kind, &namespace, &name),
        ctx.error_requeue,
    )
}

/// Handle a failed reconciliation of an Ingress
pub fn handle_ingress_error(
    ingress: Arc<Ingress>,
    error: &SyncError,
    ctx: Arc<IngressContext>,
) -> Action {
    let name = ingress.name_any();
    let namespace = ingress.namespace().unwrap_or_default();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.reconciliation_error",
        resource.kind = "Ingress",
        resource.name = %name,
        resource.namespace = %namespace,
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {:?}", name, error);
    metrics::increment_reconciliation_errors("Ingress", "transient");

    requeue(
        &ctx.backoff,
        &backoff_key("Ingress", &namespace, &name),
        ctx.error_requeue,
    )
}

fn error_class(error: &DispatchError) -> &'static str {
    match error {
        FinalizerError::ApplyFailed(err) | FinalizerError::CleanupFailed(err) => err.class(),
        _ => "transient",
    }
}

fn requeue(backoff: &BackoffRegistry, key: &str, fallback: Duration) -> Action {
    let delay = backoff.next_backoff(key).unwrap_or_else(|| {
        warn!(
            "Failed to lock backoff state, requeueing {} after {}s",
            key,
            fallback.as_secs()
        );
        fallback
    });

    let next_trigger_time = chrono::Utc::now()
        + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
    info!(
        "Retrying with Fibonacci backoff: {}s, next attempt at {}",
        delay.as_secs(),
        next_trigger_time.to_rfc3339()
    );

    Action::requeue(delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::reconciler::ReconcilerError;
    use crate::crd::ObjectKind;
    use crate::mapper::MappingError;

    #[test]
    fn test_requeue_follows_fibonacci_per_key() {
        let registry = BackoffRegistry::new(1, 10);
        let fallback = Duration::from_secs(5);
        assert_eq!(
            requeue(&registry, "a", fallback),
            Action::requeue(Duration::from_secs(60))
        );
        assert_eq!(
            requeue(&registry, "a", fallback),
            Action::requeue(Duration::from_secs(60))
        );
        assert_eq!(
            requeue(&registry, "a", fallback),
            Action::requeue(Duration::from_secs(120))
        );
        assert_eq!(
            requeue(&registry, "b", fallback),
            Action::requeue(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_error_class_unwraps_handler_errors() {
        let err = DispatchError::ApplyFailed(ReconcilerError::Mapping {
            kind: ObjectKind::Monitor,
            source: MappingError::NotAnObject,
        });
        assert_eq!(error_class(&err), "permanent");
        assert_eq!(error_class(&DispatchError::UnnamedObject), "transient");
    }
}
