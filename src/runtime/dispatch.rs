//! # Event Dispatch
//!
//! Turns controller events into handler calls and persists their outcome.
//!
//! The last handled essence of every object is kept in the
//! `uroperator.brennerm.github.io/last-handled-configuration` annotation.
//! Comparing it with the current essence decides whether an apply event is
//! a create, an update or nothing at all. Handler outcomes land in
//! `status.binding` and the `Ready` condition.

use crate::constants::{FINALIZER, LAST_HANDLED_ANNOTATION};
use crate::controller::backoff::BackoffRegistry;
use crate::controller::diff::{compute_diff, DiffEntry};
use crate::controller::identifier::get_identifier;
use crate::controller::ingress::{Route, RouteSynchronizer, SyncError, SyncReport};
use crate::controller::reconciler::{HandlerOutcome, Operation, ReconcilerError, ResourceReconciler};
use crate::crd::{
    AlertContact, Condition, ExternalBinding, MaintenanceWindow, PublicStatusPage,
    ResourceStatus, UptimeRobotMonitor,
};
use crate::mapper::{ExternalSpec, MappingError};
use crate::observability::metrics;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource, ResourceExt};
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{finalizer, Error as FinalizerError, Event as FinalizerEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Instrument};

/// Error surfaced to the controller for declarative resources
pub type DispatchError = FinalizerError<ReconcilerError>;

/// Custom resource mirrored by an UptimeRobot object
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
    type Spec: ExternalSpec;

    fn external_spec(&self) -> &Self::Spec;

    fn external_status(&self) -> Option<&ResourceStatus>;
}

macro_rules! managed_resource {
    ($($resource:ty => $spec:ty),+ $(,)?) => {
        $(
            impl ManagedResource for $resource {
                type Spec = $spec;

                fn external_spec(&self) -> &Self::Spec {
                    &self.spec
                }

                fn external_status(&self) -> Option<&ResourceStatus> {
                    self.status.as_ref()
                }
            }
        )+
    };
}

managed_resource!(
    UptimeRobotMonitor => crate::crd::UptimeRobotMonitorSpec,
    AlertContact => crate::crd::AlertContactSpec,
    MaintenanceWindow => crate::crd::MaintenanceWindowSpec,
    PublicStatusPage => crate::crd::PublicStatusPageSpec,
);

/// Shared state of the controller for one resource kind
pub struct Context<K: ManagedResource> {
    pub client: Client,
    pub reconciler: ResourceReconciler<K::Spec>,
    pub backoff: BackoffRegistry,
    /// Requeue interval used when no backoff can be computed
    pub error_requeue: Duration,
}

impl<K: ManagedResource> Debug for Context<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("kind", &K::Spec::KIND)
            .field("reconciler", &self.reconciler)
            .field("error_requeue", &self.error_requeue)
            .finish_non_exhaustive()
    }
}

/// What an apply event asks of the handlers
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Create,
    Update(Vec<DiffEntry>),
    Unchanged,
}

/// Decide how to handle an apply event
///
/// `previous` is the essence recorded when the object was last handled. An
/// object without an external identifier is created, even when an earlier
/// create was rejected and left its essence behind. Without the annotation
/// the essence stored in the binding stands in for it.
#[must_use]
pub fn plan_event<S: ExternalSpec>(
    previous: Option<&Value>,
    current: &Value,
    status: &ResourceStatus,
) -> Plan {
    if previous == Some(current) {
        return Plan::Unchanged;
    }

    if get_identifier(status, S::KIND).is_err() {
        return Plan::Create;
    }

    if let Some(previous) = previous {
        return Plan::Update(compute_diff(previous, current));
    }

    // Handled before, but the annotation was lost
    let Some(binding) = &status.binding else {
        return Plan::Update(Vec::new());
    };
    match binding.applied_essence() {
        Some(applied) if applied == *current => Plan::Unchanged,
        Some(applied) => Plan::Update(compute_diff(&applied, current)),
        None if binding.spec_hash == spec_hash(current) => Plan::Unchanged,
        None => Plan::Update(Vec::new()),
    }
}

/// Essence of a custom resource: its spec wrapped as `{"spec": ...}`
///
/// # Errors
///
/// Fails when the spec cannot be serialized.
pub fn essence<S: ExternalSpec>(spec: &S) -> Result<Value, serde_json::Error> {
    let spec = serde_json::to_value(spec)?;
    Ok(json!({ "spec": spec }))
}

/// Hex encoded SHA-256 of the compact JSON form of `essence`
#[must_use]
pub fn spec_hash(essence: &Value) -> String {
    let digest = Sha256::digest(essence.to_string().as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Essence recorded in the last handled annotation, if any
#[must_use]
pub fn last_handled(annotations: &BTreeMap<String, String>) -> Option<Value> {
    let raw = annotations.get(LAST_HANDLED_ANNOTATION)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unparsable {LAST_HANDLED_ANNOTATION} annotation: {e}");
            None
        }
    }
}

/// Backoff key of an object
#[must_use]
pub fn backoff_key(kind: &str, namespace: &str, name: &str) -> String {
    format!("{kind}/{namespace}/{name}")
}

/// Reconcile one declarative resource
///
/// # Errors
///
/// Returns transient handler failures and finalizer bookkeeping failures; the
/// error policy requeues those with backoff.
pub async fn reconcile<K: ManagedResource>(
    obj: Arc<K>,
    ctx: Arc<Context<K>>,
) -> Result<Action, DispatchError> {
    let kind = K::Spec::KIND.resource_kind();
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();
    let span = tracing::info_span!(
        "controller.reconcile",
        resource.kind = kind,
        resource.name = %name,
        resource.namespace = %namespace,
    );

    async move {
        let started = Instant::now();
        let api: Api<K> = Api::namespaced(ctx.client.clone(), &namespace);
        let result = finalizer(&api, FINALIZER, obj, |event| async {
            match event {
                FinalizerEvent::Apply(obj) => apply(&api, obj, &ctx).await,
                FinalizerEvent::Cleanup(obj) => cleanup(&api, obj, &ctx).await,
            }
        })
        .await;
        metrics::observe_reconciliation_duration(kind, started.elapsed().as_secs_f64());
        result
    }
    .instrument(span)
    .await
}

async fn apply<K: ManagedResource>(
    api: &Api<K>,
    obj: Arc<K>,
    ctx: &Context<K>,
) -> Result<Action, ReconcilerError> {
    let kind = K::Spec::KIND;
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();
    let key = backoff_key(kind.resource_kind(), &namespace, &name);
    let spec = obj.external_spec();

    let current = essence(spec).map_err(|source| ReconcilerError::Mapping {
        kind,
        source: MappingError::Serialize(source),
    })?;
    let previous = last_handled(obj.annotations());
    let status = obj.external_status().cloned().unwrap_or_default();

    let (operation, result) = match plan_event::<K::Spec>(previous.as_ref(), &current, &status) {
        Plan::Unchanged => {
            debug!("Essence unchanged since last handled, nothing to do");
            if previous.is_none() {
                record_handled(api, &name, &current).await?;
            }
            ctx.backoff.reset(&key);
            return Ok(Action::await_change());
        }
        Plan::Create => (
            Operation::Create,
            ctx.reconciler.on_create(&name, &namespace, spec).await,
        ),
        Plan::Update(diff) => (
            Operation::Update,
            ctx.reconciler
                .on_update(&name, &namespace, spec, &status, &diff)
                .await,
        ),
    };
    metrics::increment_reconciliations(kind.resource_kind(), operation.as_str());

    let generation = obj.meta().generation;
    match result {
        Ok(outcome) => {
            record_success(api, &name, kind, generation, &outcome, &current).await?;
        }
        Err(err) if err.is_permanent() => {
            error!("{operation} handler failed permanently: {err}");
            metrics::increment_reconciliation_errors(kind.resource_kind(), err.class());
            record_failure(api, &name, generation, &err).await?;
        }
        Err(err) => return Err(err),
    }

    record_handled(api, &name, &current).await?;
    ctx.backoff.reset(&key);
    Ok(Action::await_change())
}

async fn cleanup<K: ManagedResource>(
    api: &Api<K>,
    obj: Arc<K>,
    ctx: &Context<K>,
) -> Result<Action, ReconcilerError> {
    let kind = K::Spec::KIND;
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();
    let status = obj.external_status().cloned().unwrap_or_default();

    if let Some(err) = delete_external(&ctx.reconciler, &status).await {
        if let Err(patch_err) = record_failure(api, &name, obj.meta().generation, &err).await {
            warn!("Failed to report delete failure in status: {patch_err}");
        }
    }

    ctx.backoff
        .reset(&backoff_key(kind.resource_kind(), &namespace, &name));
    Ok(Action::await_change())
}

/// Run the delete handler for a resource that is going away
///
/// Deletion of the resource is never blocked by the external object: any
/// failure, transient or permanent, is logged, counted and handed back for
/// the status report while the finalizer is removed.
pub async fn delete_external<S: ExternalSpec>(
    reconciler: &ResourceReconciler<S>,
    status: &ResourceStatus,
) -> Option<ReconcilerError> {
    let kind = S::KIND.resource_kind();
    metrics::increment_reconciliations(kind, Operation::Delete.as_str());
    match reconciler.on_delete(status).await {
        Ok(()) => None,
        Err(err) => {
            error!("delete handler failed, removing finalizer anyway: {err}");
            metrics::increment_reconciliation_errors(kind, err.class());
            Some(err)
        }
    }
}

async fn record_success<K: ManagedResource>(
    api: &Api<K>,
    name: &str,
    kind: crate::crd::ObjectKind,
    generation: Option<i64>,
    outcome: &HandlerOutcome,
    applied: &Value,
) -> Result<(), ReconcilerError> {
    let binding = ExternalBinding {
        kind,
        id: outcome.identifier.clone(),
        spec_hash: spec_hash(applied),
        applied: Some(applied.to_string()),
    };
    let message = if outcome.recreated {
        format!("{kind} recreated with ID {}", outcome.identifier)
    } else {
        format!("{kind} with ID {} is in sync", outcome.identifier)
    };
    let patch = json!({
        "status": {
            "binding": binding,
            "conditions": [Condition::ready(true, "Reconciled", message)],
            "observedGeneration": generation,
        }
    });
    api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

async fn record_failure<K: ManagedResource>(
    api: &Api<K>,
    name: &str,
    generation: Option<i64>,
    err: &ReconcilerError,
) -> Result<(), ReconcilerError> {
    let patch = json!({
        "status": {
            "conditions": [Condition::ready(false, "PermanentFailure", err.to_string())],
            "observedGeneration": generation,
        }
    });
    api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

fn handled_patch(essence: &Value) -> Value {
    json!({
        "metadata": {
            "annotations": { LAST_HANDLED_ANNOTATION: essence.to_string() }
        }
    })
}

async fn record_handled<K: ManagedResource>(
    api: &Api<K>,
    name: &str,
    essence: &Value,
) -> Result<(), ReconcilerError> {
    api.patch(
        name,
        &PatchParams::default(),
        &Patch::Merge(&handled_patch(essence)),
    )
    .await?;
    Ok(())
}

/// Shared state of the Ingress controller
#[derive(Clone)]
pub struct IngressContext {
    pub client: Client,
    pub synchronizer: RouteSynchronizer,
    pub backoff: BackoffRegistry,
    pub error_requeue: Duration,
}

impl Debug for IngressContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngressContext")
            .field("synchronizer", &self.synchronizer)
            .field("error_requeue", &self.error_requeue)
            .finish_non_exhaustive()
    }
}

/// What an Ingress event asks of the route synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePlan {
    Create,
    Update { previous_count: usize },
    Unchanged,
}

#[must_use]
pub fn plan_route(previous: Option<&Value>, current: &Value) -> RoutePlan {
    match previous {
        None => RoutePlan::Create,
        Some(previous) if previous == current => RoutePlan::Unchanged,
        Some(previous) => RoutePlan::Update {
            previous_count: Route::eligible_count_of(previous),
        },
    }
}

/// Reconcile the child monitors of one Ingress
///
/// # Errors
///
/// Returns transient failures writing children or the annotation.
pub async fn reconcile_ingress(
    ingress: Arc<Ingress>,
    ctx: Arc<IngressContext>,
) -> Result<Action, SyncError> {
    let route = Route::from_ingress(&ingress);
    let span = tracing::info_span!(
        "controller.reconcile",
        resource.kind = "Ingress",
        resource.name = %route.name,
        resource.namespace = %route.namespace,
    );

    async move {
        let started = Instant::now();
        let result = sync_route(&ingress, &route, &ctx).await;
        metrics::observe_reconciliation_duration("Ingress", started.elapsed().as_secs_f64());
        result
    }
    .instrument(span)
    .await
}

async fn sync_route(
    ingress: &Ingress,
    route: &Route,
    ctx: &IngressContext,
) -> Result<Action, SyncError> {
    let key = backoff_key("Ingress", &route.namespace, &route.name);
    if release_deleting(ingress, &ctx.backoff, &key) {
        // Children go away through their owner references
        return Ok(Action::await_change());
    }

    let current = route.essence();
    let previous = last_handled(ingress.annotations());

    let (operation, result) = match plan_route(previous.as_ref(), &current) {
        RoutePlan::Unchanged => {
            debug!("Ingress unchanged since last handled, nothing to do");
            ctx.backoff.reset(&key);
            return Ok(Action::await_change());
        }
        RoutePlan::Create => (Operation::Create, ctx.synchronizer.on_create(route).await),
        RoutePlan::Update { previous_count } => (
            Operation::Update,
            ctx.synchronizer.on_update(route, previous_count).await,
        ),
    };
    metrics::increment_reconciliations("Ingress", operation.as_str());

    match result {
        Ok(report) => record_report(&report),
        Err(err) if err.is_permanent() => {
            error!("{operation} handler failed permanently: {err}");
            metrics::increment_reconciliation_errors("Ingress", "permanent");
        }
        Err(err) => return Err(err),
    }

    let api: Api<Ingress> = Api::namespaced(ctx.client.clone(), &route.namespace);
    api.patch(
        &route.name,
        &PatchParams::default(),
        &Patch::Merge(&handled_patch(&current)),
    )
    .await
    .map_err(|source| SyncError::Annotate {
        namespace: route.namespace.clone(),
        name: route.name.clone(),
        source,
    })?;

    ctx.backoff.reset(&key);
    Ok(Action::await_change())
}

/// Whether the Ingress is being deleted; drops its backoff state if so
fn release_deleting(ingress: &Ingress, backoff: &BackoffRegistry, key: &str) -> bool {
    if ingress.meta().deletion_timestamp.is_none() {
        return false;
    }
    backoff.reset(key);
    true
}

fn record_report(report: &SyncReport) {
    metrics::increment_route_children("created", report.created.len());
    metrics::increment_route_children("updated", report.updated.len());
    metrics::increment_route_children("deleted", report.deleted.len());
    if !report.created.is_empty() || !report.deleted.is_empty() {
        info!(
            created = report.created.len(),
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            "Child monitors synchronized"
        );
    }
}
