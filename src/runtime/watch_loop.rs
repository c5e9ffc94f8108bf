//! # Watch Loop
//!
//! Runs one controller per custom resource kind plus the Ingress controller
//! until the process receives SIGINT or SIGTERM.

use crate::controller::backoff::BackoffRegistry;
use crate::controller::ingress::RouteSynchronizer;
use crate::controller::reconciler::ResourceReconciler;
use crate::crd::{AlertContact, MaintenanceWindow, PublicStatusPage, UptimeRobotMonitor};
use crate::mapper::ExternalSpec;
use crate::runtime::dispatch::{reconcile, reconcile_ingress, Context, IngressContext, ManagedResource};
use crate::runtime::error_policy::{handle_ingress_error, handle_reconciliation_error};
use crate::runtime::initialization::InitializationResult;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::Api;
use kube_runtime::{watcher, Controller};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run all controllers until shutdown
///
/// # Errors
///
/// Currently never fails; controller stream errors are logged and the
/// controllers keep running.
pub async fn run_watch_loop(runtime: InitializationResult) -> Result<(), anyhow::Error> {
    let backoff = BackoffRegistry::new(
        runtime.config.backoff_min_minutes,
        runtime.config.backoff_max_minutes,
    );
    let error_requeue = runtime.config.reconciliation_error_requeue_duration();

    let mut controllers: Vec<BoxFuture<'static, ()>> = vec![
        resource_controller::<UptimeRobotMonitor>(&runtime, &backoff),
        resource_controller::<AlertContact>(&runtime, &backoff),
        resource_controller::<MaintenanceWindow>(&runtime, &backoff),
        resource_controller::<PublicStatusPage>(&runtime, &backoff),
    ];

    if runtime.config.disable_ingress_handling {
        info!("Handling of Ingress resources has been disabled");
    } else {
        let ctx = Arc::new(IngressContext {
            client: runtime.client.clone(),
            synchronizer: RouteSynchronizer::new(Arc::clone(&runtime.monitor_store), true),
            backoff: backoff.clone(),
            error_requeue,
        });
        let ingresses: Api<Ingress> = Api::all(runtime.client.clone());
        controllers.push(
            Controller::new(ingresses, watcher::Config::default().any_semantic())
                .shutdown_on_signal()
                .run(reconcile_ingress, handle_ingress_error, ctx)
                .for_each(|result| async move {
                    match result {
                        Ok((obj, _action)) => debug!("Reconciled Ingress {}", obj.name),
                        Err(e) => warn!("Ingress controller stream error: {}", e),
                    }
                })
                .boxed(),
        );
    }

    info!("Starting {} controllers", controllers.len());
    futures::future::join_all(controllers).await;

    runtime.server_state.is_ready.store(false, Ordering::Relaxed);
    info!("Controllers stopped gracefully");
    Ok(())
}

fn resource_controller<K: ManagedResource>(
    runtime: &InitializationResult,
    backoff: &BackoffRegistry,
) -> BoxFuture<'static, ()> {
    let kind = K::Spec::KIND.resource_kind();
    let ctx = Arc::new(Context::<K> {
        client: runtime.client.clone(),
        reconciler: ResourceReconciler::new(
            Arc::clone(&runtime.service),
            Arc::clone(&runtime.secrets),
        ),
        backoff: backoff.clone(),
        error_requeue: runtime.config.reconciliation_error_requeue_duration(),
    });
    let api: Api<K> = Api::all(runtime.client.clone());

    Controller::new(api, watcher::Config::default().any_semantic())
        .shutdown_on_signal()
        .run(reconcile::<K>, handle_reconciliation_error::<K>, ctx)
        .for_each(move |result| async move {
            match result {
                Ok((obj, _action)) => debug!("Reconciled {} {}", kind, obj.name),
                Err(e) => warn!("{} controller stream error: {}", kind, e),
            }
        })
        .boxed()
}
