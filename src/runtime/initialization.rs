//! # Initialization
//!
//! Operator bootstrap: rustls setup, tracing, metrics, probe server,
//! Kubernetes client, UptimeRobot session and CRD registration.
//!
//! Any failure here is fatal. Handlers only run once the UptimeRobot session
//! has been verified and every CRD is registered.

use crate::config::ControllerConfig;
use crate::controller::ingress::{KubeMonitorStore, MonitorStore};
use crate::controller::secrets::{KubeSecretResolver, SecretResolver};
use crate::controller::server::{start_server, ServerState};
use crate::observability;
use crate::provider::uptimerobot::UptimeRobotClient;
use crate::provider::{self, MonitoringService};
use crate::runtime::registration::register_crds;
use anyhow::{Context, Result};
use kube::Client;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

/// Everything the watch loop needs
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    pub config: ControllerConfig,
    /// Authenticated UptimeRobot session
    pub service: Arc<dyn MonitoringService>,
    pub secrets: Arc<dyn SecretResolver>,
    /// Store for monitors derived from Ingresses
    pub monitor_store: Arc<dyn MonitorStore>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("config", &self.config)
            .field(
                "server_ready",
                &self.server_state.is_ready.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

/// Initialize the operator runtime
///
/// # Errors
///
/// Fails when configuration is incomplete, the probe server cannot start,
/// the cluster is unreachable, UptimeRobot rejects the API key or the CRDs
/// cannot be registered.
pub async fn initialize() -> Result<InitializationResult> {
    // Required for rustls 0.23+ before anything opens a TLS connection
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        return Err(anyhow::anyhow!("Failed to install rustls crypto provider"));
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uptimerobot_operator=info".into()),
        )
        .init();

    info!("Starting UptimeRobot operator");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    observability::metrics::register_metrics()?;

    let config = ControllerConfig::from_env().context("Failed to load operator configuration")?;
    info!("Loaded configuration: {:?}", config);

    let server_state = Arc::new(ServerState::default());
    let server_state_clone = Arc::clone(&server_state);
    let server_port = config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_ready(&server_state, &server_handle, &config).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let uptimerobot = UptimeRobotClient::new(config.api_key.clone(), config.api_url.clone())
        .context("Failed to create UptimeRobot client")?;
    let service: Arc<dyn MonitoringService> = Arc::new(uptimerobot);
    provider::authenticate(service.as_ref())
        .await
        .context("Failed to verify UptimeRobot API key")?;
    info!("Authenticated against UptimeRobot API at {}", config.api_url);

    register_crds(&client)
        .await
        .context("Failed to register custom resource definitions")?;

    server_state.mark_ready();
    info!("Operator initialized, starting controllers...");

    Ok(InitializationResult {
        secrets: Arc::new(KubeSecretResolver::new(client.clone())),
        monitor_store: Arc::new(KubeMonitorStore::new(client.clone())),
        client,
        config,
        service,
        server_state,
    })
}

/// Wait for the HTTP server to bind its port
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    config: &ControllerConfig,
) -> Result<()> {
    let startup_timeout = config.server_startup_timeout();
    let poll_interval = config.server_poll_interval();
    let start_time = std::time::Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_listening.load(Ordering::Relaxed) {
            info!("HTTP server is accepting connections");
            break;
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to start within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }

    Ok(())
}
