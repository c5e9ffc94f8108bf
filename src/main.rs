//! # UptimeRobot Operator
//!
//! A Kubernetes operator that manages UptimeRobot monitors, alert contacts,
//! maintenance windows and public status pages from custom resources, and
//! derives monitors from the host rules of Ingress resources.
//!
//! ## Configuration
//!
//! - `UPTIMEROBOT_API_KEY` - UptimeRobot API key (required)
//! - `URO_DISABLE_INGRESS_HANDLING` - Set to `1`, `true` or `yes` to ignore Ingresses
//! - `METRICS_PORT` - Port of the metrics and probe server (default 8080)
//! - `RUST_LOG` - Log filter (default `uptimerobot_operator=info`)

use anyhow::Result;
use uptimerobot_operator::runtime::initialization::initialize;
use uptimerobot_operator::runtime::watch_loop::run_watch_loop;

#[tokio::main]
async fn main() -> Result<()> {
    let runtime = initialize().await?;
    run_watch_loop(runtime).await
}
