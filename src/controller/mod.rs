//! # Controller
//!
//! Reconciliation logic and its supporting pieces.
//!
//! - `reconciler` - Per-kind create/update/delete handlers against UptimeRobot
//! - `ingress` - Monitor fan-out from Ingress host rules
//! - `diff` - Essence diffs and type change detection
//! - `identifier` - External identifier lookup in resource status
//! - `secrets` - Secret resolution
//! - `backoff` - Fibonacci backoff for transient failures
//! - `server` - Metrics and probe endpoints

pub mod backoff;
pub mod diff;
pub mod identifier;
pub mod ingress;
pub mod reconciler;
pub mod secrets;
pub mod server;
