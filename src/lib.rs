//! UptimeRobot Operator Library
//!
//! Core functionality of the UptimeRobot operator: custom resources for
//! monitors, alert contacts, maintenance windows and public status pages,
//! their reconciliation against the UptimeRobot API, and monitor fan-out
//! from Ingress host rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use uptimerobot_operator::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod mapper;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
