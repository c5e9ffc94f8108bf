//! # Runtime
//!
//! Operator bootstrap and the controller watch loops.
//!
//! - `initialization` - Startup sequence up to a ready operator
//! - `registration` - CRD installation
//! - `dispatch` - Event dispatch to the handlers and status bookkeeping
//! - `error_policy` - Requeue with backoff after transient failures
//! - `watch_loop` - Controllers for every watched kind

pub mod dispatch;
pub mod error_policy;
pub mod initialization;
pub mod registration;
pub mod watch_loop;
