//! # Configuration
//!
//! Environment-driven configuration for the operator.

mod controller;

pub use controller::{
    ConfigError, ControllerConfig, API_KEY_ENV, DISABLE_INGRESS_HANDLING_ENV,
};
pub(crate) use controller::parse_bool_flag;
