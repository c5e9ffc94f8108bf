//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use uptimerobot_operator::prelude::*;
//! ```

// CRD types
pub use crate::crd::*;

// External service seam
pub use crate::provider::{ApiError, ApiResponse, MonitoringService, ProviderError};

// Reconciler types
pub use crate::controller::reconciler::{
    HandlerOutcome, Operation, ReconcilerError, ResourceReconciler,
};

// Ingress fan-out
pub use crate::controller::ingress::{MonitorStore, Route, RouteSynchronizer, SyncError};

// Secrets
pub use crate::controller::secrets::{SecretError, SecretResolver};

// Mapping
pub use crate::mapper::{ExternalSpec, MappingError, Parameters};

// Config types
pub use crate::config::ControllerConfig;
