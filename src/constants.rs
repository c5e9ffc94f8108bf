//! # Constants
//!
//! Shared constants used throughout the operator.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable.

/// API group shared by all custom resources managed by the operator
pub const GROUP: &str = "uroperator.brennerm.github.io";

/// API version served for all custom resources
pub const VERSION: &str = "v1beta1";

/// Finalizer guaranteeing the delete handler runs before a resource disappears
pub const FINALIZER: &str = "uroperator.brennerm.github.io/finalizer";

/// Annotation holding the last handled essence of a watched object
pub const LAST_HANDLED_ANNOTATION: &str =
    "uroperator.brennerm.github.io/last-handled-configuration";

/// Prefix of Ingress annotations that seed the derived monitor spec
pub const MONITOR_ANNOTATION_PREFIX: &str = "uroperator.brennerm.github.io/monitor.";

/// Field manager used for server-side apply and status patches
pub const FIELD_MANAGER: &str = "uptimerobot-operator";

/// Default UptimeRobot API base URL
pub const DEFAULT_UPTIMEROBOT_API_URL: &str = "https://api.uptimerobot.com/v2";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default requeue interval for transient reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default Fibonacci backoff starting value (minutes)
pub const DEFAULT_BACKOFF_MIN_MINUTES: u64 = 1;

/// Default Fibonacci backoff maximum value (minutes)
pub const DEFAULT_BACKOFF_MAX_MINUTES: u64 = 10;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Default namespace the operator runs in
pub const DEFAULT_CONTROLLER_NAMESPACE: &str = "uptimerobot-operator";
