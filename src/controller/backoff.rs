//! # Fibonacci Backoff
//!
//! Requeue delays for transient handler failures (Kubernetes API errors,
//! UptimeRobot transport errors, secrets that do not exist yet).
//!
//! Delays grow along the Fibonacci sequence in minutes and are capped:
//! 1m, 1m, 2m, 3m, 5m, 8m, 10m, 10m, ...
//!
//! ```
//! use uptimerobot_operator::controller::backoff::FibonacciBackoff;
//!
//! let mut backoff = FibonacciBackoff::new(1, 10);
//! assert_eq!(backoff.next_backoff_seconds(), 60);
//! assert_eq!(backoff.next_backoff_seconds(), 60);
//! assert_eq!(backoff.next_backoff_seconds(), 120);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fibonacci backoff calculator
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Minimum backoff value in minutes (for reset)
    min_minutes: u64,
    prev_minutes: u64,
    current_minutes: u64,
    /// Maximum backoff value in minutes
    max_minutes: u64,
}

impl FibonacciBackoff {
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_minutes * 60;

        let next_minutes = self.prev_minutes + self.current_minutes;
        self.prev_minutes = self.current_minutes;
        self.current_minutes = std::cmp::min(next_minutes, self.max_minutes);

        result_seconds
    }

    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    pub fn reset(&mut self) {
        self.prev_minutes = 0;
        self.current_minutes = self.min_minutes;
    }
}

/// Per-resource backoff state shared between reconcile and error policy
///
/// Keys are `kind/namespace/name`. A successful handler run removes the
/// resource's entry so the next failure starts over at the minimum.
#[derive(Debug, Clone)]
pub struct BackoffRegistry {
    min_minutes: u64,
    max_minutes: u64,
    states: Arc<Mutex<HashMap<String, FibonacciBackoff>>>,
}

impl BackoffRegistry {
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            max_minutes,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Next delay for `key`, or `None` if the state lock is poisoned
    #[must_use]
    pub fn next_backoff(&self, key: &str) -> Option<Duration> {
        let mut states = self.states.lock().ok()?;
        let backoff = states
            .entry(key.to_string())
            .or_insert_with(|| FibonacciBackoff::new(self.min_minutes, self.max_minutes));
        Some(backoff.next_backoff())
    }

    pub fn reset(&self, key: &str) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(key);
        }
    }
}
