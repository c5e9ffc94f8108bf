//! # Monitoring Service Providers
//!
//! The external monitoring service seen by the reconcilers.
//!
//! `MonitoringService` is the seam between handlers and UptimeRobot: the
//! production implementation is the HTTP client in `uptimerobot`, tests use
//! in-memory fakes.

mod responses;
pub mod uptimerobot;

use crate::crd::ObjectKind;
use crate::mapper::Parameters;
use async_trait::async_trait;
use thiserror::Error;

pub use responses::{ApiError, ApiResponse, Stat, NOT_FOUND};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {method} failed: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned HTTP {status}: {body}")]
    HttpStatus {
        method: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("authentication against UptimeRobot failed: {0}")]
    Authentication(ApiError),
}

/// External monitoring service operations
///
/// Every call returns the decoded response envelope. A `fail` stat is not an
/// error at this layer; the caller decides what a failure means.
#[async_trait]
pub trait MonitoringService: Send + Sync {
    /// Fetch account details, used to verify the API key
    async fn account_details(&self) -> Result<ApiResponse, ProviderError>;

    async fn create(
        &self,
        kind: ObjectKind,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError>;

    /// Edit an existing object; `id` is added to the parameters
    async fn edit(
        &self,
        kind: ObjectKind,
        id: &str,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError>;

    async fn delete(&self, kind: ObjectKind, id: &str) -> Result<ApiResponse, ProviderError>;
}

/// Verify the session by fetching account details
///
/// # Errors
///
/// Fails on transport errors or when UptimeRobot rejects the API key.
pub async fn authenticate(service: &dyn MonitoringService) -> Result<(), ProviderError> {
    let response = service.account_details().await?;
    if response.is_ok() {
        Ok(())
    } else {
        Err(ProviderError::Authentication(response.error_or_default()))
    }
}
