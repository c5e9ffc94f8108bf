//! # UptimeRobot REST Client
//!
//! `MonitoringService` implementation for the UptimeRobot API v2.
//!
//! Every call is a `POST {base}/{method}` with a form-encoded body carrying
//! `api_key`, `format=json` and the request parameters.

use super::{ApiResponse, MonitoringService, ProviderError};
use crate::crd::ObjectKind;
use crate::mapper::Parameters;
use crate::observability::metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, debug_span, Instrument};
use zeroize::Zeroizing;

const ACCOUNT_DETAILS_METHOD: &str = "getAccountDetails";

/// UptimeRobot API client
pub struct UptimeRobotClient {
    http_client: Client,
    base_url: String,
    api_key: Zeroizing<String>,
}

impl std::fmt::Debug for UptimeRobotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UptimeRobotClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UptimeRobotClient {
    /// Create a client for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(api_key: Zeroizing<String>, base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .user_agent(concat!("uptimerobot-operator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn call(&self, method: &str, parameters: &Parameters) -> Result<ApiResponse, ProviderError> {
        let url = format!("{}/{}", self.base_url, method);
        let mut form = vec![
            ("api_key".to_string(), self.api_key.to_string()),
            ("format".to_string(), "json".to_string()),
        ];
        form.extend(encode_parameters(parameters));

        let start = Instant::now();
        let span = debug_span!("uptimerobot.request", api.method = method);

        let result = async {
            let response = self
                .http_client
                .post(&url)
                .form(&form)
                .send()
                .await
                .map_err(|source| ProviderError::Transport {
                    method: method.to_string(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::HttpStatus {
                    method: method.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .json::<ApiResponse>()
                .await
                .map_err(|source| ProviderError::Decode {
                    method: method.to_string(),
                    source,
                })
        }
        .instrument(span)
        .await;

        let outcome = match &result {
            Ok(response) if response.is_ok() => "ok",
            Ok(_) => "fail",
            Err(_) => "error",
        };
        metrics::record_api_request(method, outcome, start.elapsed().as_secs_f64());
        debug!(api.method = method, outcome, "UptimeRobot API call finished");

        result
    }
}

#[async_trait]
impl MonitoringService for UptimeRobotClient {
    async fn account_details(&self) -> Result<ApiResponse, ProviderError> {
        self.call(ACCOUNT_DETAILS_METHOD, &Parameters::new()).await
    }

    async fn create(
        &self,
        kind: ObjectKind,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError> {
        self.call(&kind.create_method(), parameters).await
    }

    async fn edit(
        &self,
        kind: ObjectKind,
        id: &str,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError> {
        let mut parameters = parameters.clone();
        parameters.insert("id".to_string(), Value::String(id.to_string()));
        self.call(&kind.edit_method(), &parameters).await
    }

    async fn delete(&self, kind: ObjectKind, id: &str) -> Result<ApiResponse, ProviderError> {
        let parameters = Parameters::from([("id".to_string(), Value::String(id.to_string()))]);
        self.call(&kind.delete_method(), &parameters).await
    }
}

/// Encode parameters as form fields
///
/// Strings are sent verbatim, numbers in decimal, booleans as `1`/`0`, and
/// objects or arrays as compact JSON. Nulls are skipped.
#[must_use]
pub fn encode_parameters(parameters: &Parameters) -> Vec<(String, String)> {
    parameters
        .iter()
        .filter_map(|(key, value)| {
            let encoded = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
                Value::Array(_) | Value::Object(_) => value.to_string(),
            };
            Some((key.clone(), encoded))
        })
        .collect()
}
