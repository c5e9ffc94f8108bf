//! # Secret Resolution
//!
//! Looks up Kubernetes Secrets referenced from resource specs.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },
    #[error("secret {namespace}/{name} key '{key}' is not valid UTF-8")]
    InvalidEncoding {
        namespace: String,
        name: String,
        key: String,
    },
    #[error("failed to read secret {namespace}/{name}: {source}")]
    Kube {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

/// Resolves a secret name in a namespace to its decoded key/value data
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, SecretError>;
}

/// Secret resolver backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretResolver {
    client: Client,
}

impl KubeSecretResolver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for KubeSecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretResolver for KubeSecretResolver {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, SecretError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = match api.get(name).await {
            Ok(secret) => secret,
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                return Err(SecretError::NotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                });
            }
            Err(source) => {
                return Err(SecretError::Kube {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source,
                });
            }
        };

        debug!(secret.namespace = namespace, secret.name = name, "Resolved secret");

        // ByteString holds the already base64-decoded bytes
        secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| match String::from_utf8(value.0) {
                Ok(decoded) => Ok((key, decoded)),
                Err(_) => Err(SecretError::InvalidEncoding {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    key,
                }),
            })
            .collect()
    }
}
