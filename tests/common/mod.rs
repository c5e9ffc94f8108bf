//! Common test utilities
//!
//! In-memory fakes for the seams of the operator: the UptimeRobot service,
//! Kubernetes secrets and the store for monitors derived from Ingresses.
//! Also provides rustls setup for tests that open HTTP connections.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, Once};
use uptimerobot_operator::controller::ingress::{MonitorStore, SyncError};
use uptimerobot_operator::controller::secrets::{SecretError, SecretResolver};
use uptimerobot_operator::crd::{ObjectKind, UptimeRobotMonitor, UptimeRobotMonitorSpec};
use uptimerobot_operator::mapper::Parameters;
use uptimerobot_operator::provider::{ApiResponse, MonitoringService, ProviderError};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // Another test binary in the same process may have installed it already
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// One call received by [`FakeMonitoringService`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub id: Option<String>,
    pub parameters: Parameters,
}

/// UptimeRobot stand-in answering `ok` with increasing IDs unless told otherwise
#[derive(Debug)]
pub struct FakeMonitoringService {
    next_id: AtomicU64,
    calls: Mutex<Vec<RecordedCall>>,
    scripted: Mutex<HashMap<String, VecDeque<Value>>>,
}

impl Default for FakeMonitoringService {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            calls: Mutex::new(Vec::new()),
            scripted: Mutex::new(HashMap::new()),
        }
    }
}

impl FakeMonitoringService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next call to `method` with `response` instead of the default
    pub fn respond(&self, method: &str, response: Value) {
        self.scripted
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }

    fn answer(
        &self,
        method: String,
        id: Option<String>,
        parameters: Parameters,
        default: impl FnOnce() -> Value,
    ) -> Result<ApiResponse, ProviderError> {
        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            id,
            parameters,
        });
        let body = scripted.unwrap_or_else(default);
        Ok(serde_json::from_value(body).unwrap())
    }
}

#[async_trait]
impl MonitoringService for FakeMonitoringService {
    async fn account_details(&self) -> Result<ApiResponse, ProviderError> {
        self.answer(
            "getAccountDetails".to_string(),
            None,
            Parameters::new(),
            || json!({"stat": "ok", "account": {"email": "ops@example.com"}}),
        )
    }

    async fn create(
        &self,
        kind: ObjectKind,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.answer(kind.create_method(), None, parameters.clone(), || {
            json!({"stat": "ok", kind.payload_key(): {"id": id}})
        })
    }

    async fn edit(
        &self,
        kind: ObjectKind,
        id: &str,
        parameters: &Parameters,
    ) -> Result<ApiResponse, ProviderError> {
        let echoed = id.to_string();
        self.answer(
            kind.edit_method(),
            Some(id.to_string()),
            parameters.clone(),
            || json!({"stat": "ok", kind.payload_key(): {"id": echoed}}),
        )
    }

    async fn delete(&self, kind: ObjectKind, id: &str) -> Result<ApiResponse, ProviderError> {
        let echoed = id.to_string();
        self.answer(
            kind.delete_method(),
            Some(id.to_string()),
            Parameters::new(),
            || json!({"stat": "ok", kind.payload_key(): {"id": echoed}}),
        )
    }
}

/// Secrets held in memory, keyed by namespace and name
#[derive(Debug, Default)]
pub struct FakeSecrets {
    secrets: HashMap<(String, String), BTreeMap<String, String>>,
}

impl FakeSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        self.secrets.insert(
            (namespace.to_string(), name.to_string()),
            data.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        self
    }
}

#[async_trait]
impl SecretResolver for FakeSecrets {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, SecretError> {
        self.secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| SecretError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

/// One write received by [`FakeMonitorStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create {
        name: String,
        spec: UptimeRobotMonitorSpec,
    },
    Update {
        name: String,
        spec: UptimeRobotMonitorSpec,
    },
    Delete {
        name: String,
    },
}

/// Child monitor store recording every write
#[derive(Debug, Default)]
pub struct FakeMonitorStore {
    calls: Mutex<Vec<StoreCall>>,
}

impl FakeMonitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitorStore for FakeMonitorStore {
    async fn create(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(StoreCall::Create {
            name: monitor.metadata.name.clone().unwrap_or_default(),
            spec: monitor.spec.clone(),
        });
        Ok(())
    }

    async fn update(&self, monitor: &UptimeRobotMonitor) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(StoreCall::Update {
            name: monitor.metadata.name.clone().unwrap_or_default(),
            spec: monitor.spec.clone(),
        });
        Ok(())
    }

    async fn delete(&self, _namespace: &str, name: &str) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(StoreCall::Delete {
            name: name.to_string(),
        });
        Ok(())
    }
}
