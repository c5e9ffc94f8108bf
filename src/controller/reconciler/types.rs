//! # Types
//!
//! Core types for the resource reconciler.

use crate::controller::identifier::IdentifierError;
use crate::crd::ObjectKind;
use crate::mapper::MappingError;
use crate::provider::{ApiError, ProviderError};
use thiserror::Error;

/// Lifecycle operation a handler performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful create or update handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Identifier of the external object now owned by the resource
    pub identifier: String,
    /// Whether the external object was replaced by a new one
    pub recreated: bool,
}

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("was not able to determine the {kind} ID for {operation}: {source}")]
    MissingIdentifier {
        kind: ObjectKind,
        operation: Operation,
        #[source]
        source: IdentifierError,
    },
    #[error("failed to {operation} {kind}{}: {error}", with_identifier(.identifier.as_deref()))]
    Rejected {
        kind: ObjectKind,
        operation: Operation,
        identifier: Option<String>,
        error: ApiError,
    },
    #[error("{kind} {operation} response did not contain an ID")]
    MalformedResponse { kind: ObjectKind, operation: Operation },
    #[error("failed to map {kind} spec: {source}")]
    Mapping {
        kind: ObjectKind,
        #[source]
        source: MappingError,
    },
    #[error("{kind} {operation} request failed: {source}")]
    Provider {
        kind: ObjectKind,
        operation: Operation,
        #[source]
        source: ProviderError,
    },
    #[error("Kubernetes API request failed: {0}")]
    Kube(#[from] kube::Error),
}

fn with_identifier(identifier: Option<&str>) -> String {
    identifier.map(|id| format!(" with ID {id}")).unwrap_or_default()
}

impl ReconcilerError {
    /// Permanent errors cannot be fixed by retrying the same event
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        match self {
            ReconcilerError::MissingIdentifier { .. }
            | ReconcilerError::Rejected { .. }
            | ReconcilerError::MalformedResponse { .. } => true,
            ReconcilerError::Mapping { source, .. } => !source.is_transient(),
            ReconcilerError::Provider { .. } | ReconcilerError::Kube(_) => false,
        }
    }

    /// Metric label for the error class
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.is_permanent() {
            "permanent"
        } else {
            "transient"
        }
    }
}
