//! # Handlers
//!
//! Create, update and delete handlers.

use super::{HandlerOutcome, Operation, ReconcilerError, ResourceReconciler};
use crate::controller::diff::{type_changed, DiffEntry};
use crate::controller::identifier::get_identifier;
use crate::crd::ResourceStatus;
use crate::mapper::{resolve_request_parameters, ExternalSpec, Parameters};
use tracing::{error, info, warn};

impl<S: ExternalSpec> ResourceReconciler<S> {
    /// Create the external object for a new resource
    ///
    /// # Errors
    ///
    /// Permanent if UptimeRobot rejects the object, transient on transport errors
    /// or unresolvable secrets.
    pub async fn on_create(
        &self,
        name: &str,
        namespace: &str,
        spec: &S,
    ) -> Result<HandlerOutcome, ReconcilerError> {
        let parameters = self.parameters(name, namespace, spec).await?;
        let identifier = self.create_object(&parameters).await?;
        Ok(HandlerOutcome {
            identifier,
            recreated: false,
        })
    }

    /// Apply a changed spec to the external object
    ///
    /// # Errors
    ///
    /// Permanent if the status carries no identifier or UptimeRobot rejects a
    /// call, transient on transport errors or unresolvable secrets.
    pub async fn on_update(
        &self,
        name: &str,
        namespace: &str,
        spec: &S,
        status: &ResourceStatus,
        diff: &[DiffEntry],
    ) -> Result<HandlerOutcome, ReconcilerError> {
        let identifier = get_identifier(status, S::KIND).map_err(|source| {
            ReconcilerError::MissingIdentifier {
                kind: S::KIND,
                operation: Operation::Update,
                source,
            }
        })?;
        let mut parameters = self.parameters(name, namespace, spec).await?;

        if type_changed(diff) || !spec.supports_in_place_edit() {
            info!(
                resource.kind = S::KIND.resource_kind(),
                resource.name = name,
                external.id = %identifier,
                "{} can not be updated in place, recreating it",
                S::KIND
            );
            self.delete_object(&identifier).await?;
            let identifier = self.create_object(&parameters).await?;
            return Ok(HandlerOutcome {
                identifier,
                recreated: true,
            });
        }

        if S::KIND.strips_type_on_update() {
            parameters.remove("type");
        }
        let identifier = self.edit_object(&identifier, &parameters).await?;
        Ok(HandlerOutcome {
            identifier,
            recreated: false,
        })
    }

    /// Delete the external object of a removed resource
    ///
    /// # Errors
    ///
    /// Permanent if the status carries no identifier or UptimeRobot rejects
    /// the deletion for any reason other than the object being absent.
    pub async fn on_delete(&self, status: &ResourceStatus) -> Result<(), ReconcilerError> {
        let identifier = get_identifier(status, S::KIND).map_err(|source| {
            ReconcilerError::MissingIdentifier {
                kind: S::KIND,
                operation: Operation::Delete,
                source,
            }
        })?;
        self.delete_object(&identifier).await
    }

    async fn parameters(
        &self,
        name: &str,
        namespace: &str,
        spec: &S,
    ) -> Result<Parameters, ReconcilerError> {
        resolve_request_parameters(name, namespace, spec, self.secrets.as_ref())
            .await
            .map_err(|source| ReconcilerError::Mapping {
                kind: S::KIND,
                source,
            })
    }

    async fn create_object(&self, parameters: &Parameters) -> Result<String, ReconcilerError> {
        let kind = S::KIND;
        let response = self
            .service
            .create(kind, parameters)
            .await
            .map_err(|source| ReconcilerError::Provider {
                kind,
                operation: Operation::Create,
                source,
            })?;

        if !response.is_ok() {
            let err = ReconcilerError::Rejected {
                kind,
                operation: Operation::Create,
                identifier: None,
                error: response.error_or_default(),
            };
            error!("{err}");
            return Err(err);
        }

        let identifier = response
            .identifier(kind)
            .ok_or(ReconcilerError::MalformedResponse {
                kind,
                operation: Operation::Create,
            })?;
        info!(external.id = %identifier, "{kind} with ID {identifier} has been created successfully");
        Ok(identifier)
    }

    async fn edit_object(
        &self,
        identifier: &str,
        parameters: &Parameters,
    ) -> Result<String, ReconcilerError> {
        let kind = S::KIND;
        let response = self
            .service
            .edit(kind, identifier, parameters)
            .await
            .map_err(|source| ReconcilerError::Provider {
                kind,
                operation: Operation::Update,
                source,
            })?;

        if !response.is_ok() {
            let err = ReconcilerError::Rejected {
                kind,
                operation: Operation::Update,
                identifier: Some(identifier.to_string()),
                error: response.error_or_default(),
            };
            error!("{err}");
            return Err(err);
        }

        // Edit responses echo the ID; keep the known one if they do not
        let updated = response
            .identifier(kind)
            .unwrap_or_else(|| identifier.to_string());
        info!(external.id = %updated, "{kind} with ID {updated} has been updated successfully");
        Ok(updated)
    }

    async fn delete_object(&self, identifier: &str) -> Result<(), ReconcilerError> {
        let kind = S::KIND;
        let response = self
            .service
            .delete(kind, identifier)
            .await
            .map_err(|source| ReconcilerError::Provider {
                kind,
                operation: Operation::Delete,
                source,
            })?;

        if response.is_ok() {
            info!(external.id = %identifier, "{kind} with ID {identifier} has been deleted successfully");
            return Ok(());
        }
        if response.is_not_found() {
            warn!(external.id = %identifier, "{kind} with ID {identifier} has already been deleted");
            return Ok(());
        }

        let err = ReconcilerError::Rejected {
            kind,
            operation: Operation::Delete,
            identifier: Some(identifier.to_string()),
            error: response.error_or_default(),
        };
        error!("{err}");
        Err(err)
    }
}
