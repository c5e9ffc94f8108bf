//! # Field Mapper
//!
//! Translates resource specs into UptimeRobot request parameters.
//!
//! - Keys are converted from camelCase to snake_case
//! - `friendly_name` defaults to the resource name
//! - Enum names are replaced by their numeric codes
//! - Absent fields never appear in the output
//!
//! Apart from the password secret lookup of status pages the mapping is pure.

mod resources;

use crate::controller::secrets::{SecretError, SecretResolver};
use crate::crd::ObjectKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Flat request parameters, keyed by UptimeRobot parameter name
pub type Parameters = BTreeMap<String, Value>;

/// Secret key holding a status page password
pub const PASSWORD_SECRET_KEY: &str = "password";

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to serialize spec: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("spec did not serialize to an object")]
    NotAnObject,
    #[error(transparent)]
    Secret(#[from] SecretError),
    #[error("secret {namespace}/{name} has no '{key}' key")]
    MissingSecretKey {
        namespace: String,
        name: String,
        key: &'static str,
    },
}

impl MappingError {
    /// Whether retrying with an unchanged spec can succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, MappingError::Secret(_) | MappingError::MissingSecretKey { .. })
    }
}

/// Spec of a resource mirrored as an UptimeRobot object
pub trait ExternalSpec:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// External object kind this spec maps to
    const KIND: ObjectKind;

    /// Snake-cased parameter keys of the set enum fields with their codes
    fn enum_codes(&self) -> Vec<(&'static str, i64)>;

    /// Kind specific defaults applied after flattening
    fn apply_defaults(&self, _parameters: &mut Parameters) {}

    /// Name of a Secret whose `password` key overrides the `password` parameter
    fn password_secret(&self) -> Option<&str> {
        None
    }

    /// Whether the current spec can be applied with an edit call
    fn supports_in_place_edit(&self) -> bool {
        true
    }

    /// Map the spec to request parameters without resolving secrets
    ///
    /// # Errors
    ///
    /// Fails only when the spec cannot be serialized to a JSON object.
    fn to_request_parameters(&self, name: &str) -> Result<Parameters, MappingError> {
        let mut parameters = flatten(self)?;
        parameters
            .entry("friendly_name".to_string())
            .or_insert_with(|| Value::String(name.to_string()));
        for (key, code) in self.enum_codes() {
            parameters.insert(key.to_string(), Value::from(code));
        }
        self.apply_defaults(&mut parameters);
        Ok(parameters)
    }
}

/// Map a spec to request parameters, resolving the password secret if referenced
///
/// # Errors
///
/// Fails when the spec cannot be serialized, or the referenced secret or its
/// `password` key cannot be read.
pub async fn resolve_request_parameters<S: ExternalSpec>(
    name: &str,
    namespace: &str,
    spec: &S,
    secrets: &dyn SecretResolver,
) -> Result<Parameters, MappingError> {
    let mut parameters = spec.to_request_parameters(name)?;

    if let Some(secret_name) = spec.password_secret() {
        let data = secrets.resolve(namespace, secret_name).await?;
        let password = data
            .get(PASSWORD_SECRET_KEY)
            .ok_or_else(|| MappingError::MissingSecretKey {
                namespace: namespace.to_string(),
                name: secret_name.to_string(),
                key: PASSWORD_SECRET_KEY,
            })?;
        parameters.insert("password".to_string(), Value::String(password.clone()));
        parameters.remove("password_secret");
    }

    Ok(parameters)
}

/// Serialize a spec and snake-case its top-level keys, dropping nulls
///
/// # Errors
///
/// Fails when the spec is not serializable to a JSON object.
pub fn flatten<S: Serialize>(spec: &S) -> Result<Parameters, MappingError> {
    let Value::Object(map) = serde_json::to_value(spec)? else {
        return Err(MappingError::NotAnObject);
    };

    Ok(map
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (camel_to_snake_case(&key), value))
        .collect())
}

/// Insert `_` before every uppercase letter except a leading one, then lowercase
#[must_use]
pub fn camel_to_snake_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 4);
    for (index, ch) in input.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                output.push('_');
            }
            output.push(ch.to_ascii_lowercase());
        } else {
            output.push(ch);
        }
    }
    output
}
