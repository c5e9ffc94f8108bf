//! # CRD Registration
//!
//! Installs the four custom resource definitions at startup. A definition
//! that already exists is patched to the current schema.

use crate::crd::custom_resource_definitions;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use tracing::info;

/// Create or update every CRD served by the operator
///
/// # Errors
///
/// Fails on any Kubernetes API error other than a creation conflict.
pub async fn register_crds(client: &Client) -> Result<(), kube::Error> {
    let api: Api<CustomResourceDefinition> = Api::all(client.clone());

    for crd in custom_resource_definitions() {
        let name = crd.name_any();
        match api.create(&PostParams::default(), &crd).await {
            Ok(_) => info!("Registered CRD {}", name),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                api.patch(&name, &PatchParams::default(), &Patch::Merge(&crd))
                    .await?;
                info!("CRD {} already registered, patched to the current schema", name);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
