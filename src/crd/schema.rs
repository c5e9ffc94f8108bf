//! # Schema Introspection
//!
//! Read access to the generated CRD schemas. Used to type Ingress annotation
//! values and to render the parameter documentation.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Schema of the `spec` property of the first served version
#[must_use]
pub fn spec_schema(crd: &CustomResourceDefinition) -> Option<&JSONSchemaProps> {
    crd.spec
        .versions
        .first()?
        .schema
        .as_ref()?
        .open_api_v3_schema
        .as_ref()?
        .properties
        .as_ref()?
        .get("spec")
}

/// Spec property name to declared JSON type (`string` when undeclared)
#[must_use]
pub fn spec_property_types(crd: &CustomResourceDefinition) -> BTreeMap<String, String> {
    spec_schema(crd)
        .and_then(|spec| spec.properties.as_ref())
        .map(|properties| {
            properties
                .iter()
                .map(|(name, prop)| {
                    let ty = prop.type_.clone().unwrap_or_else(|| "string".to_string());
                    (name.clone(), ty)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Markdown table describing every spec property of a CRD
///
/// Rows are `|key|type|description|`, required properties are suffixed with
/// ` (required)` in the description column.
#[must_use]
pub fn parameter_table(crd: &CustomResourceDefinition) -> String {
    let mut table = String::from("|key|type|description|\n|-|-|-|\n");
    let Some(spec) = spec_schema(crd) else {
        return table;
    };
    let required = spec.required.clone().unwrap_or_default();

    for (name, prop) in spec.properties.iter().flatten() {
        let ty = prop.type_.as_deref().unwrap_or("string");
        let mut description = prop
            .description
            .as_deref()
            .unwrap_or_default()
            .replace('\n', " ");
        if required.iter().any(|r| r == name) {
            description.push_str(" (required)");
        }
        let _ = writeln!(table, "|{name}|{ty}|{description}|");
    }
    table
}
