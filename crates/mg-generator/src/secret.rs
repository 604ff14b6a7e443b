//! Secret generation.
//!
//! Secrets are placeholders created once; their content is filled in outside
//! mg. Global secrets are shared between components, so they are only
//! created on request and never removed on teardown.

use k8s_openapi::api::core::v1::Secret;
use mg_core::identity::{config_secret_name, is_implicit_secret, resource_secret_name};
use mg_core::{ComponentSpec, Identity, RuntimeParams};
use std::collections::BTreeMap;
use tracing::debug;

use crate::object_meta;

pub const SECRET_TYPE_OPAQUE: &str = "Opaque";

/// A secret a component needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRequirement {
    pub name: String,
    pub global: bool,
    /// Placeholder keys written on creation.
    pub keys: BTreeMap<String, String>,
}

/// Every secret a component needs, in declaration order and without duplicates.
pub fn required_secrets(spec: &ComponentSpec) -> Vec<SecretRequirement> {
    let mut secrets: Vec<SecretRequirement> = Vec::new();
    let mut push = |req: SecretRequirement| {
        if !secrets.iter().any(|s| s.name == req.name) {
            secrets.push(req);
        }
    };

    for resource in spec.spec.resources.iter().filter(|r| is_implicit_secret(r)) {
        push(SecretRequirement {
            name: resource_secret_name(resource),
            global: true,
            keys: BTreeMap::from([
                ("user".to_string(), resource.user.clone()),
                ("password".to_string(), String::new()),
            ]),
        });
    }

    for config in spec.spec.config.iter().filter(|c| c.is_certificate()) {
        push(SecretRequirement {
            name: config_secret_name(config),
            global: config.global,
            keys: BTreeMap::new(),
        });
    }

    for secret in &spec.spec.secret {
        push(SecretRequirement {
            name: secret.name.to_lowercase(),
            global: secret.global,
            keys: BTreeMap::new(),
        });
    }

    secrets
}

/// Generate the secrets to create.
///
/// Global secrets are only included when `create_globals` is set.
pub fn generate_secrets(
    spec: &ComponentSpec,
    identity: &Identity,
    params: &RuntimeParams,
) -> Vec<Secret> {
    required_secrets(spec)
        .into_iter()
        .filter(|req| {
            if req.global && !params.create_globals {
                debug!(secret = %req.name, "Skipping global secret");
                return false;
            }
            true
        })
        .map(|req| Secret {
            metadata: object_meta(&req.name, identity, params),
            type_: Some(SECRET_TYPE_OPAQUE.to_string()),
            string_data: (!req.keys.is_empty()).then_some(req.keys),
            ..Default::default()
        })
        .collect()
}

/// Names of the secrets removed on teardown. Global secrets are never listed.
pub fn teardown_secret_names(spec: &ComponentSpec) -> Vec<String> {
    required_secrets(spec)
        .into_iter()
        .filter(|req| !req.global)
        .map(|req| req.name)
        .collect()
}
