//! Lists the platform objects a component expects to find or have created.

use std::fmt;

use crate::identity::{Identity, config_map_name, config_secret_name, resource_secret_name};
use crate::spec::ComponentSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    ConfigMap { name: String },
    UserSecret { user: String, resource: String, secret: String },
    TemplateRef { resource: String, template: String },
    Certificate { name: String },
    Secret { name: String, global: bool },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::ConfigMap { name } => write!(f, "ConfigMap {}", name),
            Requirement::UserSecret {
                user,
                resource,
                secret,
            } => write!(
                f,
                "creates Secret for user {} for resource {}. Secret name: {}",
                user, resource, secret
            ),
            Requirement::TemplateRef { resource, template } => write!(
                f,
                "references ConfigMap template for resource {} named: {}",
                resource, template
            ),
            Requirement::Certificate { name } => write!(f, "needs cert {}", name),
            Requirement::Secret { name, global: true } => write!(f, "needs GLOBAL secret {}", name),
            Requirement::Secret { name, global: false } => write!(f, "needs secret {}", name),
        }
    }
}

pub fn inspect(spec: &ComponentSpec, identity: &Identity) -> Vec<Requirement> {
    let mut requirements = Vec::new();

    for config in spec.spec.config.iter().filter(|c| !c.is_certificate()) {
        requirements.push(Requirement::ConfigMap {
            name: config_map_name(identity, config),
        });
    }

    for resource in &spec.spec.resources {
        if resource.secret.is_empty() && !resource.user.is_empty() {
            requirements.push(Requirement::UserSecret {
                user: resource.user.clone(),
                resource: resource.name.clone(),
                secret: resource_secret_name(resource),
            });
        }
        if !resource.template_ref.is_empty() {
            requirements.push(Requirement::TemplateRef {
                resource: resource.name.clone(),
                template: resource.template_ref.clone(),
            });
        }
    }

    for config in spec.spec.config.iter().filter(|c| c.is_certificate()) {
        requirements.push(Requirement::Certificate {
            name: config_secret_name(config),
        });
    }

    for secret in &spec.spec.secret {
        requirements.push(Requirement::Secret {
            name: secret.name.to_lowercase(),
            global: secret.global,
        });
    }

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Config, DeclaredSecret, Metadata, Resource, Spec};

    #[test]
    fn test_inspect_lists_requirements() {
        let spec = ComponentSpec {
            metadata: Metadata {
                name: "orders".to_string(),
                ..Default::default()
            },
            spec: Spec {
                version: "1.0.0".to_string(),
                config: vec![
                    Config {
                        name: "app.properties".to_string(),
                        ..Default::default()
                    },
                    Config {
                        name: "TLS".to_string(),
                        type_: "cert".to_string(),
                        ..Default::default()
                    },
                ],
                resources: vec![Resource {
                    name: "ordersdb".to_string(),
                    user: "orders".to_string(),
                    template_ref: "jdbc-template".to_string(),
                    ..Default::default()
                }],
                secret: vec![DeclaredSecret {
                    name: "Signing".to_string(),
                    global: true,
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        let identity = Identity::resolve(&spec, "");

        let lines: Vec<String> = inspect(&spec, &identity)
            .iter()
            .map(|r| r.to_string())
            .collect();

        assert_eq!(
            lines,
            vec![
                "ConfigMap ordersv1-app-properties",
                "creates Secret for user orders for resource ordersdb. Secret name: ordersdb-orders",
                "references ConfigMap template for resource ordersdb named: jdbc-template",
                "needs cert tls",
                "needs GLOBAL secret signing",
            ]
        );
    }
}
