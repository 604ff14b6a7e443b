//! Resource generators for mg.
//!
//! Each generator is a pure function from a component spec, its resolved
//! identity and the runtime parameters to one platform resource. Nothing in
//! this crate performs I/O.
//!
//! Generated kinds:
//! - BuildConfig, ImageStream, Route (OpenShift)
//! - Deployment, Service, ConfigMap, Secret, PodDisruptionBudget
//! - Application (app.k8s.io)

pub mod affinity;
pub mod application;
pub mod buildconfig;
pub mod component;
pub mod configmap;
pub mod deployment;
pub mod image_info;
pub mod imagestream;
pub mod labels;
pub mod manifest;
pub mod openshift;
pub mod pdb;
pub mod route;
pub mod secret;
pub mod service;

pub use component::ComponentGenerator;
pub use image_info::ImageInfo;
pub use manifest::{Manifest, Payload, ResourceKind, ResourceRef};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use mg_core::{Identity, RuntimeParams};

pub const DEFAULT_TAG: &str = "latest";

/// Image stream name and tag a build pushes to.
pub fn output_target(identity: &Identity, params: &RuntimeParams) -> (String, String) {
    let name = if params.output_imagestream.is_empty() {
        identity.name().to_string()
    } else {
        params.output_imagestream.clone()
    };
    let tag = if params.tag.is_empty() {
        DEFAULT_TAG.to_string()
    } else {
        params.tag.clone()
    };
    (name, tag)
}

/// Metadata shared by every generated resource.
pub(crate) fn object_meta(name: &str, identity: &Identity, params: &RuntimeParams) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: (!params.namespace.is_empty()).then(|| params.namespace.clone()),
        labels: Some(labels::labels(identity, params)),
        ..Default::default()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use mg_core::ComponentSpec;
    use mg_core::spec::{Metadata, Spec};

    pub fn orders() -> ComponentSpec {
        ComponentSpec {
            metadata: Metadata {
                name: "orders".to_string(),
                ..Default::default()
            },
            spec: Spec {
                version: "2.3.1".to_string(),
                description: "Order service".to_string(),
                type_: "service".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_defaults() {
        let identity = Identity::resolve(&testutil::orders(), "");
        let params = RuntimeParams::default();
        assert_eq!(
            output_target(&identity, &params),
            ("ordersv2".to_string(), "latest".to_string())
        );
    }

    #[test]
    fn test_output_target_overrides() {
        let identity = Identity::resolve(&testutil::orders(), "");
        let params = RuntimeParams {
            output_imagestream: "shared".to_string(),
            tag: "1.0".to_string(),
            ..Default::default()
        };
        assert_eq!(
            output_target(&identity, &params),
            ("shared".to_string(), "1.0".to_string())
        );
    }
}
