//! Resource kinds and the serialized payload handed to the reconciler.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Secret, Service};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use mg_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::application::Application;
use crate::openshift::{BuildConfig, ImageStream, Route};

/// Every resource kind mg generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    BuildConfig,
    ImageStream,
    Deployment,
    Service,
    Route,
    ConfigMap,
    Secret,
    PodDisruptionBudget,
    Application,
}

impl ResourceKind {
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::BuildConfig => "BuildConfig",
            ResourceKind::ImageStream => "ImageStream",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Service => "Service",
            ResourceKind::Route => "Route",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Secret => "Secret",
            ResourceKind::PodDisruptionBudget => "PodDisruptionBudget",
            ResourceKind::Application => "Application",
        }
    }

    /// API group, empty for the core group.
    pub fn group(&self) -> &'static str {
        match self {
            ResourceKind::BuildConfig => "build.openshift.io",
            ResourceKind::ImageStream => "image.openshift.io",
            ResourceKind::Route => "route.openshift.io",
            ResourceKind::Deployment => "apps",
            ResourceKind::PodDisruptionBudget => "policy",
            ResourceKind::Application => "app.k8s.io",
            ResourceKind::Service | ResourceKind::ConfigMap | ResourceKind::Secret => "",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            ResourceKind::Application => "v1beta1",
            _ => "v1",
        }
    }

    pub fn api_version(&self) -> String {
        if self.group().is_empty() {
            self.version().to_string()
        } else {
            format!("{}/{}", self.group(), self.version())
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::BuildConfig => "buildconfigs",
            ResourceKind::ImageStream => "imagestreams",
            ResourceKind::Deployment => "deployments",
            ResourceKind::Service => "services",
            ResourceKind::Route => "routes",
            ResourceKind::ConfigMap => "configmaps",
            ResourceKind::Secret => "secrets",
            ResourceKind::PodDisruptionBudget => "poddisruptionbudgets",
            ResourceKind::Application => "applications",
        }
    }

    /// Whether an existing remote object is replaced on apply.
    ///
    /// Secrets are created once and never overwritten, since their content
    /// is managed outside mg after creation.
    pub fn replaces_existing(&self) -> bool {
        !matches!(self, ResourceKind::Secret)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A fully populated resource ready to be submitted or rendered.
///
/// Carries no remote-assigned metadata until the reconciler copies the
/// remote resource version into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    kind: ResourceKind,
    name: String,
    body: Value,
}

impl Payload {
    pub fn new(kind: ResourceKind, name: impl Into<String>, mut body: Value) -> Result<Self> {
        let object = body.as_object_mut().ok_or_else(|| {
            Error::Serialization(format!("{} payload is not an object", kind))
        })?;
        object
            .entry("apiVersion")
            .or_insert_with(|| Value::String(kind.api_version()));
        object
            .entry("kind")
            .or_insert_with(|| Value::String(kind.kind().to_string()));

        Ok(Self {
            kind,
            name: name.into(),
            body,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn target(&self) -> ResourceRef {
        ResourceRef::new(self.kind, self.name.clone())
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.body
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str)
    }

    /// Echo a remote version token so an update does not conflict.
    pub fn set_resource_version(&mut self, version: &str) {
        if let Some(object) = self.body.as_object_mut() {
            let metadata = object
                .entry("metadata")
                .or_insert_with(|| Value::Object(Default::default()));
            if let Some(metadata) = metadata.as_object_mut() {
                metadata.insert(
                    "resourceVersion".to_string(),
                    Value::String(version.to_string()),
                );
            }
        }
    }
}

/// Kind and name of a remote resource, used where no payload is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// A generated resource that can be turned into a payload.
pub trait Manifest: Serialize {
    const KIND: ResourceKind;

    fn name(&self) -> &str;

    fn to_payload(&self) -> Result<Payload> {
        let body = serde_json::to_value(self).map_err(|e| Error::Serialization(e.to_string()))?;
        Payload::new(Self::KIND, self.name(), body)
    }
}

macro_rules! typed_manifest {
    ($ty:ty, $kind:expr) => {
        impl Manifest for $ty {
            const KIND: ResourceKind = $kind;

            fn name(&self) -> &str {
                self.metadata.name.as_deref().unwrap_or_default()
            }
        }
    };
}

typed_manifest!(Deployment, ResourceKind::Deployment);
typed_manifest!(Service, ResourceKind::Service);
typed_manifest!(ConfigMap, ResourceKind::ConfigMap);
typed_manifest!(Secret, ResourceKind::Secret);
typed_manifest!(PodDisruptionBudget, ResourceKind::PodDisruptionBudget);
typed_manifest!(BuildConfig, ResourceKind::BuildConfig);
typed_manifest!(ImageStream, ResourceKind::ImageStream);
typed_manifest!(Route, ResourceKind::Route);
typed_manifest!(Application, ResourceKind::Application);

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::json;

    #[test]
    fn test_api_versions() {
        assert_eq!(ResourceKind::Service.api_version(), "v1");
        assert_eq!(ResourceKind::Deployment.api_version(), "apps/v1");
        assert_eq!(
            ResourceKind::BuildConfig.api_version(),
            "build.openshift.io/v1"
        );
        assert_eq!(ResourceKind::Application.api_version(), "app.k8s.io/v1beta1");
    }

    #[test]
    fn test_only_secrets_are_create_only() {
        assert!(!ResourceKind::Secret.replaces_existing());
        assert!(ResourceKind::Deployment.replaces_existing());
    }

    #[test]
    fn test_typed_payload_carries_type_meta() {
        let cm = ConfigMap {
            metadata: ObjectMeta {
                name: Some("ordersv2-app".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let payload = cm.to_payload().unwrap();
        assert_eq!(payload.kind(), ResourceKind::ConfigMap);
        assert_eq!(payload.name(), "ordersv2-app");
        assert_eq!(payload.body()["apiVersion"], "v1");
        assert_eq!(payload.body()["kind"], "ConfigMap");
        assert_eq!(payload.resource_version(), None);
    }

    #[test]
    fn test_set_resource_version() {
        let mut payload =
            Payload::new(ResourceKind::Service, "orders", json!({ "spec": {} })).unwrap();
        payload.set_resource_version("4711");
        assert_eq!(payload.resource_version(), Some("4711"));
        assert_eq!(payload.body()["metadata"]["resourceVersion"], "4711");
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let result = Payload::new(ResourceKind::Service, "orders", json!([1, 2]));
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
