//! Application resource grouping the generated kinds (app.k8s.io/v1beta1).

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use mg_core::{ComponentSpec, Identity, RuntimeParams};
use serde::{Deserialize, Serialize};

use crate::manifest::ResourceKind;

/// Kinds listed as components of the application.
pub const COMPONENT_KINDS: &[ResourceKind] = &[
    ResourceKind::BuildConfig,
    ResourceKind::ImageStream,
    ResourceKind::Deployment,
    ResourceKind::Service,
    ResourceKind::Route,
    ResourceKind::ConfigMap,
    ResourceKind::Secret,
    ResourceKind::PodDisruptionBudget,
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: ApplicationSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    pub component_kinds: Vec<GroupKind>,
    pub descriptor: Descriptor,
    pub selector: LabelSelector,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    #[serde(rename = "type")]
    pub type_: String,
    pub version: String,
    pub description: String,
}

/// Generate the Application for a component.
///
/// Named with the case-preserving identity and carrying the spec's own
/// labels and annotations.
pub fn generate_application(
    spec: &ComponentSpec,
    identity: &Identity,
    params: &RuntimeParams,
) -> Application {
    let kind = ResourceKind::Application;
    let metadata = &spec.metadata;

    Application {
        api_version: kind.api_version(),
        kind: kind.kind().to_string(),
        metadata: ObjectMeta {
            name: Some(identity.display_name().to_string()),
            namespace: (!params.namespace.is_empty()).then(|| params.namespace.clone()),
            labels: (!metadata.labels.is_empty()).then(|| metadata.labels.clone()),
            annotations: (!metadata.annotations.is_empty()).then(|| metadata.annotations.clone()),
            ..Default::default()
        },
        spec: ApplicationSpec {
            component_kinds: COMPONENT_KINDS
                .iter()
                .map(|k| GroupKind {
                    group: k.group().to_string(),
                    kind: k.kind().to_string(),
                })
                .collect(),
            descriptor: Descriptor {
                type_: spec.spec.type_.clone(),
                version: spec.spec.version.clone(),
                description: spec.spec.description.clone(),
            },
            selector: LabelSelector::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::testutil::orders;

    #[test]
    fn test_application_uses_display_name() {
        let mut spec = orders();
        spec.metadata.name = "Orders".to_string();
        spec.metadata
            .labels
            .insert("team".to_string(), "checkout".to_string());
        let identity = Identity::resolve(&spec, "");
        let params = RuntimeParams {
            namespace: "shop".to_string(),
            ..Default::default()
        };

        let app = generate_application(&spec, &identity, &params);
        assert_eq!(app.metadata.name.as_deref(), Some("Ordersv2"));
        assert_eq!(app.metadata.namespace.as_deref(), Some("shop"));
        assert_eq!(app.metadata.labels.as_ref().unwrap()["team"], "checkout");
        assert!(app.metadata.annotations.is_none());
        assert_eq!(app.spec.descriptor.version, "2.3.1");

        let payload = app.to_payload().unwrap();
        assert_eq!(payload.body()["apiVersion"], "app.k8s.io/v1beta1");
        assert_eq!(payload.body()["spec"]["descriptor"]["type"], "service");
        assert_eq!(
            payload.body()["spec"]["componentKinds"][0]["group"],
            "build.openshift.io"
        );
    }
}
