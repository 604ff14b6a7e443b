//! Deployment generation.

use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment,
};
use k8s_openapi::api::core::v1::{
    ConfigMapEnvSource, Container, EnvFromSource, PodSpec, PodTemplateSpec, SecretEnvSource,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use mg_core::env::resolve_local;
use mg_core::{ComponentSpec, Identity, Overrides, RuntimeParams};

use crate::affinity::soft_pod_anti_affinity;
use crate::buildconfig::env_var;
use crate::image_info::ImageInfo;
use crate::labels::DEPLOYMENT_LABEL;
use crate::{object_meta, output_target};

pub const REVISION_HISTORY_LIMIT: i32 = 5;
pub const MAX_SURGE: &str = "25%";
pub const MAX_UNAVAILABLE: &str = "25%";
pub const DEFAULT_REPLICAS: i32 = 1;
const PULL_IF_NOT_PRESENT: &str = "IfNotPresent";

/// Image the workload runs: `[registry/][namespace/]name:tag`.
pub fn workload_image(identity: &Identity, params: &RuntimeParams) -> String {
    let (name, tag) = output_target(identity, params);
    let mut image = String::new();
    if !params.registry.is_empty() {
        image.push_str(params.registry.trim_end_matches('/'));
        image.push('/');
    }
    if !params.image_namespace().is_empty() {
        image.push_str(params.image_namespace());
        image.push('/');
    }
    image.push_str(&format!("{}:{}", name, tag));
    image
}

/// Generate the workload for a component.
///
/// Spec-declared variables come before variables imported from the run
/// image. Probes are only attached when declared.
pub fn generate_deployment(
    spec: &ComponentSpec,
    identity: &Identity,
    overrides: &Overrides,
    params: &RuntimeParams,
    image: Option<&ImageInfo>,
) -> Deployment {
    let name = identity.name();

    let mut env: Vec<_> = resolve_local(spec, overrides, params.defaults)
        .into_iter()
        .map(env_var)
        .collect();
    if params.base_envs {
        if let Some(info) = image {
            env.extend(info.env_vars().into_iter().map(env_var));
        }
    }

    let env_from: Vec<EnvFromSource> = spec
        .spec
        .environment
        .local
        .iter()
        .filter(|v| v.is_reference())
        .map(|v| {
            if v.secret_from.is_empty() {
                EnvFromSource {
                    config_map_ref: Some(ConfigMapEnvSource {
                        name: v.env_from.to_lowercase(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }
            } else {
                EnvFromSource {
                    secret_ref: Some(SecretEnvSource {
                        name: v.secret_from.to_lowercase(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }
            }
        })
        .collect();

    let ports = image.map(ImageInfo::container_ports).unwrap_or_default();

    let container = Container {
        name: name.to_string(),
        image: Some(workload_image(identity, params)),
        image_pull_policy: Some(PULL_IF_NOT_PRESENT.to_string()),
        ports: (!ports.is_empty()).then_some(ports),
        env: (!env.is_empty()).then_some(env),
        env_from: (!env_from.is_empty()).then_some(env_from),
        readiness_probe: spec.spec.readiness().cloned(),
        liveness_probe: spec.spec.liveness().cloned(),
        startup_probe: spec.spec.startup().cloned(),
        ..Default::default()
    };

    let mut pod_labels = crate::labels::labels(identity, params);
    pod_labels.insert(DEPLOYMENT_LABEL.to_string(), name.to_string());
    let mut selector = crate::labels::selector(identity);
    selector.insert(DEPLOYMENT_LABEL.to_string(), name.to_string());

    let mut metadata = object_meta(name, identity, params);
    metadata.labels = Some(pod_labels.clone());

    let affinity = params.anti_affinity.enabled.then(|| {
        soft_pod_anti_affinity(
            identity,
            &params.anti_affinity.topology_key,
            params.anti_affinity.weight,
        )
    });

    Deployment {
        metadata,
        spec: Some(DeploymentSpec {
            replicas: Some(params.replicas.unwrap_or(DEFAULT_REPLICAS)),
            revision_history_limit: Some(REVISION_HISTORY_LIMIT),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            strategy: Some(DeploymentStrategy {
                type_: Some("RollingUpdate".to_string()),
                rolling_update: Some(RollingUpdateDeployment {
                    max_surge: Some(IntOrString::String(MAX_SURGE.to_string())),
                    max_unavailable: Some(IntOrString::String(MAX_UNAVAILABLE.to_string())),
                }),
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    affinity,
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
