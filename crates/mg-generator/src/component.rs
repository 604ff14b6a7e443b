//! Generation of the full resource set of one component.

use mg_core::{ComponentSpec, Identity, Overrides, Result, RuntimeParams};
use tracing::debug;

use crate::application::generate_application;
use crate::buildconfig::generate_buildconfig;
use crate::configmap::{config_map_names, generate_config_maps};
use crate::deployment::generate_deployment;
use crate::image_info::ImageInfo;
use crate::imagestream::generate_imagestream;
use crate::manifest::{Manifest, Payload, ResourceKind, ResourceRef};
use crate::pdb::{generate_default_pdb, generate_pdb};
use crate::route::generate_route;
use crate::secret::{generate_secrets, teardown_secret_names};
use crate::service::generate_service;

/// Kinds applied when bringing a component up, in order.
pub const UP_ORDER: &[ResourceKind] = &[
    ResourceKind::Secret,
    ResourceKind::ConfigMap,
    ResourceKind::ImageStream,
    ResourceKind::BuildConfig,
    ResourceKind::Deployment,
    ResourceKind::Service,
    ResourceKind::Route,
    ResourceKind::PodDisruptionBudget,
];

/// Kinds removed when tearing a component down, in order.
pub const DOWN_ORDER: &[ResourceKind] = &[
    ResourceKind::Route,
    ResourceKind::Service,
    ResourceKind::PodDisruptionBudget,
    ResourceKind::Deployment,
    ResourceKind::BuildConfig,
    ResourceKind::ConfigMap,
    ResourceKind::ImageStream,
    ResourceKind::Secret,
];

/// Generates the resources of one component.
///
/// Inputs are fixed at construction and never mutated, so repeated calls
/// yield identical payloads.
pub struct ComponentGenerator<'a> {
    spec: &'a ComponentSpec,
    identity: Identity,
    overrides: &'a Overrides,
    params: &'a RuntimeParams,
    build_image: Option<ImageInfo>,
    run_image: Option<ImageInfo>,
}

impl<'a> ComponentGenerator<'a> {
    pub fn new(spec: &'a ComponentSpec, overrides: &'a Overrides, params: &'a RuntimeParams) -> Self {
        Self {
            identity: Identity::resolve(spec, &params.version_override),
            spec,
            overrides,
            params,
            build_image: None,
            run_image: None,
        }
    }

    /// Metadata of the image builds run in.
    pub fn with_build_image(mut self, info: ImageInfo) -> Self {
        self.build_image = Some(info);
        self
    }

    /// Metadata of the image the workload runs on.
    pub fn with_run_image(mut self, info: ImageInfo) -> Self {
        self.run_image = Some(info);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Payloads for bringing the component up, in apply order.
    pub fn up(&self) -> Result<Vec<Payload>> {
        let mut payloads = Vec::new();
        for kind in UP_ORDER {
            payloads.extend(self.payloads_for(*kind)?);
        }
        Ok(payloads)
    }

    /// Payloads of a single kind. Kinds with one resource per entry may yield
    /// none or several.
    pub fn payloads_for(&self, kind: ResourceKind) -> Result<Vec<Payload>> {
        let spec = self.spec;
        let identity = &self.identity;
        let params = self.params;
        let run_image = self.run_image.as_ref().or(self.build_image.as_ref());

        debug!(kind = %kind, name = %identity, "Generating");
        match kind {
            ResourceKind::Secret => collect(generate_secrets(spec, identity, params)),
            ResourceKind::ConfigMap => {
                collect(generate_config_maps(spec, identity, self.overrides, params))
            }
            ResourceKind::ImageStream => single(&generate_imagestream(identity, params)),
            ResourceKind::BuildConfig => single(&generate_buildconfig(
                spec,
                identity,
                self.overrides,
                params,
                self.build_image.as_ref(),
            )?),
            ResourceKind::Deployment => single(&generate_deployment(
                spec,
                identity,
                self.overrides,
                params,
                run_image,
            )),
            ResourceKind::Service => single(&generate_service(identity, params, run_image)),
            ResourceKind::Route => single(&generate_route(identity, params, run_image)),
            ResourceKind::PodDisruptionBudget => match params.replicas {
                Some(replicas) => single(&generate_pdb(identity, params, replicas)),
                None => single(&generate_default_pdb(identity, params)),
            },
            ResourceKind::Application => {
                single(&generate_application(spec, identity, params))
            }
        }
    }

    /// Resources to remove when tearing the component down, in delete order.
    ///
    /// Secrets are only listed with `everything` set, and global secrets
    /// never are.
    pub fn teardown(&self) -> Vec<ResourceRef> {
        let name = self.identity.name();
        let mut targets = Vec::new();

        for kind in DOWN_ORDER {
            match kind {
                ResourceKind::ConfigMap => targets.extend(
                    config_map_names(self.spec, &self.identity)
                        .into_iter()
                        .map(|n| ResourceRef::new(*kind, n)),
                ),
                ResourceKind::Secret if self.params.everything => targets.extend(
                    teardown_secret_names(self.spec)
                        .into_iter()
                        .map(|n| ResourceRef::new(*kind, n)),
                ),
                ResourceKind::Secret => {}
                _ => targets.push(ResourceRef::new(*kind, name)),
            }
        }
        targets
    }
}

fn single<M: Manifest>(manifest: &M) -> Result<Vec<Payload>> {
    Ok(vec![manifest.to_payload()?])
}

fn collect<M: Manifest>(manifests: Vec<M>) -> Result<Vec<Payload>> {
    manifests.iter().map(|m| m.to_payload()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::orders;
    use mg_core::spec::{Config, ConfigParam, DeclaredSecret, EnvironmentVar};

    fn spec() -> ComponentSpec {
        let mut spec = orders();
        spec.spec.build_image = "openshift/java:8".to_string();
        spec.spec.repository = "https://git.example.com/orders.git".to_string();
        spec.spec.environment.local = vec![EnvironmentVar {
            name: "DB_HOST".to_string(),
            required: true,
            default: "localhost".to_string(),
            ..Default::default()
        }];
        spec.spec.config = vec![Config {
            name: "app".to_string(),
            options: vec![ConfigParam {
                name: "pool".to_string(),
                default: "10".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }];
        spec.spec.secret = vec![DeclaredSecret {
            name: "api-key".to_string(),
            ..Default::default()
        }];
        spec
    }

    fn kinds(payloads: &[Payload]) -> Vec<ResourceKind> {
        payloads.iter().map(Payload::kind).collect()
    }

    #[test]
    fn test_up_order() {
        let spec = spec();
        let overrides = Overrides::new();
        let params = RuntimeParams::default();
        let generator = ComponentGenerator::new(&spec, &overrides, &params);

        let payloads = generator.up().unwrap();
        assert_eq!(kinds(&payloads), UP_ORDER.to_vec());
        assert!(payloads.iter().all(|p| p.resource_version().is_none()));
        assert_eq!(payloads[1].name(), "ordersv2-app");
        assert_eq!(payloads[3].name(), "ordersv2");
    }

    #[test]
    fn test_generation_is_repeatable() {
        let spec = spec();
        let overrides: Overrides = [("DB_HOST", "prod-db")].into_iter().collect();
        let params = RuntimeParams::default();
        let generator = ComponentGenerator::new(&spec, &overrides, &params);

        assert_eq!(generator.up().unwrap(), generator.up().unwrap());
        let deployment = &generator.payloads_for(ResourceKind::Deployment).unwrap()[0];
        assert_eq!(
            deployment.body()["spec"]["template"]["spec"]["containers"][0]["env"][0]["value"],
            "prod-db"
        );
    }

    #[test]
    fn test_version_override_flows_into_names() {
        let spec = spec();
        let overrides = Overrides::new();
        let params = RuntimeParams {
            version_override: "pr12".to_string(),
            ..Default::default()
        };
        let generator = ComponentGenerator::new(&spec, &overrides, &params);

        assert_eq!(generator.identity().name(), "ordersv2-pr12");
        let route = &generator.payloads_for(ResourceKind::Route).unwrap()[0];
        assert_eq!(route.body()["spec"]["to"]["name"], "ordersv2-pr12");
    }

    #[test]
    fn test_binary_source_end_to_end() {
        let mut spec = spec();
        spec.spec.base_run_image = "openshift/jre:17".to_string();
        let overrides = Overrides::new();
        let params = RuntimeParams::default();
        let generator = ComponentGenerator::new(&spec, &overrides, &params);

        let bc = &generator.payloads_for(ResourceKind::BuildConfig).unwrap()[0];
        assert_eq!(bc.body()["spec"]["source"]["type"], "Binary");
        assert!(bc.body()["spec"]["source"].get("git").is_none());
    }

    #[test]
    fn test_teardown_order() {
        let spec = spec();
        let overrides = Overrides::new();
        let params = RuntimeParams::default();
        let generator = ComponentGenerator::new(&spec, &overrides, &params);

        let targets: Vec<String> = generator.teardown().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            targets,
            vec![
                "Route/ordersv2",
                "Service/ordersv2",
                "PodDisruptionBudget/ordersv2",
                "Deployment/ordersv2",
                "BuildConfig/ordersv2",
                "ConfigMap/ordersv2-app",
                "ImageStream/ordersv2",
            ]
        );

        let everything = RuntimeParams {
            everything: true,
            ..Default::default()
        };
        let generator = ComponentGenerator::new(&spec, &overrides, &everything);
        let last = generator.teardown().pop().unwrap();
        assert_eq!(last, ResourceRef::new(ResourceKind::Secret, "api-key"));
    }
}
