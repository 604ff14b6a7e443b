//! BuildConfig generation.

use k8s_openapi::api::core::v1::{EnvVar, LocalObjectReference, ObjectReference};
use mg_core::build_source::{BuildSource, select_build_source};
use mg_core::env::{ResolvedVar, resolve_build};
use mg_core::image::ImageRef;
use mg_core::{ComponentSpec, Identity, Overrides, Result, RuntimeParams};
use tracing::{debug, warn};

use crate::image_info::ImageInfo;
use crate::manifest::ResourceKind;
use crate::openshift::{
    BinaryBuildSource, BuildConfig, BuildConfigSpec, BuildOutput, BuildSourceSpec, BuildStrategy,
    GitBuildSource, SourceBuildStrategy,
};
use crate::{object_meta, output_target};

pub const RUN_POLICY_SERIAL: &str = "Serial";
pub const STRATEGY_SOURCE: &str = "Source";
const IMAGE_STREAM_TAG: &str = "ImageStreamTag";

/// Image the source strategy builds with: the build image, or the base run
/// image when no build image is declared.
pub fn builder_image(spec: &ComponentSpec) -> Result<ImageRef> {
    let reference = if spec.spec.build_image.is_empty() {
        &spec.spec.base_run_image
    } else {
        &spec.spec.build_image
    };
    ImageRef::parse(reference)
}

/// Generate the build pipeline for a component.
///
/// Variables imported from the builder image come first, followed by the
/// spec's build-scope variables. A malformed builder image reference is an
/// error.
pub fn generate_buildconfig(
    spec: &ComponentSpec,
    identity: &Identity,
    overrides: &Overrides,
    params: &RuntimeParams,
    builder: Option<&ImageInfo>,
) -> Result<BuildConfig> {
    let image = builder_image(spec)?;

    let mut vars: Vec<ResolvedVar> = Vec::new();
    if params.base_envs {
        match builder {
            Some(info) => vars.extend(info.env_vars()),
            None => debug!(image = %image, "No builder image metadata, skipping base envs"),
        }
    }
    vars.extend(resolve_build(spec, overrides, params.defaults));

    let source = match select_build_source(spec, &params.source_ref) {
        BuildSource::Binary => Some(BuildSourceSpec {
            type_: "Binary".to_string(),
            git: None,
            binary: Some(BinaryBuildSource::default()),
            source_secret: None,
        }),
        BuildSource::Git(git) => Some(BuildSourceSpec {
            type_: "Git".to_string(),
            git: Some(GitBuildSource {
                uri: git.uri,
                ref_: git.reference,
            }),
            binary: None,
            source_secret: git.source_secret.map(|name| LocalObjectReference { name }),
        }),
        BuildSource::None => {
            warn!(name = %identity, "No build source could be determined, omitting source");
            None
        }
    };

    let (target, tag) = output_target(identity, params);
    let kind = ResourceKind::BuildConfig;

    Ok(BuildConfig {
        api_version: kind.api_version(),
        kind: kind.kind().to_string(),
        metadata: object_meta(identity.name(), identity, params),
        spec: BuildConfigSpec {
            run_policy: RUN_POLICY_SERIAL.to_string(),
            source,
            strategy: BuildStrategy {
                type_: STRATEGY_SOURCE.to_string(),
                source_strategy: SourceBuildStrategy {
                    from: ObjectReference {
                        kind: Some(IMAGE_STREAM_TAG.to_string()),
                        namespace: Some(image.namespace.clone()),
                        name: Some(image.stream_tag()),
                        ..Default::default()
                    },
                    env: vars.into_iter().map(env_var).collect(),
                },
            },
            output: BuildOutput {
                to: ObjectReference {
                    kind: Some(IMAGE_STREAM_TAG.to_string()),
                    name: Some(format!("{}:{}", target, tag)),
                    ..Default::default()
                },
            },
        },
    })
}

pub(crate) fn env_var(var: ResolvedVar) -> EnvVar {
    EnvVar {
        name: var.name,
        value: Some(var.value),
        ..Default::default()
    }
}
