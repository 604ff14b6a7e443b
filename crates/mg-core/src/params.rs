//! Runtime parameters supplied by the command-line layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

pub const DEFAULT_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";
pub const DEFAULT_AFFINITY_WEIGHT: i32 = 100;
pub const DEFAULT_CONTEXT: &str = "/";

/// Human-readable serialization used for dry-run output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(Error::InvalidInput(format!("unknown output format: {other}"))),
        }
    }
}

/// Soft pod anti-affinity settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiAffinity {
    pub enabled: bool,
    pub topology_key: String,
    pub weight: i32,
}

impl Default for AntiAffinity {
    fn default() -> Self {
        Self {
            enabled: false,
            topology_key: DEFAULT_TOPOLOGY_KEY.to_string(),
            weight: DEFAULT_AFFINITY_WEIGHT,
        }
    }
}

/// Parameters consulted by generators and the reconciler.
///
/// Built once per invocation and passed explicitly; nothing in the core reads
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeParams {
    /// Target namespace.
    pub namespace: String,
    /// Do not contact the remote API.
    pub dry_run: bool,
    /// Render generated resources to the output sink.
    pub output: bool,
    pub format: OutputFormat,
    /// File receiving rendered resources instead of stdout.
    pub output_file: Option<PathBuf>,
    /// Appended to resolved names, e.g. for parallel feature deployments.
    pub version_override: String,
    /// Overrides the spec's branch for source builds.
    pub source_ref: String,
    /// Overrides the build output image stream name.
    pub output_imagestream: String,
    /// Overrides the build output tag.
    pub tag: String,
    /// Container registry host for workload images.
    pub registry: String,
    /// Namespace holding workload images, defaults to `namespace`.
    pub image_namespace: String,
    /// Application context root exposed by the route.
    pub context: String,
    /// Desired replica count, when known.
    pub replicas: Option<i32>,
    pub anti_affinity: AntiAffinity,
    /// Include secrets when tearing a component down.
    pub everything: bool,
    /// Hydrate declared default values.
    pub defaults: bool,
    /// Import environment variables from the builder or base image.
    pub base_envs: bool,
    /// Create global secrets that would otherwise be skipped.
    pub create_globals: bool,
    /// Extra labels put on generated resources.
    pub labels: BTreeMap<String, String>,
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            dry_run: false,
            output: false,
            format: OutputFormat::default(),
            output_file: None,
            version_override: String::new(),
            source_ref: String::new(),
            output_imagestream: String::new(),
            tag: String::new(),
            registry: String::new(),
            image_namespace: String::new(),
            context: DEFAULT_CONTEXT.to_string(),
            replicas: None,
            anti_affinity: AntiAffinity::default(),
            everything: false,
            defaults: false,
            base_envs: false,
            create_globals: false,
            labels: BTreeMap::new(),
        }
    }
}

impl RuntimeParams {
    pub fn image_namespace(&self) -> &str {
        if self.image_namespace.is_empty() {
            &self.namespace
        } else {
            &self.image_namespace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_image_namespace_defaults_to_namespace() {
        let mut params = RuntimeParams {
            namespace: "shop".to_string(),
            ..Default::default()
        };
        assert_eq!(params.image_namespace(), "shop");

        params.image_namespace = "images".to_string();
        assert_eq!(params.image_namespace(), "images");
    }
}
