//! Component spec data model.
//!
//! A component spec is the declarative description of one deployable unit.
//! It is parsed once per invocation and treated as immutable afterwards.

use k8s_openapi::api::core::v1::Probe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::Result;

/// Config entry type marking a certificate.
pub const CONFIG_TYPE_CERT: &str = "cert";

/// A parsed component spec document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentSpec {
    pub kind: String,
    pub metadata: Metadata,
    pub spec: Spec,
}

impl ComponentSpec {
    /// Decode a component spec from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a component spec file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the spec back to a file, replacing its content.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut content = self.to_json()?;
        content.push('\n');
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &str {
        &self.spec.version
    }
}

/// Component metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

/// The body of a component spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spec {
    /// Declared version, ideally a semantic version.
    pub version: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_: String,
    /// Builder image reference (`[host/]namespace/image[:tag]`).
    pub build_image: String,
    /// Base image the runtime artifact is layered on.
    pub base_run_image: String,
    /// Source repository URL.
    pub repository: String,
    pub branch: String,
    /// Secret granting access to a private repository.
    pub rep_sec_ref: String,
    pub environment: Environment,
    pub resources: Vec<Resource>,
    pub config: Vec<Config>,
    pub secret: Vec<DeclaredSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_probe: Option<Probe>,
}

impl Spec {
    pub fn readiness(&self) -> Option<&Probe> {
        declared(&self.readiness_probe)
    }

    pub fn liveness(&self) -> Option<&Probe> {
        declared(&self.liveness_probe)
    }

    pub fn startup(&self) -> Option<&Probe> {
        declared(&self.startup_probe)
    }
}

/// An empty probe is the zero value and means "not declared".
fn declared(probe: &Option<Probe>) -> Option<&Probe> {
    probe.as_ref().filter(|p| **p != Probe::default())
}

/// Declared environment variables, split by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    /// Run-time variables injected into the workload.
    pub local: Vec<EnvironmentVar>,
    /// Build-time variables injected into the build strategy.
    pub build: Vec<EnvironmentVar>,
}

/// A declared environment variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentVar {
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub type_: String,
    pub description: String,
    pub default: String,
    pub example: String,
    /// Name of the external configuration source that injects the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_source: Option<String>,
    /// Config map whose keys are loaded as variables.
    pub env_from: String,
    /// Secret whose keys are loaded as variables.
    pub secret_from: String,
}

impl EnvironmentVar {
    pub fn is_external(&self) -> bool {
        self.external_source.is_some()
    }

    /// Whether this entry references a config map or secret instead of carrying a value.
    pub fn is_reference(&self) -> bool {
        !self.env_from.is_empty() || !self.secret_from.is_empty()
    }
}

/// An external dependency that needs a credential secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub description: String,
    pub user: String,
    pub secret: String,
    pub template_ref: String,
}

/// A declared configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub description: String,
    pub global: bool,
    pub options: Vec<ConfigParam>,
}

impl Config {
    pub fn is_certificate(&self) -> bool {
        self.type_ == CONFIG_TYPE_CERT
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigParam {
    pub name: String,
    pub required: bool,
    pub description: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub default: String,
}

/// A secret the component expects to exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclaredSecret {
    pub name: String,
    /// Global secrets are shared between components.
    pub global: bool,
    pub description: String,
}
