//! Canonical resource naming.
//!
//! Every resource generated for a component is named from the component name,
//! the major part of its declared version and an optional version override:
//!
//! | version   | override | name          |
//! |-----------|----------|---------------|
//! | `2.3.1`   |          | `ordersv2`    |
//! | `2.3.1`   | `pr12`   | `ordersv2-pr12` |
//! | `unknown` |          | `orders`      |
//! | `unknown` | `pr12`   | `orders-pr12` |

use derive_more::Display;
use tracing::debug;

use crate::spec::{ComponentSpec, Config, Resource};
use crate::version::VersionInfo;

/// The resolved names of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name}")]
pub struct Identity {
    name: String,
    display: String,
}

impl Identity {
    pub fn resolve(spec: &ComponentSpec, version_override: &str) -> Self {
        Self {
            name: resolve_name(spec, version_override),
            display: resolve_display_name(spec, version_override),
        }
    }

    /// Lower-cased name used for every generated resource.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-preserving variant used for display and application grouping.
    pub fn display_name(&self) -> &str {
        &self.display
    }
}

/// Lower-cased resource name for a component.
pub fn resolve_name(spec: &ComponentSpec, version_override: &str) -> String {
    let version = VersionInfo::parse(spec.version());
    compose(&spec.name().to_lowercase(), &version, version_override)
}

/// Resource name preserving the component's original casing.
pub fn resolve_display_name(spec: &ComponentSpec, version_override: &str) -> String {
    let version = VersionInfo::parse(spec.version());
    compose(spec.name(), &version, version_override)
}

fn compose(name: &str, version: &VersionInfo, version_override: &str) -> String {
    let base = match version.major() {
        Some(major) => format!("{}v{}", name, major),
        None => {
            debug!(name, version = %version, "Version is not semantic, using unversioned name");
            name.to_string()
        }
    };

    if version_override.is_empty() {
        base
    } else {
        format!("{}-{}", base, version_override)
    }
}

/// Name of the credential secret for an external resource dependency.
///
/// A user without an explicit secret yields an implicit `<resource>-<user>`
/// secret, which is treated as a global secret.
pub fn resource_secret_name(resource: &Resource) -> String {
    if !resource.user.is_empty() && resource.secret.is_empty() {
        format!(
            "{}-{}",
            resource.name.to_lowercase(),
            resource.user.to_lowercase()
        )
    } else if !resource.secret.is_empty() {
        resource.secret.to_lowercase()
    } else {
        resource.name.to_lowercase()
    }
}

/// Whether the resource's secret is derived implicitly from its user.
pub fn is_implicit_secret(resource: &Resource) -> bool {
    !resource.user.is_empty() && resource.secret.is_empty()
}

pub fn config_secret_name(config: &Config) -> String {
    config.name.to_lowercase()
}

/// Name of the config map generated for a non-certificate config entry.
pub fn config_map_name(identity: &Identity, config: &Config) -> String {
    format!("{}-{}", identity.name(), config.name.replace('.', "-")).to_lowercase()
}
