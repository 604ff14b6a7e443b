//! Environment variable resolution.
//!
//! Declared variables are merged with externally supplied overrides and the
//! default-hydration policy into concrete name/value pairs. Precedence, from
//! highest to lowest:
//!
//! 1. An override for the declared name.
//! 2. For required variables, the declared default unless the variable is
//!    externally sourced.
//! 3. The declared default when default hydration is requested.
//! 4. Empty, or the literal `"null"` for optional build-scope variables.

use tracing::info;

use crate::overrides::Overrides;
use crate::spec::{ComponentSpec, EnvironmentVar};

/// Prefix marking variables whose value is injected by an external source.
pub const EXTERNAL_MARKER: char = '_';

/// Value given to unresolved optional build-scope variables.
pub const BUILD_NULL_VALUE: &str = "null";

/// Image variables never copied into generated resources.
pub const BASE_ENV_BLOCKLIST: &[&str] = &["path", "home", "hostname"];

/// Where a resolved variable ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvScope {
    /// Build strategy environment.
    Build,
    /// Workload container environment.
    Local,
}

/// A resolved name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVar {
    pub name: String,
    pub value: String,
}

impl ResolvedVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Resolve a single declared variable.
pub fn resolve_env_var(
    var: &EnvironmentVar,
    scope: EnvScope,
    overrides: &Overrides,
    populate_defaults: bool,
) -> ResolvedVar {
    let name = match scope {
        EnvScope::Local if var.is_external() => format!("{}{}", EXTERNAL_MARKER, var.name),
        _ => var.name.clone(),
    };

    let value = if var.required {
        let mut value = if !var.default.is_empty() && !var.is_external() {
            var.default.clone()
        } else if populate_defaults {
            var.default.clone()
        } else {
            String::new()
        };

        // Empty overrides do not clear a required value.
        if let Some(v) = overrides.get(&var.name).filter(|v| !v.is_empty()) {
            info!(name = %name, value = %v, "Found override value");
            value = v.to_string();
        }
        value
    } else if let Some(v) = overrides.get(&var.name) {
        v.to_string()
    } else {
        match scope {
            EnvScope::Local if populate_defaults => var.default.clone(),
            EnvScope::Local => String::new(),
            EnvScope::Build if populate_defaults && !var.default.is_empty() => var.default.clone(),
            EnvScope::Build => BUILD_NULL_VALUE.to_string(),
        }
    };

    ResolvedVar { name, value }
}

/// Resolve the run-time variables of a component.
///
/// Entries that reference a config map or secret are skipped; they are
/// attached to the workload as environment sources instead.
pub fn resolve_local(
    spec: &ComponentSpec,
    overrides: &Overrides,
    populate_defaults: bool,
) -> Vec<ResolvedVar> {
    spec.spec
        .environment
        .local
        .iter()
        .filter(|v| !v.is_reference())
        .map(|v| resolve_env_var(v, EnvScope::Local, overrides, populate_defaults))
        .collect()
}

/// Resolve the build-time variables of a component.
pub fn resolve_build(
    spec: &ComponentSpec,
    overrides: &Overrides,
    populate_defaults: bool,
) -> Vec<ResolvedVar> {
    spec.spec
        .environment
        .build
        .iter()
        .map(|v| resolve_env_var(v, EnvScope::Build, overrides, populate_defaults))
        .collect()
}

/// Convert `KEY=value` entries taken from image metadata, dropping blocked names.
pub fn import_image_env(entries: &[String]) -> Vec<ResolvedVar> {
    entries
        .iter()
        .filter_map(|entry| entry.split_once('='))
        .filter(|(name, _)| !BASE_ENV_BLOCKLIST.contains(&name.to_lowercase().as_str()))
        .map(|(name, value)| ResolvedVar::new(name, value))
        .collect()
}
