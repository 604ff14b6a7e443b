//! User configuration file parsing.
//!
//! ```kdl
//! namespace "shop"
//! registry "registry.example.com:5000"
//! image-namespace "images"
//! topology-key "topology.kubernetes.io/zone"
//! anti-affinity-weight 50
//! ```

use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{ConfigError, ConfigResult};

/// Settings read from the user config file. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub namespace: Option<String>,
    pub registry: Option<String>,
    pub image_namespace: Option<String>,
    pub topology_key: Option<String>,
    pub anti_affinity_weight: Option<i32>,
}

/// Default location of the user config file.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/mg/config.kdl"))
}

/// Parse user configuration from KDL text.
pub fn parse_user_config(kdl: &str) -> ConfigResult<UserConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = UserConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "namespace" => config.namespace = get_first_string_arg(node),
            "registry" => config.registry = get_first_string_arg(node),
            "image-namespace" => config.image_namespace = get_first_string_arg(node),
            "topology-key" => config.topology_key = get_first_string_arg(node),
            "anti-affinity-weight" => {
                let weight = get_first_integer_arg(node)
                    .and_then(|w| i32::try_from(w).ok())
                    .filter(|w| (1..=100).contains(w))
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: "anti-affinity-weight".to_string(),
                        message: "expected an integer between 1 and 100".to_string(),
                    })?;
                config.anti_affinity_weight = Some(weight);
            }
            other => debug!(node = other, "Ignoring unknown config node"),
        }
    }

    Ok(config)
}

/// Load the user config.
///
/// An explicitly given path must exist. A missing file at the default
/// location yields an empty config.
pub fn load_user_config(path: Option<&Path>) -> ConfigResult<UserConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(UserConfig::default()),
        },
    };

    info!(path = %path.display(), "Using config file");
    let content = std::fs::read_to_string(&path)?;
    parse_user_config(&content)
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_integer_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}
