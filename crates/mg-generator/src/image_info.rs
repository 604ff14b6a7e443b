//! Metadata of a builder or base image.

use k8s_openapi::api::core::v1::{ContainerPort, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use mg_core::env::{ResolvedVar, import_image_env};

pub const DEFAULT_PORT: i32 = 8080;
pub const DEFAULT_PROTOCOL: &str = "TCP";

/// Environment and exposed ports declared by an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInfo {
    /// `KEY=value` entries.
    pub env: Vec<String>,
    /// Exposed ports in `port/protocol` form, e.g. `8080/tcp`.
    pub exposed_ports: Vec<String>,
}

impl ImageInfo {
    /// Image variables eligible for import.
    pub fn env_vars(&self) -> Vec<ResolvedVar> {
        import_image_env(&self.env)
    }

    /// Parsed `(port, protocol)` pairs, sorted and without unparsable entries.
    pub fn ports(&self) -> Vec<(i32, String)> {
        let mut ports: Vec<(i32, String)> = self
            .exposed_ports
            .iter()
            .filter_map(|p| {
                let (port, protocol) = p.split_once('/').unwrap_or((p.as_str(), "tcp"));
                let port = port.trim().parse::<i32>().ok()?;
                Some((port, protocol.trim().to_uppercase()))
            })
            .collect();
        ports.sort();
        ports.dedup();
        ports
    }

    pub fn container_ports(&self) -> Vec<ContainerPort> {
        self.ports()
            .into_iter()
            .map(|(port, protocol)| ContainerPort {
                container_port: port,
                protocol: Some(protocol),
                ..Default::default()
            })
            .collect()
    }
}

/// Service ports for a workload, falling back to `8080/TCP` without image metadata.
pub fn service_ports(image: Option<&ImageInfo>) -> Vec<ServicePort> {
    let mut ports = image.map(|i| i.ports()).unwrap_or_default();
    if ports.is_empty() {
        ports.push((DEFAULT_PORT, DEFAULT_PROTOCOL.to_string()));
    }

    ports
        .into_iter()
        .map(|(port, protocol)| ServicePort {
            name: Some(format!("{}-{}", port, protocol.to_lowercase())),
            port,
            protocol: Some(protocol),
            target_port: Some(IntOrString::Int(port)),
            ..Default::default()
        })
        .collect()
}
