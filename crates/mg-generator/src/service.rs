use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use mg_core::{Identity, RuntimeParams};

use crate::image_info::{ImageInfo, service_ports};
use crate::labels::selector;
use crate::object_meta;

/// Generate the service fronting a component's pods.
pub fn generate_service(
    identity: &Identity,
    params: &RuntimeParams,
    image: Option<&ImageInfo>,
) -> Service {
    Service {
        metadata: object_meta(identity.name(), identity, params),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(selector(identity)),
            ports: Some(service_ports(image)),
            session_affinity: Some("None".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
