use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use mg_core::params::DEFAULT_CONTEXT;
use mg_core::{Identity, RuntimeParams};

use crate::image_info::{ImageInfo, service_ports};
use crate::manifest::ResourceKind;
use crate::object_meta;
use crate::openshift::{Route, RoutePort, RouteSpec, RouteTargetReference};

/// Generate the route exposing a component's service under the context path.
pub fn generate_route(
    identity: &Identity,
    params: &RuntimeParams,
    image: Option<&ImageInfo>,
) -> Route {
    let kind = ResourceKind::Route;
    let path = if params.context.is_empty() {
        DEFAULT_CONTEXT.to_string()
    } else {
        params.context.clone()
    };
    // Route to the first service port, which is the lowest exposed one.
    let port = service_ports(image)
        .into_iter()
        .next()
        .and_then(|p| p.name)
        .map(|name| RoutePort {
            target_port: IntOrString::String(name),
        });

    Route {
        api_version: kind.api_version(),
        kind: kind.kind().to_string(),
        metadata: object_meta(identity.name(), identity, params),
        spec: RouteSpec {
            host: None,
            path,
            to: RouteTargetReference {
                kind: ResourceKind::Service.kind().to_string(),
                name: identity.name().to_string(),
                weight: 100,
            },
            port,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::testutil::orders;

    #[test]
    fn test_route_targets_service() {
        let identity = Identity::resolve(&orders(), "");
        let params = RuntimeParams {
            context: "/orders".to_string(),
            ..Default::default()
        };

        let route = generate_route(&identity, &params, None);
        assert_eq!(route.spec.path, "/orders");
        assert_eq!(route.spec.to.kind, "Service");
        assert_eq!(route.spec.to.name, "ordersv2");
        assert_eq!(
            route.spec.port.as_ref().unwrap().target_port,
            IntOrString::String("8080-tcp".to_string())
        );

        let body = route.to_payload().unwrap().into_body();
        assert_eq!(body["apiVersion"], "route.openshift.io/v1");
        assert!(body["spec"].get("host").is_none());
    }

    #[test]
    fn test_route_default_context() {
        let identity = Identity::resolve(&orders(), "");
        let params = RuntimeParams {
            context: String::new(),
            ..Default::default()
        };
        assert_eq!(generate_route(&identity, &params, None).spec.path, "/");
    }
}
