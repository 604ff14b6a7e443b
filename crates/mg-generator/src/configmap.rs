use k8s_openapi::api::core::v1::ConfigMap;
use mg_core::identity::config_map_name;
use mg_core::spec::Config;
use mg_core::{ComponentSpec, Identity, Overrides, RuntimeParams};
use std::collections::BTreeMap;

use crate::object_meta;

/// Config entries rendered as config maps; certificates become secrets instead.
pub fn config_entries(spec: &ComponentSpec) -> impl Iterator<Item = &Config> {
    spec.spec.config.iter().filter(|c| !c.is_certificate())
}

/// Generate one config map per non-certificate config entry.
///
/// Each option maps to its override when one is supplied, else its declared
/// default.
pub fn generate_config_maps(
    spec: &ComponentSpec,
    identity: &Identity,
    overrides: &Overrides,
    params: &RuntimeParams,
) -> Vec<ConfigMap> {
    config_entries(spec)
        .map(|config| {
            let data: BTreeMap<String, String> = config
                .options
                .iter()
                .map(|o| {
                    let value = overrides.get(&o.name).unwrap_or(&o.default);
                    (o.name.clone(), value.to_string())
                })
                .collect();

            ConfigMap {
                metadata: object_meta(&config_map_name(identity, config), identity, params),
                data: (!data.is_empty()).then_some(data),
                ..Default::default()
            }
        })
        .collect()
}

/// Names of the config maps removed on teardown.
pub fn config_map_names(spec: &ComponentSpec, identity: &Identity) -> Vec<String> {
    config_entries(spec)
        .map(|c| config_map_name(identity, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::orders;
    use mg_core::spec::ConfigParam;

    fn spec() -> ComponentSpec {
        let mut spec = orders();
        spec.spec.config = vec![
            Config {
                name: "App.Properties".to_string(),
                options: vec![
                    ConfigParam {
                        name: "pool.size".to_string(),
                        default: "10".to_string(),
                        ..Default::default()
                    },
                    ConfigParam {
                        name: "timeout".to_string(),
                        default: "30s".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            Config {
                name: "tls".to_string(),
                type_: "cert".to_string(),
                ..Default::default()
            },
        ];
        spec
    }

    #[test]
    fn test_config_maps_skip_certificates() {
        let spec = spec();
        let identity = Identity::resolve(&spec, "");
        let overrides: Overrides = [("timeout", "5s")].into_iter().collect();

        let maps = generate_config_maps(&spec, &identity, &overrides, &RuntimeParams::default());
        assert_eq!(maps.len(), 1);
        assert_eq!(
            maps[0].metadata.name.as_deref(),
            Some("ordersv2-app-properties")
        );
        let data = maps[0].data.as_ref().unwrap();
        assert_eq!(data["pool.size"], "10");
        assert_eq!(data["timeout"], "5s");

        assert_eq!(
            config_map_names(&spec, &identity),
            vec!["ordersv2-app-properties".to_string()]
        );
    }
}
