//! Labels and selectors for generated resources.

use mg_core::{Identity, RuntimeParams};
use std::collections::BTreeMap;

pub const APP_LABEL: &str = "app";
pub const DEPLOYMENT_LABEL: &str = "deployment";

/// Labels put on every generated resource: user-supplied labels plus `app`.
pub fn labels(identity: &Identity, params: &RuntimeParams) -> BTreeMap<String, String> {
    let mut labels = params.labels.clone();
    labels.insert(APP_LABEL.to_string(), identity.name().to_string());
    labels
}

/// Labels selecting the pods of a component.
pub fn selector(identity: &Identity) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), identity.name().to_string())])
}
