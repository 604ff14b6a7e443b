//! PodDisruptionBudget generation.
//!
//! With fewer than two replicas no voluntary disruption is allowed. Otherwise
//! at most half of the replicas, rounded down, may be unavailable.

use k8s_openapi::api::policy::v1::{PodDisruptionBudget, PodDisruptionBudgetSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use mg_core::{Identity, RuntimeParams};

use crate::labels::selector;
use crate::object_meta;

/// Maximum number of unavailable pods for a replica count.
pub fn max_unavailable(replicas: i32) -> i32 {
    if replicas < 2 { 0 } else { replicas / 2 }
}

/// Budget sized from a known replica count.
pub fn generate_pdb(identity: &Identity, params: &RuntimeParams, replicas: i32) -> PodDisruptionBudget {
    budget(
        identity,
        params,
        PodDisruptionBudgetSpec {
            max_unavailable: Some(IntOrString::Int(max_unavailable(replicas))),
            selector: Some(match_app(identity)),
            ..Default::default()
        },
    )
}

/// Budget used while the replica count is unknown.
pub fn generate_default_pdb(identity: &Identity, params: &RuntimeParams) -> PodDisruptionBudget {
    budget(
        identity,
        params,
        PodDisruptionBudgetSpec {
            min_available: Some(IntOrString::Int(1)),
            selector: Some(match_app(identity)),
            ..Default::default()
        },
    )
}

fn budget(
    identity: &Identity,
    params: &RuntimeParams,
    spec: PodDisruptionBudgetSpec,
) -> PodDisruptionBudget {
    PodDisruptionBudget {
        metadata: object_meta(identity.name(), identity, params),
        spec: Some(spec),
        ..Default::default()
    }
}

fn match_app(identity: &Identity) -> LabelSelector {
    LabelSelector {
        match_labels: Some(selector(identity)),
        ..Default::default()
    }
}
