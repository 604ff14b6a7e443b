//! Scheduling affinity rules.

use k8s_openapi::api::core::v1::{
    Affinity, PodAffinityTerm, PodAntiAffinity, WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use mg_core::Identity;

use crate::labels::selector;

/// Prefer spreading a component's pods across the given topology domain.
pub fn soft_pod_anti_affinity(identity: &Identity, topology_key: &str, weight: i32) -> Affinity {
    Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![
                WeightedPodAffinityTerm {
                    weight,
                    pod_affinity_term: PodAffinityTerm {
                        label_selector: Some(LabelSelector {
                            match_labels: Some(selector(identity)),
                            ..Default::default()
                        }),
                        topology_key: topology_key.to_string(),
                        ..Default::default()
                    },
                },
            ]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::orders;

    #[test]
    fn test_soft_anti_affinity() {
        let identity = Identity::resolve(&orders(), "");
        let affinity = soft_pod_anti_affinity(&identity, "topology.kubernetes.io/zone", 42);

        let terms = affinity
            .pod_anti_affinity
            .unwrap()
            .preferred_during_scheduling_ignored_during_execution
            .unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].weight, 42);
        assert_eq!(
            terms[0].pod_affinity_term.topology_key,
            "topology.kubernetes.io/zone"
        );
        let labels = terms[0]
            .pod_affinity_term
            .label_selector
            .as_ref()
            .unwrap()
            .match_labels
            .as_ref()
            .unwrap();
        assert_eq!(labels["app"], "ordersv2");
    }
}
