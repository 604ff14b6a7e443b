//! Reconciliation of generated manifests.
//!
//! The [`Reconciler`] maps payloads onto create, replace and delete calls
//! against a [`ResourceStore`], or renders them when running dry.
//!
//! Backends:
//! - Kubernetes/OpenShift API ([`KubeStore`])

pub mod kubernetes;
pub mod output;
pub mod reconciler;
pub mod store;

pub use kubernetes::KubeStore;
pub use reconciler::{Outcome, Reconciler};
pub use store::{RemoteState, ResourceStore, StoreError};
