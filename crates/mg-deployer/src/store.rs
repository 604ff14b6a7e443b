//! The remote side of reconciliation.
//!
//! Lookup and write are separate calls. Nothing guards the window between
//! them: a concurrent change may be overwritten by a replace, or make a
//! create fail with a conflict. The only protection is the resource version
//! token echoed on replace, which the API server checks.

use async_trait::async_trait;
use mg_generator::{Payload, ResourceRef};
use thiserror::Error;

/// What the remote side holds for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteState {
    Absent,
    Present { resource_version: Option<String> },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("{0}")]
    Other(String),
}

impl From<kube::Error> for StoreError {
    fn from(e: kube::Error) -> Self {
        match e {
            kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound,
            kube::Error::Api(resp) => StoreError::Api {
                code: resp.code,
                message: resp.message,
            },
            other => StoreError::Other(other.to_string()),
        }
    }
}

/// Remote resource storage.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Namespace all calls operate in.
    fn namespace(&self) -> &str;

    async fn lookup(&self, target: &ResourceRef) -> Result<RemoteState, StoreError>;

    async fn create(&self, payload: &Payload) -> Result<(), StoreError>;

    /// Replace an existing resource. The payload carries the version token
    /// from the preceding lookup.
    async fn replace(&self, payload: &Payload) -> Result<(), StoreError>;

    async fn delete(&self, target: &ResourceRef) -> Result<(), StoreError>;
}
