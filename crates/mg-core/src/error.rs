//! Error types for mg.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed image reference: {0:?}")]
    InvalidImageReference(String),

    #[error("failed to {action} {kind} {name} in namespace {namespace}: {message}")]
    Remote {
        action: &'static str,
        kind: String,
        name: String,
        namespace: String,
        message: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
