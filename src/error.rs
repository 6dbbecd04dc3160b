// ABOUTME: Application-wide error types for dockhand.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::host::HostError;
use crate::service::{ServiceError, ServiceState};

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to {operation} container {id}, left in state {state}")]
    Transition {
        id: String,
        operation: &'static str,
        state: ServiceState,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
