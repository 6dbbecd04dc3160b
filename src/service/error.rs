// ABOUTME: Query error type for container services, SNAFU style.
// ABOUTME: Carries the container id and the runtime failure behind it.

use snafu::Snafu;

use crate::runtime::{ConnectError, ContainerError, NetworkError, VolumeError};
use crate::types::ContainerId;

/// Failure of a container service query.
///
/// State transitions never return this; their outcome shows in `state()`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    #[snafu(display("failed to inspect container {id}: {source}"))]
    Configuration {
        id: ContainerId,
        source: ContainerError,
    },

    #[snafu(display("failed to get attached volumes on container {id}: {source}"))]
    Volumes {
        id: ContainerId,
        source: VolumeError,
    },

    #[snafu(display("failed to get networks that container {id} is attached to: {source}"))]
    Networks {
        id: ContainerId,
        source: NetworkError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The container (or one of its volumes) does not exist.
    NotFound,
    /// The runtime endpoint could not be reached.
    ConnectionFailed,
    /// The runtime rejected or failed the request.
    RuntimeOperation,
}

impl ServiceError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Configuration { source, .. } => match source {
                ContainerError::NotFound(_) => ServiceErrorKind::NotFound,
                ContainerError::Connect(_) => ServiceErrorKind::ConnectionFailed,
                ContainerError::Conflict(_) | ContainerError::Runtime(_) => {
                    ServiceErrorKind::RuntimeOperation
                }
            },
            ServiceError::Volumes { source, .. } => match source {
                VolumeError::NotFound(_) => ServiceErrorKind::NotFound,
                VolumeError::Connect(_) => ServiceErrorKind::ConnectionFailed,
                VolumeError::InUse(_) | VolumeError::Runtime(_) => {
                    ServiceErrorKind::RuntimeOperation
                }
            },
            ServiceError::Networks { source, .. } => match source {
                NetworkError::Connect(_) => ServiceErrorKind::ConnectionFailed,
                NetworkError::Runtime(_) => ServiceErrorKind::RuntimeOperation,
            },
        }
    }

    /// Container the failed query was about.
    pub fn container_id(&self) -> &ContainerId {
        match self {
            ServiceError::Configuration { id, .. }
            | ServiceError::Volumes { id, .. }
            | ServiceError::Networks { id, .. } => id,
        }
    }

    /// Connection failure behind this error, if that is what it was.
    pub fn connection_error(&self) -> Option<&ConnectError> {
        match self {
            ServiceError::Configuration {
                source: ContainerError::Connect(e),
                ..
            }
            | ServiceError::Volumes {
                source: VolumeError::Connect(e),
                ..
            }
            | ServiceError::Networks {
                source: NetworkError::Connect(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}
