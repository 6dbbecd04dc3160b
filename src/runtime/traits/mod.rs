// ABOUTME: Composable capability traits for the container runtime client.
// ABOUTME: Defines ContainerOps, VolumeOps, NetworkOps and the RuntimeClient umbrella.

mod container;
mod network;
mod shared_types;
mod volume;

pub use container::{ContainerError, ContainerOps};
pub use network::{NetworkError, NetworkOps};
pub use shared_types::*;
pub use volume::{VolumeError, VolumeOps};

/// Everything a container service needs from the runtime.
///
/// Implemented automatically for any type providing all capabilities, so test
/// doubles only implement the three capability traits.
pub trait RuntimeClient: ContainerOps + VolumeOps + NetworkOps {}

impl<T: ContainerOps + VolumeOps + NetworkOps> RuntimeClient for T {}

/// Failure to reach the runtime behind an endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectError {
    #[error("no address configured for host {0}")]
    NoAddress(String),

    #[error("TLS material missing under {0}")]
    MissingCertificates(String),

    #[error("failed to connect to {endpoint}: {reason}")]
    Failed { endpoint: String, reason: String },
}
