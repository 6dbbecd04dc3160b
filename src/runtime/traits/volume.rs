// ABOUTME: Volume operations trait for the runtime client.
// ABOUTME: Inspect and remove named volumes.

use super::ConnectError;
use super::shared_types::VolumeDescriptor;
use crate::host::Endpoint;
use async_trait::async_trait;

/// Volume operations against one endpoint.
#[async_trait]
pub trait VolumeOps: Send + Sync {
    /// Inspect the named volumes, returning descriptors in the order of `names`.
    /// Fails if any volume cannot be inspected.
    async fn inspect_volumes(
        &self,
        endpoint: &Endpoint,
        names: &[String],
    ) -> Result<Vec<VolumeDescriptor>, VolumeError>;

    /// Remove the named volumes. Every name is attempted; the first failure is returned.
    async fn remove_volumes(
        &self,
        endpoint: &Endpoint,
        force: bool,
        names: &[String],
    ) -> Result<(), VolumeError>;
}

/// Errors from volume operations.
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("volume not found: {0}")]
    NotFound(String),

    #[error("volume in use, cannot remove: {0}")]
    InUse(String),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("runtime error: {0}")]
    Runtime(String),
}
