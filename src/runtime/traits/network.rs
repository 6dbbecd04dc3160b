// ABOUTME: Network operations trait for the runtime client.
// ABOUTME: Lists the networks known to a runtime endpoint.

use super::ConnectError;
use super::shared_types::NetworkDescriptor;
use crate::host::Endpoint;
use async_trait::async_trait;

/// Network operations against one endpoint.
#[async_trait]
pub trait NetworkOps: Send + Sync {
    /// List every network on the endpoint.
    async fn list_networks(&self, endpoint: &Endpoint)
    -> Result<Vec<NetworkDescriptor>, NetworkError>;
}

/// Errors from network operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("runtime error: {0}")]
    Runtime(String),
}
