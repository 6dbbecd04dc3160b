// ABOUTME: Container operations trait for the runtime client.
// ABOUTME: Inspect, start, stop and remove containers by id.

use super::ConnectError;
use super::shared_types::{ContainerConfiguration, RemoveOptions};
use crate::host::Endpoint;
use crate::types::ContainerId;
use async_trait::async_trait;
use std::time::Duration;

/// Container lifecycle operations against one endpoint.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Get the runtime's authoritative description of a container.
    async fn inspect_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
    ) -> Result<ContainerConfiguration, ContainerError>;

    /// Start a created or stopped container. Starting a running container succeeds.
    async fn start_container(&self, endpoint: &Endpoint, id: &ContainerId)
    -> Result<(), ContainerError>;

    /// Stop a container, waiting `timeout` before killing it (engine default when `None`).
    /// Stopping a stopped container succeeds.
    async fn stop_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
        timeout: Option<Duration>,
    ) -> Result<(), ContainerError>;

    /// Remove a container.
    async fn remove_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
        options: &RemoveOptions,
    ) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("runtime error: {0}")]
    Runtime(String),
}
