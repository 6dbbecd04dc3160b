// ABOUTME: Bollard-based runtime client implementation.
// ABOUTME: Supports Docker and Podman via the Docker-compatible API, one cached connection per endpoint.

use crate::host::Endpoint;
use crate::runtime::traits::{
    ConnectError, ContainerConfiguration, ContainerError, ContainerOps, ContainerState,
    ContainerStatus, MountKind, MountPoint, NetworkAttachment, NetworkDescriptor, NetworkError,
    NetworkOps, RemoveOptions, VolumeDescriptor, VolumeError, VolumeOps,
};
use crate::types::{ContainerId, HostUri, NetworkId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerStateStatusEnum, MountPointTypeEnum};
use bollard::query_parameters::{
    InspectContainerOptions, ListNetworksOptions, RemoveContainerOptions, RemoveVolumeOptions,
    StartContainerOptions, StopContainerOptions,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Seconds bollard waits on a request before giving up.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn status_of(e: &bollard::errors::Error) -> Option<u16> {
    match e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

fn map_container_error(e: bollard::errors::Error, id: &ContainerId) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(format!("{}: {}", id, message)),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::Conflict(format!("{}: {}", id, message)),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_volume_error(e: bollard::errors::Error, name: &str) -> VolumeError {
    match status_of(&e) {
        Some(404) => VolumeError::NotFound(name.to_string()),
        Some(409) => VolumeError::InUse(name.to_string()),
        _ => VolumeError::Runtime(format!("{}: {}", name, e)),
    }
}

// =============================================================================
// BollardClient
// =============================================================================

/// Runtime client speaking the Docker-compatible API through bollard.
///
/// Connections are created lazily per endpoint and reused.
pub struct BollardClient {
    connections: Mutex<HashMap<Endpoint, Docker>>,
    timeout_secs: u64,
}

impl Default for BollardClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BollardClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            timeout_secs: timeout.as_secs().max(1),
        }
    }

    fn connect(&self, endpoint: &Endpoint) -> Result<Docker, ConnectError> {
        if let Some(docker) = self.connections.lock().get(endpoint) {
            return Ok(docker.clone());
        }

        let failed = |e: bollard::errors::Error| ConnectError::Failed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        };

        let docker = match (&endpoint.uri, &endpoint.certificates) {
            (None, _) => Docker::connect_with_defaults().map_err(failed)?,
            (Some(HostUri::Unix(path)), _) => Docker::connect_with_unix(
                &path.to_string_lossy(),
                self.timeout_secs,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(failed)?,
            (Some(uri @ HostUri::Tcp { .. }), Some(certs)) => {
                if !certs.exist() {
                    return Err(ConnectError::MissingCertificates(
                        certs
                            .ca_certificate
                            .parent()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                    ));
                }
                Docker::connect_with_ssl(
                    &uri.to_string(),
                    &certs.client_key,
                    &certs.client_certificate,
                    &certs.ca_certificate,
                    self.timeout_secs,
                    bollard::API_DEFAULT_VERSION,
                )
                .map_err(failed)?
            }
            (Some(uri @ HostUri::Tcp { .. }), None) => Docker::connect_with_http(
                &uri.to_string(),
                self.timeout_secs,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(failed)?,
        };

        tracing::debug!(%endpoint, "connected to runtime");
        self.connections
            .lock()
            .insert(endpoint.clone(), docker.clone());
        Ok(docker)
    }
}

#[async_trait]
impl ContainerOps for BollardClient {
    async fn inspect_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
    ) -> Result<ContainerConfiguration, ContainerError> {
        let docker = self.connect(endpoint)?;
        let details = docker
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_container_error(e, id))?;

        // Parse state
        let runtime_state = details.state.as_ref();
        let state = runtime_state
            .and_then(|s| s.status)
            .map(|s| match s {
                ContainerStateStatusEnum::CREATED => ContainerState::Created,
                ContainerStateStatusEnum::RUNNING => ContainerState::Running,
                ContainerStateStatusEnum::PAUSED => ContainerState::Paused,
                ContainerStateStatusEnum::RESTARTING => ContainerState::Restarting,
                ContainerStateStatusEnum::REMOVING => ContainerState::Removing,
                ContainerStateStatusEnum::EXITED => ContainerState::Exited,
                ContainerStateStatusEnum::DEAD => ContainerState::Dead,
                _ => ContainerState::Exited,
            })
            .unwrap_or(ContainerState::Exited);
        let status = ContainerStatus {
            state,
            running: runtime_state.and_then(|s| s.running).unwrap_or(false),
            exit_code: runtime_state.and_then(|s| s.exit_code),
        };

        // Parse mounts
        let mounts = details
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(|m| MountPoint {
                kind: match m.typ {
                    Some(MountPointTypeEnum::BIND) => MountKind::Bind,
                    Some(MountPointTypeEnum::VOLUME) => MountKind::Volume,
                    Some(MountPointTypeEnum::TMPFS) => MountKind::Tmpfs,
                    _ => MountKind::Other,
                },
                name: m.name.filter(|n| !n.is_empty()),
                source: m.source.unwrap_or_default(),
                destination: m.destination.unwrap_or_default(),
                read_write: m.rw.unwrap_or(true),
            })
            .collect();

        // Parse network settings
        let mut networks = BTreeMap::new();
        if let Some(ref network_settings) = details.network_settings
            && let Some(ref nets) = network_settings.networks
        {
            for (name, endpoint) in nets {
                networks.insert(
                    name.clone(),
                    NetworkAttachment {
                        network_id: NetworkId::new(endpoint.network_id.clone().unwrap_or_default()),
                        ip_address: endpoint.ip_address.clone().unwrap_or_default(),
                        gateway: endpoint.gateway.clone().unwrap_or_default(),
                        aliases: endpoint.aliases.clone().unwrap_or_default(),
                    },
                );
            }
        }

        Ok(ContainerConfiguration {
            id: details
                .id
                .map(ContainerId::new)
                .unwrap_or_else(|| id.clone()),
            name: details
                .name
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            image: details
                .config
                .as_ref()
                .and_then(|c| c.image.clone())
                .unwrap_or_default(),
            status,
            mounts,
            networks,
            labels: details.config.and_then(|c| c.labels).unwrap_or_default(),
        })
    }

    async fn start_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
    ) -> Result<(), ContainerError> {
        let docker = self.connect(endpoint)?;
        match docker
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
        {
            Ok(()) => Ok(()),
            // Already running
            Err(e) if status_of(&e) == Some(304) => Ok(()),
            Err(e) => Err(map_container_error(e, id)),
        }
    }

    async fn stop_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
        timeout: Option<Duration>,
    ) -> Result<(), ContainerError> {
        let docker = self.connect(endpoint)?;
        let opts = timeout.map(|t| StopContainerOptions {
            t: Some(t.as_secs().min(i32::MAX as u64) as i32),
            signal: None,
        });

        match docker.stop_container(id.as_str(), opts).await {
            Ok(()) => Ok(()),
            // Already stopped
            Err(e) if status_of(&e) == Some(304) => Ok(()),
            Err(e) => Err(map_container_error(e, id)),
        }
    }

    async fn remove_container(
        &self,
        endpoint: &Endpoint,
        id: &ContainerId,
        options: &RemoveOptions,
    ) -> Result<(), ContainerError> {
        let docker = self.connect(endpoint)?;
        let opts = RemoveContainerOptions {
            force: options.force,
            v: options.volumes,
            link: options.link,
            ..Default::default()
        };

        docker
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(|e| map_container_error(e, id))
    }
}

#[async_trait]
impl VolumeOps for BollardClient {
    async fn inspect_volumes(
        &self,
        endpoint: &Endpoint,
        names: &[String],
    ) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        let docker = self.connect(endpoint)?;

        let inspections = names.iter().map(|name| {
            let docker = docker.clone();
            async move {
                docker
                    .inspect_volume(name)
                    .await
                    .map(|v| VolumeDescriptor {
                        name: v.name,
                        driver: v.driver,
                        mountpoint: v.mountpoint,
                        labels: v.labels,
                    })
                    .map_err(|e| map_volume_error(e, name))
            }
        });

        futures::future::try_join_all(inspections).await
    }

    async fn remove_volumes(
        &self,
        endpoint: &Endpoint,
        force: bool,
        names: &[String],
    ) -> Result<(), VolumeError> {
        let docker = self.connect(endpoint)?;

        let mut first_error = None;
        for name in names {
            let opts = RemoveVolumeOptions { force };
            if let Err(e) = docker.remove_volume(name, Some(opts)).await {
                tracing::debug!(volume = %name, error = %e, "volume removal failed");
                first_error.get_or_insert(map_volume_error(e, name));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NetworkOps for BollardClient {
    async fn list_networks(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Vec<NetworkDescriptor>, NetworkError> {
        let docker = self.connect(endpoint)?;
        let networks = docker
            .list_networks(None::<ListNetworksOptions>)
            .await
            .map_err(|e| NetworkError::Runtime(e.to_string()))?;

        Ok(networks
            .into_iter()
            .map(|n| NetworkDescriptor {
                id: NetworkId::new(n.id.unwrap_or_default()),
                name: n.name.unwrap_or_default(),
                driver: n.driver.unwrap_or_default(),
                scope: n.scope.unwrap_or_default(),
            })
            .collect())
    }
}
