// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerConfiguration snapshot, mounts, network attachments, volume and network descriptors.

use crate::types::{ContainerId, NetworkId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Snapshot of the runtime's description of one container.
///
/// Produced whole by `ContainerOps::inspect_container`; never patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerConfiguration {
    /// Container ID.
    pub id: ContainerId,
    /// Container name, without the leading slash the engine reports.
    pub name: String,
    /// Image the container was created from.
    pub image: String,
    /// Execution status.
    pub status: ContainerStatus,
    /// Mounts, in the order the runtime reports them.
    pub mounts: Vec<MountPoint>,
    /// Network attachments keyed by network name.
    pub networks: BTreeMap<String, NetworkAttachment>,
    /// Labels.
    pub labels: HashMap<String, String>,
}

impl ContainerConfiguration {
    /// Whether the runtime reported the container as running.
    pub fn is_running(&self) -> bool {
        self.status.running
    }

    /// Names of mounts backed by a named volume.
    pub fn named_mounts(&self) -> Vec<String> {
        self.mounts
            .iter()
            .filter_map(|m| m.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Execution status of a container.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerStatus {
    pub state: ContainerState,
    pub running: bool,
    pub exit_code: Option<i64>,
}

/// Container state as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

/// A mount inside a container.
#[derive(Debug, Clone, Serialize)]
pub struct MountPoint {
    pub kind: MountKind,
    /// Volume name; `None` for bind mounts and tmpfs.
    pub name: Option<String>,
    pub source: String,
    pub destination: String,
    pub read_write: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    Bind,
    Volume,
    Tmpfs,
    Other,
}

/// A container's attachment to one network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkAttachment {
    pub network_id: NetworkId,
    pub ip_address: String,
    pub gateway: String,
    pub aliases: Vec<String>,
}

/// Options for removing a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Kill the container if it is still running.
    pub force: bool,
    /// Remove anonymous volumes attached to the container.
    pub volumes: bool,
    /// Remove the link named by the id instead of the container.
    pub link: bool,
}

/// A volume as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDescriptor {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub labels: HashMap<String, String>,
}

/// A network as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub id: NetworkId,
    pub name: String,
    pub driver: String,
    pub scope: String,
}
