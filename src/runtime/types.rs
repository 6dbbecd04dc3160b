// ABOUTME: Runtime type definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType enum, RuntimeInfo struct and the NativeRuntime probe result.

use serde::{Deserialize, Serialize};

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Detected runtime information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// The type of runtime detected.
    pub runtime_type: RuntimeType,
    /// Path to the runtime socket.
    pub socket_path: String,
}

/// Whether this machine can talk to a local runtime.
///
/// `Emulated` covers engines running inside a helper VM (Docker Desktop and
/// friends) that still expose a local socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeRuntime {
    Native(RuntimeInfo),
    Emulated(RuntimeInfo),
    Absent,
}

impl NativeRuntime {
    /// Runtime info for native and emulated runtimes.
    pub fn info(&self) -> Option<&RuntimeInfo> {
        match self {
            NativeRuntime::Native(info) | NativeRuntime::Emulated(info) => Some(info),
            NativeRuntime::Absent => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, NativeRuntime::Absent)
    }
}
