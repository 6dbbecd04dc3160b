// ABOUTME: Local runtime detection for Docker and Podman.
// ABOUTME: Probes well-known sockets once and classifies the result as native, emulated or absent.

use super::types::{NativeRuntime, RuntimeInfo, RuntimeType};
use std::path::{Path, PathBuf};

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Probe the local system for a container runtime.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
/// 4. Docker Desktop user socket (`$HOME/.docker/run/docker.sock`)
///
/// Sockets 1-3 are native on Linux; anywhere else the engine lives in a VM and
/// the result is emulated. The user socket is always emulated.
pub fn detect_native() -> NativeRuntime {
    let native = cfg!(target_os = "linux");
    let probe = Probe {
        uid: get_uid(),
        home: std::env::var_os("HOME").map(PathBuf::from),
        native,
    };
    probe.detect(|path| path.exists())
}

struct Probe {
    uid: Option<String>,
    home: Option<PathBuf>,
    native: bool,
}

impl Probe {
    fn detect(&self, exists: impl Fn(&Path) -> bool) -> NativeRuntime {
        let classify = |info: RuntimeInfo| {
            if self.native {
                NativeRuntime::Native(info)
            } else {
                NativeRuntime::Emulated(info)
            }
        };

        // 1. Rootless Podman
        if let Some(uid) = &self.uid {
            let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
            if exists(Path::new(&rootless_socket)) {
                return classify(RuntimeInfo {
                    runtime_type: RuntimeType::Podman,
                    socket_path: rootless_socket,
                });
            }
        }

        // 2. Rootful Podman
        if exists(Path::new(ROOTFUL_PODMAN)) {
            return classify(RuntimeInfo {
                runtime_type: RuntimeType::Podman,
                socket_path: ROOTFUL_PODMAN.to_string(),
            });
        }

        // 3. Docker
        if exists(Path::new(DOCKER_SOCKET)) {
            return classify(RuntimeInfo {
                runtime_type: RuntimeType::Docker,
                socket_path: DOCKER_SOCKET.to_string(),
            });
        }

        // 4. Docker Desktop
        if let Some(home) = &self.home {
            let desktop_socket = home.join(".docker").join("run").join("docker.sock");
            if exists(&desktop_socket) {
                return NativeRuntime::Emulated(RuntimeInfo {
                    runtime_type: RuntimeType::Docker,
                    socket_path: desktop_socket.display().to_string(),
                });
            }
        }

        NativeRuntime::Absent
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
