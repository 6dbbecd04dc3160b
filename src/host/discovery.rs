// ABOUTME: Discovery of reachable runtime hosts.
// ABOUTME: Provisioned machines first, then the native runtime when one was detected.

use super::descriptor::{HostDescriptor, HostError};
use super::machine::MachineOps;
use crate::runtime::NativeRuntime;
use crate::types::HostUri;
use std::path::PathBuf;

/// Environment variable naming the native runtime's certificate directory.
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// Enumerate reachable runtime hosts.
///
/// Only known-host metadata is inspected; nothing is dialled. A failing machine
/// listing contributes no hosts, and a machine that cannot be inspected is
/// skipped. The native host, when `native` is available, comes last.
pub async fn discover(machines: &dyn MachineOps, native: &NativeRuntime) -> Vec<HostDescriptor> {
    let mut hosts = Vec::new();

    if machines.is_present().await {
        match machines.list_machines().await {
            Ok(listed) => {
                for machine in listed {
                    let detail = match machines.inspect(&machine.name).await {
                        Ok(detail) => detail,
                        Err(e) => {
                            tracing::warn!(machine = %machine.name, error = %e, "skipping machine that cannot be inspected");
                            continue;
                        }
                    };

                    let uri = machine.url.as_deref().and_then(|url| match HostUri::parse(url) {
                        Ok(uri) => Some(uri),
                        Err(e) => {
                            tracing::warn!(machine = %machine.name, %url, error = %e, "ignoring unusable machine address");
                            None
                        }
                    });

                    tracing::debug!(machine = %machine.name, state = %machine.state, "discovered machine");
                    hosts.push(HostDescriptor::remote(machine.name, uri, detail.cert_dir));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "machine listing failed, no remote hosts discovered");
            }
        }
    }

    if let Some(info) = native.info() {
        tracing::debug!(socket = %info.socket_path, runtime = %info.runtime_type, "discovered native runtime");
        hosts.push(HostDescriptor::native(
            Some(HostUri::unix(&info.socket_path)),
            native_cert_dir(),
        ));
    }

    hosts
}

/// Certificate directory for the native runtime, from `DOCKER_CERT_PATH`.
pub(crate) fn native_cert_dir() -> Option<PathBuf> {
    std::env::var_os(DOCKER_CERT_PATH)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Known hosts, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct Hosts {
    hosts: Vec<HostDescriptor>,
}

impl Hosts {
    /// Merge configured hosts with discovered ones.
    ///
    /// Configured hosts come first; a discovered host whose name is already
    /// taken is dropped.
    pub fn merge(configured: Vec<HostDescriptor>, discovered: Vec<HostDescriptor>) -> Self {
        let mut hosts = configured;
        for host in discovered {
            if hosts.iter().any(|h| h.name() == host.name()) {
                tracing::debug!(host = %host.name(), "configured host shadows discovered host");
                continue;
            }
            hosts.push(host);
        }
        Self { hosts }
    }

    pub fn get(&self, name: &str) -> Result<&HostDescriptor, HostError> {
        self.hosts
            .iter()
            .find(|h| h.name() == name)
            .ok_or_else(|| HostError::UnknownHost(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostDescriptor> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
