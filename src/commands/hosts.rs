// ABOUTME: Host resolution and the hosts command.
// ABOUTME: Merges configured hosts with machines and the native runtime found on this machine.

use async_trait::async_trait;
use dockhand::config::{Config, HostEntry};
use dockhand::host::{
    DockerMachine, HostDescriptor, Hosts, MachineDetail, MachineError, MachineInfo, MachineOps,
    discover,
};
use dockhand::output::Output;
use dockhand::runtime::{NativeRuntime, detect_native};
use serde::Serialize;

/// Stand-in when machine discovery is switched off in the config.
struct MachinesDisabled;

#[async_trait]
impl MachineOps for MachinesDisabled {
    async fn is_present(&self) -> bool {
        false
    }

    async fn list_machines(&self) -> Result<Vec<MachineInfo>, MachineError> {
        Ok(Vec::new())
    }

    async fn inspect(&self, name: &str) -> Result<MachineDetail, MachineError> {
        Err(MachineError::Failed {
            command: format!("inspect {name}"),
            stderr: "machine discovery is disabled".to_string(),
        })
    }
}

/// Configured hosts first, then whatever discovery finds.
pub async fn load_hosts(config: &Config) -> Hosts {
    let native = if config.discovery.native {
        detect_native()
    } else {
        NativeRuntime::Absent
    };

    let discovered = if config.discovery.machines {
        discover(&DockerMachine::default(), &native).await
    } else {
        discover(&MachinesDisabled, &native).await
    };

    let configured = config.hosts.iter().map(HostEntry::to_descriptor).collect();
    Hosts::merge(configured, discovered)
}

#[derive(Serialize)]
struct HostRow<'a> {
    name: &'a str,
    uri: Option<String>,
    native: bool,
    cert_dir: Option<String>,
}

impl<'a> From<&'a HostDescriptor> for HostRow<'a> {
    fn from(host: &'a HostDescriptor) -> Self {
        HostRow {
            name: host.name(),
            uri: host.uri().map(ToString::to_string),
            native: host.is_native(),
            cert_dir: host.cert_dir().map(|p| p.display().to_string()),
        }
    }
}

pub fn list_hosts(hosts: &Hosts, output: &Output) {
    if hosts.is_empty() {
        output.success("no hosts found");
        return;
    }
    for host in hosts.iter() {
        output.record("host", &HostRow::from(host), host);
    }
}
