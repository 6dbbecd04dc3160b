// ABOUTME: Test support utilities.
// ABOUTME: In-memory runtime and machine fakes plus container service builders.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use dockhand::host::{
    Endpoint, HostDescriptor, MachineDetail, MachineError, MachineInfo, MachineOps,
};
use dockhand::runtime::{
    ContainerConfiguration, ContainerError, ContainerOps, ContainerState, ContainerStatus,
    MountKind, MountPoint, NetworkAttachment, NetworkDescriptor, NetworkError, NetworkOps,
    RemoveOptions, VolumeDescriptor, VolumeError, VolumeOps,
};
use dockhand::service::{ContainerService, ServiceOptions, ServiceState};
use dockhand::types::{ContainerId, NetworkId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("dockhand=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

// =============================================================================
// Fake runtime
// =============================================================================

/// Runtime operations a test can make fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Inspect,
    Start,
    Stop,
    Remove,
    InspectVolumes,
    RemoveVolumes,
    ListNetworks,
}

/// A call the fake runtime received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Inspect(String),
    Start(String),
    Stop(String, Option<Duration>),
    Remove(String, RemoveOptions),
    InspectVolumes(Vec<String>),
    RemoveVolumes { force: bool, names: Vec<String> },
    ListNetworks,
}

/// In-memory runtime holding containers, volumes and networks.
#[derive(Default)]
pub struct FakeRuntime {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Op>>,
    containers: Mutex<HashMap<String, ContainerConfiguration>>,
    volumes: Mutex<BTreeMap<String, VolumeDescriptor>>,
    networks: Mutex<Vec<NetworkDescriptor>>,
    exits_on_start: Mutex<bool>,
    stalled: Mutex<HashSet<Op>>,
}

impl FakeRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Runtime already holding `config`.
    pub fn with_container(config: ContainerConfiguration) -> Arc<Self> {
        let runtime = Self::new();
        runtime.add_container(config);
        runtime
    }

    pub fn add_container(&self, config: ContainerConfiguration) {
        self.containers
            .lock()
            .insert(config.id.as_str().to_string(), config);
    }

    pub fn add_volume(&self, name: &str) {
        self.volumes.lock().insert(
            name.to_string(),
            VolumeDescriptor {
                name: name.to_string(),
                driver: "local".to_string(),
                mountpoint: format!("/var/lib/docker/volumes/{name}/_data"),
                labels: HashMap::new(),
            },
        );
    }

    pub fn add_network(&self, id: &str, name: &str) {
        self.networks.lock().push(NetworkDescriptor {
            id: NetworkId::new(id),
            name: name.to_string(),
            driver: "bridge".to_string(),
            scope: "local".to_string(),
        });
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().remove(&op);
    }

    /// Started containers exit at once and are never reported running.
    pub fn exit_on_start(&self) {
        *self.exits_on_start.lock() = true;
    }

    /// `op` takes effect, then yields to the scheduler once before answering.
    pub fn stall(&self, op: Op) {
        self.stalled.lock().insert(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn has_container(&self, id: &str) -> bool {
        self.containers.lock().contains_key(id)
    }

    pub fn has_volume(&self, name: &str) -> bool {
        self.volumes.lock().contains_key(name)
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn failing(&self, op: Op) -> bool {
        self.failing.lock().contains(&op)
    }

    async fn settle(&self, op: Op) {
        let stalled = self.stalled.lock().contains(&op);
        if stalled {
            tokio::task::yield_now().await;
        }
    }

    fn set_running(&self, id: &ContainerId, running: bool) -> Result<(), ContainerError> {
        let mut containers = self.containers.lock();
        let config = containers
            .get_mut(id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        config.status = if running {
            ContainerStatus {
                state: ContainerState::Running,
                running: true,
                exit_code: None,
            }
        } else {
            ContainerStatus {
                state: ContainerState::Exited,
                running: false,
                exit_code: Some(0),
            }
        };
        Ok(())
    }
}

fn injected(op: Op) -> String {
    format!("injected {op:?} failure")
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn inspect_container(
        &self,
        _endpoint: &Endpoint,
        id: &ContainerId,
    ) -> Result<ContainerConfiguration, ContainerError> {
        self.record(Call::Inspect(id.to_string()));
        if self.failing(Op::Inspect) {
            return Err(ContainerError::Runtime(injected(Op::Inspect)));
        }
        let found = self
            .containers
            .lock()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ContainerError::NotFound(id.to_string()));
        self.settle(Op::Inspect).await;
        found
    }

    async fn start_container(
        &self,
        _endpoint: &Endpoint,
        id: &ContainerId,
    ) -> Result<(), ContainerError> {
        self.record(Call::Start(id.to_string()));
        if self.failing(Op::Start) {
            return Err(ContainerError::Runtime(injected(Op::Start)));
        }
        let exits = *self.exits_on_start.lock();
        let started = self.set_running(id, !exits);
        self.settle(Op::Start).await;
        started
    }

    async fn stop_container(
        &self,
        _endpoint: &Endpoint,
        id: &ContainerId,
        timeout: Option<Duration>,
    ) -> Result<(), ContainerError> {
        self.record(Call::Stop(id.to_string(), timeout));
        if self.failing(Op::Stop) {
            return Err(ContainerError::Runtime(injected(Op::Stop)));
        }
        let stopped = self.set_running(id, false);
        self.settle(Op::Stop).await;
        stopped
    }

    async fn remove_container(
        &self,
        _endpoint: &Endpoint,
        id: &ContainerId,
        options: &RemoveOptions,
    ) -> Result<(), ContainerError> {
        self.record(Call::Remove(id.to_string(), options.clone()));
        if self.failing(Op::Remove) {
            return Err(ContainerError::Conflict(injected(Op::Remove)));
        }
        let removed = self
            .containers
            .lock()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()));
        self.settle(Op::Remove).await;
        removed
    }
}

#[async_trait]
impl VolumeOps for FakeRuntime {
    async fn inspect_volumes(
        &self,
        _endpoint: &Endpoint,
        names: &[String],
    ) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        self.record(Call::InspectVolumes(names.to_vec()));
        if self.failing(Op::InspectVolumes) {
            return Err(VolumeError::Runtime(injected(Op::InspectVolumes)));
        }
        let volumes = self.volumes.lock();
        names
            .iter()
            .map(|name| {
                volumes
                    .get(name)
                    .cloned()
                    .ok_or_else(|| VolumeError::NotFound(name.clone()))
            })
            .collect()
    }

    async fn remove_volumes(
        &self,
        _endpoint: &Endpoint,
        force: bool,
        names: &[String],
    ) -> Result<(), VolumeError> {
        self.record(Call::RemoveVolumes {
            force,
            names: names.to_vec(),
        });
        if self.failing(Op::RemoveVolumes) {
            return Err(VolumeError::Runtime(injected(Op::RemoveVolumes)));
        }
        let mut volumes = self.volumes.lock();
        for name in names {
            volumes.remove(name);
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkOps for FakeRuntime {
    async fn list_networks(
        &self,
        _endpoint: &Endpoint,
    ) -> Result<Vec<NetworkDescriptor>, NetworkError> {
        self.record(Call::ListNetworks);
        if self.failing(Op::ListNetworks) {
            return Err(NetworkError::Runtime(injected(Op::ListNetworks)));
        }
        Ok(self.networks.lock().clone())
    }
}

// =============================================================================
// Container fixtures
// =============================================================================

/// A created, not running container.
pub fn configuration(id: &str, name: &str) -> ContainerConfiguration {
    ContainerConfiguration {
        id: ContainerId::new(id),
        name: name.to_string(),
        image: "nginx:latest".to_string(),
        status: ContainerStatus {
            state: ContainerState::Created,
            running: false,
            exit_code: None,
        },
        mounts: Vec::new(),
        networks: BTreeMap::new(),
        labels: HashMap::new(),
    }
}

pub fn named_mount(name: &str, destination: &str) -> MountPoint {
    MountPoint {
        kind: MountKind::Volume,
        name: Some(name.to_string()),
        source: format!("/var/lib/docker/volumes/{name}/_data"),
        destination: destination.to_string(),
        read_write: true,
    }
}

pub fn bind_mount(source: &str, destination: &str) -> MountPoint {
    MountPoint {
        kind: MountKind::Bind,
        name: None,
        source: source.to_string(),
        destination: destination.to_string(),
        read_write: false,
    }
}

pub fn attachment(network_id: &str) -> NetworkAttachment {
    NetworkAttachment {
        network_id: NetworkId::new(network_id),
        ip_address: "172.17.0.2".to_string(),
        gateway: "172.17.0.1".to_string(),
        aliases: Vec::new(),
    }
}

/// Service for `id` on the native host, backed by `runtime`.
pub fn service(runtime: &Arc<FakeRuntime>, id: &str, options: ServiceOptions) -> ContainerService {
    ContainerService::new(
        "web",
        ContainerId::new(id),
        HostDescriptor::native(None, None),
        Endpoint::local(),
        runtime.clone(),
        options,
    )
}

/// Service starting out in `state` with default options otherwise.
pub fn service_in(runtime: &Arc<FakeRuntime>, id: &str, state: ServiceState) -> ContainerService {
    service(
        runtime,
        id,
        ServiceOptions {
            state,
            ..ServiceOptions::default()
        },
    )
}

/// Every state the service reports from now on.
pub fn record_states(service: &ContainerService) -> Arc<Mutex<Vec<ServiceState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    service.on_state_change(move |_, change| sink.lock().push(change.state));
    seen
}

// =============================================================================
// Fake machine tool
// =============================================================================

/// Scripted machine tool.
#[derive(Default)]
pub struct FakeMachines {
    pub present: bool,
    pub listing_fails: bool,
    machines: Vec<(MachineInfo, Option<PathBuf>)>,
    uninspectable: HashSet<String>,
}

impl FakeMachines {
    pub fn installed() -> Self {
        Self {
            present: true,
            ..Self::default()
        }
    }

    pub fn machine(mut self, name: &str, url: Option<&str>, cert_dir: Option<&str>) -> Self {
        let state = if url.is_some() { "Running" } else { "Stopped" };
        self.machines.push((
            MachineInfo {
                name: name.to_string(),
                url: url.map(str::to_string),
                state: state.to_string(),
            },
            cert_dir.map(PathBuf::from),
        ));
        self
    }

    pub fn uninspectable(mut self, name: &str) -> Self {
        self.uninspectable.insert(name.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }
}

#[async_trait]
impl MachineOps for FakeMachines {
    async fn is_present(&self) -> bool {
        self.present
    }

    async fn list_machines(&self) -> Result<Vec<MachineInfo>, MachineError> {
        if self.listing_fails {
            return Err(MachineError::Failed {
                command: "ls".to_string(),
                stderr: "listing exploded".to_string(),
            });
        }
        Ok(self.machines.iter().map(|(info, _)| info.clone()).collect())
    }

    async fn inspect(&self, name: &str) -> Result<MachineDetail, MachineError> {
        if self.uninspectable.contains(name) {
            return Err(MachineError::Failed {
                command: format!("inspect {name}"),
                stderr: "inspect exploded".to_string(),
            });
        }
        self.machines
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(info, cert_dir)| MachineDetail {
                name: info.name.clone(),
                cert_dir: cert_dir.clone(),
            })
            .ok_or_else(|| MachineError::Failed {
                command: format!("inspect {name}"),
                stderr: "no such machine".to_string(),
            })
    }
}
