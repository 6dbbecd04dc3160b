// ABOUTME: Stateful handle over one container on one host.
// ABOUTME: Drives start/stop/remove through the runtime client and notifies observers and hooks.

use parking_lot::{ReentrantMutex, RwLock};
use snafu::ResultExt;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

use super::error::{ConfigurationSnafu, NetworksSnafu, ServiceError, VolumesSnafu};
use super::events::{StateChange, StateObservers, SubscriptionId};
use super::handles::{NetworkService, VolumeService};
use super::state::{DisposePolicy, ServiceOptions, ServiceState};
use crate::hooks::{HookRegistry, generate_key};
use crate::host::{CertificatePaths, Endpoint, HostDescriptor};
use crate::runtime::{ContainerConfiguration, RemoveOptions, RuntimeClient};
use crate::types::ContainerId;

/// Hooks keyed by the state a container service reaches.
pub type ServiceHooks = HookRegistry<ContainerService>;

/// Last configuration fetched from the runtime.
#[derive(Debug, Clone, Default)]
enum ConfigCache {
    #[default]
    Unfetched,
    Fetched(Arc<ContainerConfiguration>),
}

impl ConfigCache {
    fn get(&self) -> Option<Arc<ContainerConfiguration>> {
        match self {
            ConfigCache::Unfetched => None,
            ConfigCache::Fetched(config) => Some(Arc::clone(config)),
        }
    }
}

/// Stateful handle over one container.
///
/// Transitions (`start`, `stop`, `remove`, `dispose`) never fail: a runtime
/// error is logged and the service stays in the intermediate state it had
/// entered. Queries (`configuration`, `volumes`, `networks`) return errors.
///
/// Call [`ContainerService::dispose`] before dropping; `Drop` cannot run the
/// async teardown and only warns.
pub struct ContainerService {
    name: String,
    id: ContainerId,
    host: HostDescriptor,
    endpoint: Endpoint,
    is_windows_container: bool,
    dispose_policy: DisposePolicy,
    stop_timeout: Option<Duration>,
    client: Arc<dyn RuntimeClient>,

    state: RwLock<ServiceState>,
    // Re-entrant so a hook may drive a nested transition on the same thread.
    transition: ReentrantMutex<()>,
    config: RwLock<ConfigCache>,
    hooks: ServiceHooks,
    observers: StateObservers<ContainerService>,
    disposed: AtomicBool,
    disposing: AtomicBool,
}

/// Clears the in-flight dispose marker, also when the dispose future is dropped.
struct DisposeInFlight<'a>(&'a AtomicBool);

impl Drop for DisposeInFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ContainerService {
    pub fn new(
        name: impl Into<String>,
        id: ContainerId,
        host: HostDescriptor,
        endpoint: Endpoint,
        client: Arc<dyn RuntimeClient>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            host,
            endpoint,
            is_windows_container: options.is_windows_container,
            dispose_policy: options.dispose,
            stop_timeout: options.stop_timeout,
            client,
            state: RwLock::new(options.state),
            transition: ReentrantMutex::new(()),
            config: RwLock::new(ConfigCache::Unfetched),
            hooks: HookRegistry::new(),
            observers: StateObservers::new(),
            disposed: AtomicBool::new(false),
            disposing: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn host(&self) -> &HostDescriptor {
        &self.host
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn certificates(&self) -> Option<&CertificatePaths> {
        self.endpoint.certificates.as_ref()
    }

    pub fn is_windows_container(&self) -> bool {
        self.is_windows_container
    }

    pub fn dispose_policy(&self) -> &DisposePolicy {
        &self.dispose_policy
    }

    pub fn stop_timeout(&self) -> Option<Duration> {
        self.stop_timeout
    }

    pub fn state(&self) -> ServiceState {
        *self.state.read()
    }

    pub fn hooks(&self) -> &ServiceHooks {
        &self.hooks
    }

    /// The container's configuration, from cache unless `fresh` or never fetched.
    ///
    /// A successful fetch replaces the cached snapshot; a failed one leaves it.
    pub async fn configuration(
        &self,
        fresh: bool,
    ) -> Result<Arc<ContainerConfiguration>, ServiceError> {
        if !fresh {
            let cached = self.config.read().get();
            if let Some(config) = cached {
                return Ok(config);
            }
        }

        tracing::debug!(container_id = %self.id, fresh, "inspecting container");
        let config = self
            .client
            .inspect_container(&self.endpoint, &self.id)
            .await
            .context(ConfigurationSnafu {
                id: self.id.clone(),
            })?;

        let config = Arc::new(config);
        *self.config.write() = ConfigCache::Fetched(Arc::clone(&config));
        Ok(config)
    }

    /// Start the container; `Running` once the runtime reports it running.
    pub async fn start(&self) -> &Self {
        if self.refuse_when_removed("start") {
            return self;
        }

        self.set_state(ServiceState::Starting);
        if let Err(e) = self.client.start_container(&self.endpoint, &self.id).await {
            tracing::warn!(container_id = %self.id, error = %e, "failed to start container");
            return self;
        }

        match self.configuration(true).await {
            Ok(config) if config.is_running() => self.set_state(ServiceState::Running),
            Ok(_) => tracing::warn!(
                container_id = %self.id,
                "container started but runtime does not report it running"
            ),
            Err(e) => tracing::warn!(
                container_id = %self.id,
                error = %e,
                "failed to confirm container start"
            ),
        }
        self
    }

    /// Stop the container, waiting the configured timeout before it is killed.
    pub async fn stop(&self) {
        if self.refuse_when_removed("stop") {
            return;
        }

        self.set_state(ServiceState::Stopping);
        match self
            .client
            .stop_container(&self.endpoint, &self.id, self.stop_timeout)
            .await
        {
            Ok(()) => self.set_state(ServiceState::Stopped),
            Err(e) => {
                tracing::warn!(container_id = %self.id, error = %e, "failed to stop container")
            }
        }
    }

    /// Remove the container, stopping it first unless already stopped.
    ///
    /// `remove_volumes` also removes anonymous volumes. No-op once removed.
    pub async fn remove(&self, force: bool, remove_volumes: bool) {
        self.remove_container(force, remove_volumes, false).await;
    }

    async fn remove_container(&self, force: bool, remove_volumes: bool, disposing: bool) {
        if self.state().is_terminal() {
            tracing::debug!(container_id = %self.id, "container already removed");
            return;
        }

        if self.state() != ServiceState::Stopped {
            self.stop().await;
        }

        // Resolved up front: a removed container can no longer be inspected.
        let named_mounts = if disposing && self.dispose_policy.remove_named_mounts_on_dispose {
            self.named_mounts().await
        } else {
            Vec::new()
        };

        self.set_state(ServiceState::Removing);
        let options = RemoveOptions {
            force,
            volumes: remove_volumes,
            link: false,
        };
        let removed = self
            .client
            .remove_container(&self.endpoint, &self.id, &options)
            .await;

        if !named_mounts.is_empty() {
            tracing::debug!(container_id = %self.id, volumes = ?named_mounts, "removing named mounts");
            if let Err(e) = self
                .client
                .remove_volumes(&self.endpoint, true, &named_mounts)
                .await
            {
                tracing::warn!(container_id = %self.id, error = %e, "failed to remove named mounts");
            }
        }

        match removed {
            Ok(()) => self.set_state(ServiceState::Removed),
            Err(e) => {
                tracing::warn!(container_id = %self.id, error = %e, "failed to remove container")
            }
        }
    }

    async fn named_mounts(&self) -> Vec<String> {
        match self.configuration(false).await {
            Ok(config) => config.named_mounts(),
            Err(e) => {
                tracing::warn!(
                    container_id = %self.id,
                    error = %e,
                    "cannot resolve named mounts, leaving them in place"
                );
                Vec::new()
            }
        }
    }

    /// Tear down according to the dispose policy.
    ///
    /// Idempotent: once removed, or for a service without an id, nothing is
    /// sent to the runtime. A call made while another dispose is in flight
    /// returns at once. Never fails.
    pub async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);

        if self.id.is_empty() {
            return;
        }
        if self.state().is_terminal() {
            tracing::debug!(container_id = %self.id, "dispose: already removed");
            return;
        }
        if self.disposing.swap(true, Ordering::SeqCst) {
            tracing::debug!(container_id = %self.id, "dispose: already in progress");
            return;
        }
        let _in_flight = DisposeInFlight(&self.disposing);

        tracing::debug!(container_id = %self.id, policy = ?self.dispose_policy, "disposing container");
        if self.dispose_policy.stop_on_dispose && self.state() != ServiceState::Stopped {
            self.stop().await;
        }
        if self.dispose_policy.remove_on_dispose {
            self.remove_container(true, self.dispose_policy.remove_mounts_on_dispose, true)
                .await;
        }
    }

    /// Handles for the named volumes mounted into the container.
    pub async fn volumes(&self) -> Result<Vec<VolumeService>, ServiceError> {
        let config = self.configuration(false).await?;
        let names = config.named_mounts();
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let volumes = self
            .client
            .inspect_volumes(&self.endpoint, &names)
            .await
            .context(VolumesSnafu {
                id: self.id.clone(),
            })?;

        Ok(volumes
            .into_iter()
            .map(|v| VolumeService::new(v.name, self.endpoint.clone(), false))
            .collect())
    }

    /// Handles for the networks the container is attached to, ordered by name.
    pub async fn networks(&self) -> Result<Vec<NetworkService>, ServiceError> {
        let config = self.configuration(false).await?;
        let listed = self
            .client
            .list_networks(&self.endpoint)
            .await
            .context(NetworksSnafu {
                id: self.id.clone(),
            })?;

        let known: HashSet<&str> = listed.iter().map(|n| n.id.as_str()).collect();
        Ok(config
            .networks
            .iter()
            .map(|(name, attachment)| {
                if !known.contains(attachment.network_id.as_str()) {
                    tracing::debug!(
                        container_id = %self.id,
                        network = %name,
                        "attached network not listed by runtime"
                    );
                }
                NetworkService::new(attachment.network_id.clone(), name, self.endpoint.clone())
            })
            .collect())
    }

    /// Register `hook` for `state`. A `None` key gets a generated one;
    /// re-using a key replaces that hook.
    pub fn add_hook<F>(&self, state: ServiceState, hook: F, key: Option<&str>) -> &Self
    where
        F: Fn(&ContainerService, ServiceState) + Send + Sync + 'static,
    {
        let key = key.map(str::to_string).unwrap_or_else(generate_key);
        self.hooks.add(key, state, hook);
        self
    }

    pub fn remove_hook(&self, key: &str) -> &Self {
        if !self.hooks.remove(key) {
            tracing::debug!(container_id = %self.id, %key, "no hook registered under key");
        }
        self
    }

    /// Observe every state transition. Observers run before hooks.
    pub fn on_state_change<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&ContainerService, &StateChange) + Send + Sync + 'static,
    {
        self.observers.observe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unobserve(id)
    }

    /// Channel of state changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.observers.subscribe()
    }

    fn refuse_when_removed(&self, operation: &str) -> bool {
        let removed = self.state().is_terminal();
        if removed {
            tracing::warn!(container_id = %self.id, operation, "container already removed");
        }
        removed
    }

    /// Store `state` and, when it changed, notify observers then hooks.
    ///
    /// `Removed` is never left.
    fn set_state(&self, state: ServiceState) {
        let _transition = self.transition.lock();

        let previous = {
            let mut current = self.state.write();
            if *current == state {
                return;
            }
            if current.is_terminal() {
                tracing::debug!(container_id = %self.id, %state, "ignoring transition out of removed");
                return;
            }
            std::mem::replace(&mut *current, state)
        };

        tracing::info!(container_id = %self.id, %previous, %state, "container state changed");
        let change = StateChange {
            id: self.id.clone(),
            name: self.name.clone(),
            previous,
            state,
        };
        self.observers.notify(self, &change);

        let ran = self.hooks.execute(self, state);
        if ran > 0 {
            tracing::debug!(container_id = %self.id, %state, hooks = ran, "ran state hooks");
        }
    }
}

impl fmt::Debug for ContainerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerService")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("host", &self.host.name())
            .field("state", &self.state())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Drop for ContainerService {
    fn drop(&mut self) {
        if self.disposed.load(Ordering::SeqCst)
            || self.id.is_empty()
            || !self.dispose_policy.tears_down()
            || self.state().is_terminal()
        {
            return;
        }
        tracing::warn!(
            container_id = %self.id,
            state = %self.state(),
            "container service dropped without dispose; container left in place"
        );
    }
}
