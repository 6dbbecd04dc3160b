// ABOUTME: Lifecycle states of a container service and its construction options.
// ABOUTME: Includes the disposal policy applied when a service is torn down.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Where a container service is in its lifecycle.
///
/// One pass runs Unknown/Stopped → Starting → Running → Stopping → Stopped →
/// Removing → Removed. A failed runtime call leaves the service in the
/// intermediate state it had entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[default]
    Unknown,
    Starting,
    Running,
    Stopping,
    Stopped,
    Removing,
    Removed,
}

impl ServiceState {
    pub const ALL: [ServiceState; 7] = [
        ServiceState::Unknown,
        ServiceState::Starting,
        ServiceState::Running,
        ServiceState::Stopping,
        ServiceState::Stopped,
        ServiceState::Removing,
        ServiceState::Removed,
    ];

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Removed)
    }

    /// States entered before a runtime call whose outcome is still unconfirmed.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            ServiceState::Starting | ServiceState::Stopping | ServiceState::Removing
        )
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Unknown => "unknown",
            ServiceState::Starting => "starting",
            ServiceState::Running => "running",
            ServiceState::Stopping => "stopping",
            ServiceState::Stopped => "stopped",
            ServiceState::Removing => "removing",
            ServiceState::Removed => "removed",
        };
        write!(f, "{s}")
    }
}

/// What `dispose` tears down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DisposePolicy {
    #[serde(default = "default_true")]
    pub stop_on_dispose: bool,

    #[serde(default = "default_true")]
    pub remove_on_dispose: bool,

    /// Remove anonymous volumes together with the container.
    #[serde(default)]
    pub remove_mounts_on_dispose: bool,

    /// Force-remove named volumes mounted into the container.
    #[serde(default)]
    pub remove_named_mounts_on_dispose: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisposePolicy {
    fn default() -> Self {
        DisposePolicy {
            stop_on_dispose: true,
            remove_on_dispose: true,
            remove_mounts_on_dispose: false,
            remove_named_mounts_on_dispose: false,
        }
    }
}

impl DisposePolicy {
    /// Leave the container untouched on dispose.
    pub fn keep() -> Self {
        DisposePolicy {
            stop_on_dispose: false,
            remove_on_dispose: false,
            remove_mounts_on_dispose: false,
            remove_named_mounts_on_dispose: false,
        }
    }

    pub fn tears_down(&self) -> bool {
        self.stop_on_dispose || self.remove_on_dispose
    }
}

/// Options fixed when a service is bound to a container.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    /// State the container is known to be in.
    pub state: ServiceState,
    pub dispose: DisposePolicy,
    /// Grace period before the runtime kills a stopping container.
    pub stop_timeout: Option<Duration>,
    pub is_windows_container: bool,
}
