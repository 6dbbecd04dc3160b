// ABOUTME: Container lifecycle service with per-state hooks and change notification.
// ABOUTME: Also the value handles for volumes and networks a container uses.

mod container;
mod error;
mod events;
mod handles;
mod state;

pub use container::{ContainerService, ServiceHooks};
pub use error::{ServiceError, ServiceErrorKind};
pub use events::{StateChange, StateObserver, StateObservers, SubscriptionId};
pub use handles::{NetworkService, VolumeService};
pub use state::{DisposePolicy, ServiceOptions, ServiceState};
