// ABOUTME: State-change notification for container services.
// ABOUTME: Synchronous observers plus a broadcast channel, fired before per-state hooks.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::state::ServiceState;
use crate::types::ContainerId;

const CHANNEL_CAPACITY: usize = 64;

/// One effective state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub id: ContainerId,
    pub name: String,
    pub previous: ServiceState,
    pub state: ServiceState,
}

/// Callback told about every state transition of its subject.
pub type StateObserver<T> = Arc<dyn Fn(&T, &StateChange) + Send + Sync>;

/// Handle returned when registering an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observers of one subject's state changes.
pub struct StateObservers<T> {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, StateObserver<T>)>>,
    sender: broadcast::Sender<StateChange>,
}

impl<T> Default for StateObservers<T> {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
            sender,
        }
    }
}

impl<T> StateObservers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&T, &StateChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, Arc::new(observer)));
        id
    }

    pub fn unobserve(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        before != observers.len()
    }

    /// Receiver for changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }

    /// Tell observers in registration order, then publish on the channel.
    pub fn notify(&self, subject: &T, change: &StateChange) {
        let observers: Vec<StateObserver<T>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in &observers {
            observer(subject, change);
        }

        // No receivers is fine
        let _ = self.sender.send(change.clone());
    }
}
