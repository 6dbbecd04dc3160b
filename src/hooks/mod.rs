// ABOUTME: Lifecycle hook registry keyed by target service state.
// ABOUTME: Ordered, keyed callbacks executed synchronously when a service reaches their state.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::service::ServiceState;

/// Callback run when its subject reaches the registered state.
pub type Hook<T> = Arc<dyn Fn(&T, ServiceState) + Send + Sync>;

struct Entry<T> {
    key: String,
    state: ServiceState,
    hook: Hook<T>,
}

/// Ordered collection of named callbacks keyed by target state.
///
/// Hooks run in insertion order. `execute` works on a snapshot taken under the
/// read lock, so a running hook may add or remove hooks (including itself);
/// such changes apply from the next execution on.
pub struct HookRegistry<T> {
    entries: RwLock<Vec<Entry<T>>>,
}

impl<T> Default for HookRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T> HookRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for `state` under `key`.
    ///
    /// Re-using a key replaces that hook and its target state but keeps its
    /// position in the execution order.
    pub fn add<F>(&self, key: impl Into<String>, state: ServiceState, hook: F)
    where
        F: Fn(&T, ServiceState) + Send + Sync + 'static,
    {
        let key = key.into();
        let hook: Hook<T> = Arc::new(hook);
        let mut entries = self.entries.write();

        if let Some(entry) = entries.iter_mut().find(|e| e.key == key) {
            tracing::debug!(%key, %state, "replacing hook");
            entry.state = state;
            entry.hook = hook;
            return;
        }

        tracing::debug!(%key, %state, "registering hook");
        entries.push(Entry { key, state, hook });
    }

    /// Deregister the hook stored under `key`. Returns whether one was removed.
    pub fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.key != key);
        before != entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Run every hook registered for exactly `state`, in insertion order.
    /// Returns how many ran.
    pub fn execute(&self, subject: &T, state: ServiceState) -> usize {
        let matching: Vec<Hook<T>> = self
            .entries
            .read()
            .iter()
            .filter(|e| e.state == state)
            .map(|e| Arc::clone(&e.hook))
            .collect();

        for hook in &matching {
            hook(subject, state);
        }
        matching.len()
    }
}

impl<T> fmt::Debug for HookRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_list()
            .entries(entries.iter().map(|e| (&e.key, e.state)))
            .finish()
    }
}

/// Unique key for a hook registered without one.
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}
