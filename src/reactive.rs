use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::events::SettingsChangedEvent;
use crate::types::Settings;

type Listener = Arc<dyn Fn(&SettingsChangedEvent) + Send + Sync>;

/// Identifies a registered change listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// --- SettingsHandle ---

/// Shared observable wrapper around one [`Settings`] value.
///
/// Cloning the handle is cheap and every clone observes the same value.
/// Mutations applied through [`SettingsHandle::update`] notify all subscribed
/// listeners synchronously, before the mutating call returns.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    value: RwLock<Settings>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl SettingsHandle {
    pub fn new(value: Settings) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                value: RwLock::new(value),
                listeners: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a snapshot of the current value.
    pub fn get(&self) -> Settings {
        self.inner.value.read().unwrap().clone()
    }

    /// Reads through the live value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&Settings) -> R) -> R {
        f(&self.inner.value.read().unwrap())
    }

    /// Applies `f` to the value, then synchronously notifies every listener
    /// with the full post-mutation settings.
    pub fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let (result, snapshot) = {
            let mut guard = self.inner.value.write().unwrap();
            let result = f(&mut guard);
            (result, guard.clone())
        };

        self.notify(&SettingsChangedEvent::new(snapshot));
        result
    }

    /// Registers a change listener invoked on every mutation.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SettingsChangedEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .write()
            .unwrap()
            .push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.write().unwrap();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Builds a read-through projection of one part of the settings.
    pub fn derive<T>(&self, project: impl Fn(&Settings) -> T + Send + Sync + 'static) -> Derived<T> {
        Derived {
            handle: self.clone(),
            project: Arc::new(project),
        }
    }

    fn notify(&self, event: &SettingsChangedEvent) {
        // Snapshot the listener list so listeners may read the handle freely.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .unwrap()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

// --- Derived ---

/// Read-only projection of one part of the settings.
///
/// Holds no copied state; every [`Derived::value`] read consults the live
/// handle, so it can never diverge from the source.
pub struct Derived<T> {
    handle: SettingsHandle,
    project: Arc<dyn Fn(&Settings) -> T + Send + Sync>,
}

impl<T> Derived<T> {
    pub fn value(&self) -> T {
        let project = Arc::clone(&self.project);
        self.handle.with(|settings| project(settings))
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            project: Arc::clone(&self.project),
        }
    }
}
