use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::errors::SettingsError;
use crate::persistence::{FileStorage, KeyValueStorage, SETTINGS_STORAGE_KEY};
use crate::reactive::{Derived, SettingsHandle};
use crate::types::Settings;

// --- SettingsService ---

/// Owns the reactive settings handle and the write-through persistence wiring.
///
/// Construction loads the stored value (falling soft to defaults) and
/// registers one change listener that re-serializes the whole settings object
/// and stores it under [`SETTINGS_STORAGE_KEY`] on every mutation. A storage
/// write failure is logged and swallowed: the in-memory mutation and its
/// reactive propagation have already taken effect.
pub struct SettingsService {
    handle: SettingsHandle,
}

impl SettingsService {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let handle = SettingsHandle::new(load_or_default(storage.as_ref()));

        handle.subscribe(move |event| {
            if let Err(e) = persist(storage.as_ref(), &event.settings) {
                warn!("Failed to persist settings: {}", e);
            }
        });

        Self { handle }
    }

    /// The live shared handle; clones observe the same value.
    pub fn handle(&self) -> SettingsHandle {
        self.handle.clone()
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Settings {
        self.handle.get()
    }

    pub fn keyboard_shortcuts(&self) -> Derived<bool> {
        self.handle.derive(|s| s.keyboard_shortcuts)
    }

    pub fn set_keyboard_shortcuts(&self, enabled: bool) {
        self.handle.update(|s| s.keyboard_shortcuts = enabled);
    }

    /// Restores defaults through the normal mutation path, so the stored
    /// value is rewritten as well.
    pub fn reset_to_defaults(&self) {
        self.handle.update(|s| *s = Settings::default());
    }
}

fn load_or_default(storage: &dyn KeyValueStorage) -> Settings {
    match storage.get(SETTINGS_STORAGE_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(settings) => {
                debug!("Loaded settings from key '{}'", SETTINGS_STORAGE_KEY);
                settings
            }
            Err(e) => {
                warn!(
                    "Stored settings at key '{}' are malformed, using defaults: {}",
                    SETTINGS_STORAGE_KEY, e
                );
                Settings::default()
            }
        },
        Ok(None) => {
            debug!(
                "No stored settings at key '{}', using defaults",
                SETTINGS_STORAGE_KEY
            );
            Settings::default()
        }
        Err(e) => {
            warn!(
                "Failed to read stored settings at key '{}', using defaults: {}",
                SETTINGS_STORAGE_KEY, e
            );
            Settings::default()
        }
    }
}

fn persist(storage: &dyn KeyValueStorage, settings: &Settings) -> Result<(), SettingsError> {
    let raw = serde_json::to_string(settings)?;
    storage.set(SETTINGS_STORAGE_KEY, &raw)
}

// --- Process-wide singleton ---

static GLOBAL_SERVICE: Lazy<Mutex<Option<Arc<SettingsService>>>> =
    Lazy::new(|| Mutex::new(None));

fn default_storage() -> Arc<dyn KeyValueStorage> {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("npmx");
    Arc::new(FileStorage::new(dir))
}

/// Returns the process-wide settings handle, constructing the service with
/// the default file storage on first access. Subsequent calls return the
/// same shared handle.
pub fn settings() -> SettingsHandle {
    let mut slot = GLOBAL_SERVICE.lock().unwrap();
    slot.get_or_insert_with(|| Arc::new(SettingsService::new(default_storage())))
        .handle()
}

/// Initializes the process-wide service with an explicit storage
/// collaborator. If the service already exists the existing instance is kept.
pub fn init_settings(storage: Arc<dyn KeyValueStorage>) -> SettingsHandle {
    let mut slot = GLOBAL_SERVICE.lock().unwrap();
    if let Some(service) = slot.as_ref() {
        warn!("Settings service already initialized, keeping the existing instance");
        return service.handle();
    }

    let service = Arc::new(SettingsService::new(storage));
    let handle = service.handle();
    *slot = Some(service);
    handle
}

/// Discards the process-wide service so the next access reconstructs it.
/// The storage medium itself is not touched; environments that need full
/// isolation clear their storage separately.
pub fn reset_settings() {
    let mut slot = GLOBAL_SERVICE.lock().unwrap();
    if slot.take().is_some() {
        debug!("Settings service discarded");
    }
}

/// Read-through projection of the `keyboardShortcuts` flag off the
/// process-wide handle. Every previously obtained projection observes later
/// writes; none holds a copy that can go stale.
pub fn use_keyboard_shortcuts() -> Derived<bool> {
    settings().derive(|s| s.keyboard_shortcuts)
}
