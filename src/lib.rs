//! Reactive user settings store for the npmx client.
//!
//! Holds the user-configurable options object behind a process-wide shared
//! handle, propagates mutations synchronously to derived accessors, and
//! writes the whole serialized object through to a key/value storage
//! collaborator under a fixed key on every change.

pub mod errors;
pub mod events;
pub mod persistence;
pub mod reactive;
pub mod service;
pub mod types;

pub use self::errors::SettingsError;
pub use self::events::SettingsChangedEvent;
pub use self::persistence::{FileStorage, KeyValueStorage, MemoryStorage, SETTINGS_STORAGE_KEY};
pub use self::reactive::{Derived, SettingsHandle, SubscriptionId};
pub use self::service::{
    init_settings, reset_settings, settings, use_keyboard_shortcuts, SettingsService,
};
pub use self::types::Settings;
