use crate::types::Settings;
use serde::{Deserialize, Serialize};

/// Delivered synchronously to every subscriber after a mutation, carrying the
/// full post-mutation settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsChangedEvent {
    pub settings: Settings,
}

impl SettingsChangedEvent {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}
