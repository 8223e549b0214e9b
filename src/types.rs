use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The user-configurable settings object.
///
/// Deserialization performs the default merge: fields present in the stored
/// value win, missing fields are back-filled from `Settings::default()`.
/// Keys the current schema does not know about are kept in `extra` and
/// round-trip unchanged through a load-mutate-save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub keyboard_shortcuts: bool,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keyboard_shortcuts: true,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert!(settings.keyboard_shortcuts);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_stored_fields_win_over_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"keyboardShortcuts": false}"#).unwrap();

        assert!(!settings.keyboard_shortcuts);
    }

    #[test]
    fn test_serialized_form_uses_camel_case() {
        let serialized = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(serialized, json!({"keyboardShortcuts": true}));
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let raw = r#"{"keyboardShortcuts": false, "theme": "dark"}"#;
        let mut settings: Settings = serde_json::from_str(raw).unwrap();

        assert_eq!(settings.extra.get("theme"), Some(&json!("dark")));

        settings.keyboard_shortcuts = true;
        let serialized = serde_json::to_value(&settings).unwrap();

        assert_eq!(
            serialized,
            json!({"keyboardShortcuts": true, "theme": "dark"})
        );
    }
}
