use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Persistence error during operation '{operation}': {message}")]
    Persistence {
        operation: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SettingsError {
    pub fn persistence(operation: impl Into<String>, message: impl Into<String>) -> Self {
        SettingsError::Persistence {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn persistence_with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        SettingsError::Persistence {
            operation: operation.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}
