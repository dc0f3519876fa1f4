//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for a [`crate::SyncEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long an error notice stays visible.
    pub error_display: Duration,
    /// User-facing failure messages.
    pub messages: ErrorMessages,
}

impl EngineConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long an error notice stays visible.
    pub fn with_error_display(mut self, duration: Duration) -> Self {
        self.error_display = duration;
        self
    }

    /// Sets the failure messages.
    pub fn with_messages(mut self, messages: ErrorMessages) -> Self {
        self.messages = messages;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_display: Duration::from_secs(3),
            messages: ErrorMessages::default(),
        }
    }
}

/// The notice shown for each failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
    /// Shown when the list cannot be loaded.
    pub load: String,
    /// Shown when a create is rolled back.
    pub create: String,
    /// Shown when a toggle is rolled back.
    pub update: String,
    /// Shown when a delete is rolled back.
    pub delete: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            load: "Failed to load tasks.".into(),
            create: "Could not add task.".into(),
            update: "Failed to update task.".into(),
            delete: "Failed to delete task.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.error_display, Duration::from_secs(3));
        assert_eq!(config.messages.create, "Could not add task.");
    }

    #[test]
    fn config_builder() {
        let messages = ErrorMessages {
            load: "load".into(),
            ..ErrorMessages::default()
        };
        let config = EngineConfig::new()
            .with_error_display(Duration::from_millis(500))
            .with_messages(messages.clone());

        assert_eq!(config.error_display, Duration::from_millis(500));
        assert_eq!(config.messages, messages);
    }
}
