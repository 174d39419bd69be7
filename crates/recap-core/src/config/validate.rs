//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.recognition.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "recognition.endpoint must not be empty".into(),
            ));
        }
        if self.recognition.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "recognition.model must not be empty".into(),
            ));
        }
        if self.recognition.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "recognition.timeout_ms must be > 0".into(),
            ));
        }
        if self.recognition.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "recognition.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.recognition.temperature) {
            return Err(ConfigError::ValidationError(
                "recognition.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.dispatch.max_in_flight == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.max_in_flight must be > 0".into(),
            ));
        }
        if self.dispatch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
