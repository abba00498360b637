//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values before anything is built from them.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".into(),
            ));
        }
        check_endpoint("providers.groq.endpoint", &self.providers.groq.endpoint)?;
        check_endpoint(
            "providers.together.endpoint",
            &self.providers.together.endpoint,
        )?;
        if self.providers.groq.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.groq.model must not be empty".into(),
            ));
        }
        if self.providers.together.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.together.model must not be empty".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

fn check_endpoint(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{key} must be an http(s) URL, got \"{value}\""
        )))
    }
}
