//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::naming::sanitize;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.naming.max_base_len == 0 {
            return Err(ConfigError::ValidationError(
                "naming.max_base_len must be > 0".into(),
            ));
        }
        // The placeholder is used verbatim as a base name, so it has to be
        // something the sanitizer would have produced itself.
        if self.naming.placeholder.is_empty()
            || sanitize(&self.naming.placeholder) != self.naming.placeholder
        {
            return Err(ConfigError::ValidationError(
                "naming.placeholder must be a non-empty sanitized name (letters, digits, _ or -)"
                    .into(),
            ));
        }
        if self.caption.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "caption.max_tokens must be > 0".into(),
            ));
        }
        if self.caption.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "caption.timeout_ms must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.caption.temperature) {
            return Err(ConfigError::ValidationError(
                "caption.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.processing.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.decode_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("decode_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unsafe_placeholder() {
        let mut config = Config::default();
        config.naming.placeholder = "no name".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("placeholder"));

        config.naming.placeholder = String::new();
        assert!(config.validate().is_err());

        config.naming.placeholder = "no_name".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.caption.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.caption.temperature = -0.1;
        assert!(config.validate().is_err());
    }
}
