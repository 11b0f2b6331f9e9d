//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implemented by every configuration struct in the crate so that callers can
/// check a configuration loaded from JSON before building a pipeline from it.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a ratio is finite and strictly positive.
    fn validate_positive_ratio(&self, field: &str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig {
                message: format!("{field} must be a finite positive number, got {value}"),
            })
        }
    }

    /// Validates that a ratio lies in `[0.0, 1.0]`.
    fn validate_unit_ratio(&self, field: &str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig {
                message: format!("{field} must be between 0.0 and 1.0, got {value}"),
            })
        }
    }

    /// Validates that a pixel length is non-zero.
    fn validate_pixels(&self, field: &str, value: u32) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field} must be greater than 0 pixels"),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension trait that validates and returns the configuration in one step.
pub trait ConfigValidatorExt: ConfigValidator + Sized {
    /// Validates the configuration and returns it on success.
    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}
