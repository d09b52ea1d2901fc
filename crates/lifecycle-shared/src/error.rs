//! Startup errors for configuration and telemetry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A source could not be read or a value did not deserialize.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The value deserialized but is outside what the lifecycle layer accepts.
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl AppError {
    pub fn invalid_setting(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting { key, reason: reason.into() }
    }
}
