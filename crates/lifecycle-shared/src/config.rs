//! Configuration management

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;
use crate::telemetry::LogFormat;
use crate::constants::{
    DEFAULT_DB_ACQUIRE_TIMEOUT_SECS, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_MAX_BATCH_SIZE,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub lifecycle: LifecycleSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
    pub log_filter: String,
    pub log_format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LifecycleSettings {
    /// Largest id batch a bulk call accepts.
    pub max_batch_size: usize,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self { max_batch_size: DEFAULT_MAX_BATCH_SIZE }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::from_builder(Self::builder(&env)?)
    }

    fn builder(env: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("app.env", env)?
            .set_default("app.name", "lifecycle-audit")?
            .set_default("app.log_filter", "info")?
            .set_default("app.log_format", "json")?
            .set_default("database.url", "postgres://localhost/lifecycle")?
            .set_default("database.max_connections", DEFAULT_DB_MAX_CONNECTIONS)?
            .set_default("database.acquire_timeout_secs", DEFAULT_DB_ACQUIRE_TIMEOUT_SECS)?
            .set_default("lifecycle.max_batch_size", DEFAULT_MAX_BATCH_SIZE as u64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.lifecycle.max_batch_size == 0 {
            return Err(AppError::invalid_setting("lifecycle.max_batch_size", "must be at least 1"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::invalid_setting("database.max_connections", "must be at least 1"));
        }
        if LogFormat::from_str(&self.app.log_format).is_none() {
            return Err(AppError::invalid_setting(
                "app.log_format",
                format!("'{}' is neither json nor pretty", self.app.log_format),
            ));
        }
        Ok(())
    }
}
