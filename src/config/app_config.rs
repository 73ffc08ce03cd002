use std::time::Duration;

use serde::Deserialize;

use crate::domain::ValidationConfig;
use crate::domain::error::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
    pub ingestion: IngestionConfig,
    pub uploader: UploaderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Simulated transfer tuning
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestionConfig {
    pub tick_interval_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    /// Probability in `[0, 1]` that an attempt fails
    pub failure_rate: f64,
    pub max_progress_step: u8,
    /// Zero keeps completed tasks until they are removed
    pub completed_retention_ms: u64,
    pub failure_message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploaderConfig {
    pub name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            min_duration_ms: 1000,
            max_duration_ms: 4000,
            failure_rate: 0.05,
            max_progress_step: 15,
            completed_retention_ms: 2000,
            failure_message: "Upload failed. Please try again.".to_string(),
        }
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            name: "Current User".to_string(),
        }
    }
}

impl IngestionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn completed_retention(&self) -> Option<Duration> {
        (self.completed_retention_ms > 0)
            .then(|| Duration::from_millis(self.completed_retention_ms))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(DomainError::configuration(format!(
                "ingestion.failure_rate must be between 0 and 1, got {}",
                self.failure_rate
            )));
        }

        if self.min_duration_ms > self.max_duration_ms {
            return Err(DomainError::configuration(
                "ingestion.min_duration_ms cannot exceed ingestion.max_duration_ms",
            ));
        }

        if self.max_progress_step == 0 {
            return Err(DomainError::configuration(
                "ingestion.max_progress_step must be at least 1",
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check every section; `load` only checks shape
    pub fn validate(&self) -> Result<(), DomainError> {
        self.validation.validate()?;
        self.ingestion.validate()
    }
}
