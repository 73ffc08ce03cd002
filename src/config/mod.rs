//! Application configuration

mod app_config;

pub use app_config::{AppConfig, IngestionConfig, LogFormat, LoggingConfig, UploaderConfig};
