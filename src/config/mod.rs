//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, BudgetSettings, CacheSettings, LogFormat, LoggingConfig, PipelineSettings,
};
