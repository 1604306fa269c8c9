use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
    pub budget: BudgetSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Fingerprint cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached artifacts
    pub capacity: usize,
    /// Where the cache snapshot is persisted; in-memory only when unset
    pub snapshot_path: Option<String>,
}

/// Token pricing, USD per million tokens
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub input_rate_per_million: f64,
    pub output_rate_per_million: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Repair-retry rounds after a failed quality check
    pub max_repair_attempts: u32,
    pub auto_repair: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 500,
            snapshot_path: None,
        }
    }
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            input_rate_per_million: 3.0,
            output_rate_per_million: 15.0,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_repair_attempts: 1,
            auto_repair: true,
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert!(matches!(config.logging.format, LogFormat::Pretty));
        assert_eq!(config.cache.capacity, 500);
        assert!(config.cache.snapshot_path.is_none());
        assert_eq!(config.budget.input_rate_per_million, 3.0);
        assert_eq!(config.budget.output_rate_per_million, 15.0);
        assert_eq!(config.pipeline.max_repair_attempts, 1);
        assert!(config.pipeline.auto_repair);
    }

    #[test]
    fn test_deserialize_from_toml_fragment() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[pipeline]\nmax_repair_attempts = 2\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.pipeline.max_repair_attempts, 2);
        // Untouched sections keep their defaults
        assert_eq!(config.cache.capacity, 500);
    }
}
