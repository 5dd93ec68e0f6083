use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `ALGO_REVIEW_REVIEW__PAGE_WIDTH=20`
pub const ENV_PREFIX: &str = "ALGO_REVIEW";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub buffering: BufferingConfig,
    pub review: ReviewConfig,
    pub logging: LoggingConfig,
}

/// Capacities of the two message buffer regions, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferingConfig {
    pub ram_capacity: usize,
    pub flash_capacity: usize,
}

impl Default for BufferingConfig {
    fn default() -> Self {
        Self {
            ram_capacity: 8192,
            flash_capacity: 16384,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Allow application calls (and groups) to be reviewed without detail
    pub blind_signing: bool,
    /// Characters per value page
    pub page_width: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            blind_signing: false,
            page_width: 38,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "error".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Load configuration using `path` (extension optional) as the config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let buffering = BufferingConfig::default();
        let review = ReviewConfig::default();
        let logging = LoggingConfig::default();

        let config = Config::builder()
            // Start with default values
            .set_default("buffering.ram_capacity", buffering.ram_capacity as i64)?
            .set_default("buffering.flash_capacity", buffering.flash_capacity as i64)?
            .set_default("review.blind_signing", review.blind_signing)?
            .set_default("review.page_width", review.page_width as i64)?
            .set_default("logging.filter", logging.filter)?
            // Load from the config file if it exists
            .add_source(File::from(path).required(false))
            // ALGO_REVIEW_<SECTION>__<KEY> env variables override everything
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.review.page_width == 0 {
            return Err(ConfigError::Message(
                "review.page_width must be at least 1".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        // Try to load config for defaults, but don't fail if not found
        match Self::load() {
            Ok(config) => Ok(config),
            Err(_) => Ok(Self {
                buffering: BufferingConfig::default(),
                review: ReviewConfig::default(),
                logging: LoggingConfig::default(),
            }),
        }
    }
}
