//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; API keys come only from the
//! environment (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`).
//!
//! # Example
//!
//! ```no_run
//! use quantfolio::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging(0);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::knowledge::KnowledgeConfig;
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::market::MarketDataConfig;
use super::scraper::ScraperConfig;
use super::trading::TradingConfig;
use crate::error::{ConfigError, Result};
use crate::infrastructure::paths;

/// Commented starter file written by `quantfolio config init`.
pub const TEMPLATE: &str = r#"# quantfolio configuration

# database = "~/.quantfolio/quantfolio.db"
# data_dir = "~/.quantfolio/scraped_data"

[logging]
level = "warn"
format = "pretty"

[llm]
# anthropic | openai (keys come from ANTHROPIC_API_KEY / OPENAI_API_KEY)
provider = "anthropic"

[llm.anthropic]
model = "claude-3-5-sonnet-20241022"
temperature = 0.2
max_tokens = 4096

[llm.openai]
model = "gpt-4o"

[market_data]
history_range = "1y"

[scraper]
delay_ms = 2000
max_delay_ms = 10000

[knowledge]
top_k = 3
auto_refresh = true

[trading]
exchange_suffix = ".NS"
default_quantity = 1
"#;

/// Main application configuration.
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory holding scraped company records.
    #[serde(default = "paths::default_data_dir")]
    pub data_dir: PathBuf,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Quote service settings.
    #[serde(default)]
    pub market_data: MarketDataConfig,

    /// Fundamentals scraper settings.
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Retrieval settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Paper-trading defaults.
    #[serde(default)]
    pub trading: TradingConfig,
}

fn default_database() -> PathBuf {
    paths::default_database()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            data_dir: paths::default_data_dir(),
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
            market_data: MarketDataConfig::default(),
            scraper: ScraperConfig::default(),
            knowledge: KnowledgeConfig::default(),
            trading: TradingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.database = expand_home(&config.database);
        config.data_dir = expand_home(&config.data_dir);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Other(format!("failed to render config: {e}")).into())
    }

    /// Initialize tracing from the logging section.
    pub fn init_logging(&self, verbosity: u8) {
        self.logging.init(verbosity);
    }

    /// Validate configuration values.
    ///
    /// Checks that URLs are present and numeric settings are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.market_data.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "market_data.base_url",
            }
            .into());
        }
        if self.scraper.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scraper.base_url",
            }
            .into());
        }
        if self.market_data.timeout_ms == 0 || self.scraper.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scraper.max_delay_ms < self.scraper.delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= delay_ms".to_string(),
            }
            .into());
        }
        if self.knowledge.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "top_k",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.knowledge.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dimension",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.trading.default_quantity <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_quantity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !self.trading.exchange_suffix.starts_with('.') || self.trading.exchange_suffix.len() < 2
        {
            return Err(ConfigError::InvalidValue {
                field: "exchange_suffix",
                reason: "must look like \".NS\"".to_string(),
            }
            .into());
        }
        for provider in [&self.llm.anthropic, &self.llm.openai] {
            if !(0.0..=2.0).contains(&provider.temperature) {
                return Err(ConfigError::InvalidValue {
                    field: "temperature",
                    reason: "must be between 0 and 2".to_string(),
                }
                .into());
            }
            if provider.model.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "model" }.into());
            }
        }
        Ok(())
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
