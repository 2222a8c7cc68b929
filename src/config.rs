use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;
use crate::types::price::{DEFAULT_PRECISION, MAX_PRECISION};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Decimal places kept when converting prices to ticks (0..=12).
    pub price_precision: u32,
    /// Expected number of symbols; pre-sizes the book registry.
    pub initial_symbol_capacity: usize,
    /// Expected number of live orders across all symbols.
    pub initial_order_capacity: usize,
    /// Entry slots pre-allocated by each new book.
    pub initial_book_capacity: usize,
    /// Id given to the first execution this exchange emits.
    pub first_execution_id: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            price_precision: DEFAULT_PRECISION,
            initial_symbol_capacity: 1000,
            initial_order_capacity: 1000,
            initial_book_capacity: 1000,
            first_execution_id: 1,
        }
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionOutOfRange {
                precision: self.price_precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    COMPACT,
    JSON,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<LogLevel> for LevelFilter {
    fn from(val: LogLevel) -> Self {
        match val {
            LogLevel::TRACE => LevelFilter::TRACE,
            LogLevel::DEBUG => LevelFilter::DEBUG,
            LogLevel::INFO => LevelFilter::INFO,
            LogLevel::WARN => LevelFilter::WARN,
            LogLevel::ERROR => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            format: LogFormat::COMPACT,
        }
    }
}

/// Top-level application configuration.
///
/// Loaded with the following precedence (lowest to highest):
/// 1) Built-in defaults
/// 2) Optional TOML file (if present)
/// 3) Environment variables prefixed `AUCTION_`, nested keys split on `__`
///    (e.g. `AUCTION_EXCHANGE__PRICE_PRECISION=2`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub exchange: ExchangeConfig,
    pub logger: LogConfig,
}

impl AppConfig {
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(config_path))
    }

    fn figment(config_path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if config_path.exists() {
            figment = figment.merge(Toml::file(config_path));
        }
        figment.merge(Env::prefixed("AUCTION_").split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: AppConfig = figment.extract()?;
        cfg.exchange.validate()?;
        Ok(cfg)
    }
}
