// Configuration management for the desk simulator

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::clients::MarketType;
use crate::market_data::DEFAULT_DEPTH;
use crate::pricing::ndf::{DEFAULT_QUOTE_SPREAD_BP, DEFAULT_QUOTE_TENOR_DAYS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub spot_rest_url: String,
    pub perp_rest_url: String,
    pub spot_pair: String,
    pub perp_pair: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_secs: u64,
    pub book_limit: usize,
    pub candle_timeframe: String,
    pub candle_limit: usize,
}

impl ExchangeConfig {
    pub fn pair_for(&self, market: MarketType) -> &str {
        match market {
            MarketType::Spot => &self.spot_pair,
            MarketType::Perp => &self.perp_pair,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            spot_rest_url: "https://api.binance.com".to_string(),
            perp_rest_url: "https://fapi.binance.com".to_string(),
            spot_pair: "BTC/USDT".to_string(),
            perp_pair: "BTC/USDT".to_string(),
            timeout_ms: 30_000,
            retries: 3,
            retry_delay_secs: 2,
            book_limit: 50,
            candle_timeframe: "1h".to_string(),
            candle_limit: 24 * 250, // ~250 days of hourly bars
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    pub path_len: usize,
    pub sigma_bp: f64,
    pub volume_min: u32,
    pub volume_max: u32, // exclusive
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            path_len: 60,
            sigma_bp: 30.0,
            volume_min: 1,
            volume_max: 20,
        }
    }
}

/// Defaults for the dashboard sliders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskDefaults {
    pub r_annual: f64,
    pub q_annual: f64,
    pub spread_bp: f64,
    pub tenor_days: u32,
    pub target_notional: f64,
    pub var_alpha: f64,
    pub depth: usize,
    pub var_window: usize, // hourly returns summed into one daily return
}

impl Default for DeskDefaults {
    fn default() -> Self {
        Self {
            r_annual: 0.05,
            q_annual: 0.02,
            spread_bp: DEFAULT_QUOTE_SPREAD_BP,
            tenor_days: DEFAULT_QUOTE_TENOR_DAYS,
            target_notional: 100_000.0,
            var_alpha: 0.99,
            depth: DEFAULT_DEPTH,
            var_window: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressConfig {
    pub shocks_pct: Vec<f64>,
    pub base_fee_bp: f64,
    pub fee_multipliers: Vec<f64>,
    pub vol_multipliers: Vec<f64>,
    pub slippage_bp: f64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            shocks_pct: vec![-0.2, -0.1, 0.1, 0.2],
            base_fee_bp: 10.0,
            fee_multipliers: vec![1.0, 1.5, 2.0],
            vol_multipliers: vec![1.0, 1.5, 2.0],
            slippage_bp: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub desk: DeskDefaults,
    #[serde(default)]
    pub stress: StressConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange.retries == 0 {
            return Err(ConfigError::Validation("retries must be greater than 0".to_string()));
        }

        if self.exchange.book_limit == 0 {
            return Err(ConfigError::Validation("book_limit must be greater than 0".to_string()));
        }

        if self.simulation.path_len == 0 {
            return Err(ConfigError::Validation("path_len must be greater than 0".to_string()));
        }

        if !self.simulation.sigma_bp.is_finite() || self.simulation.sigma_bp < 0.0 {
            return Err(ConfigError::Validation("sigma_bp must be a non-negative number".to_string()));
        }

        if self.simulation.volume_min >= self.simulation.volume_max {
            return Err(ConfigError::Validation(
                "volume_min must be lower than volume_max".to_string(),
            ));
        }

        if self.simulation.volume_min == 0 {
            return Err(ConfigError::Validation("volume_min must be at least 1".to_string()));
        }

        if !(self.desk.var_alpha > 0.0 && self.desk.var_alpha < 1.0) {
            return Err(ConfigError::Validation("var_alpha must lie strictly between 0 and 1".to_string()));
        }

        if !(self.desk.target_notional > 0.0) || !self.desk.target_notional.is_finite() {
            return Err(ConfigError::Validation("target_notional must be positive".to_string()));
        }

        if self.desk.var_window == 0 {
            return Err(ConfigError::Validation("var_window must be greater than 0".to_string()));
        }

        if self.stress.shocks_pct.is_empty()
            || self.stress.fee_multipliers.is_empty()
            || self.stress.vol_multipliers.is_empty()
        {
            return Err(ConfigError::Validation("stress grids must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exchange.retries, 3);
        assert_eq!(config.exchange.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.simulation.seed, 42);
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut config = Config::default();
        config.desk.var_alpha = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[simulation]\nseed = 7\npath_len = 10\nsigma_bp = 5.0\nvolume_min = 1\nvolume_max = 5\n")
            .unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.exchange.book_limit, 50);
        assert_eq!(config.stress.shocks_pct.len(), 4);
    }
}
