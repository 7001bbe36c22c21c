// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use dotenv::dotenv;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Trading panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Market/instrument configuration
    pub market: MarketConfig,

    /// Venue configuration
    pub venue: VenueConfig,

    /// Gasless session configuration
    pub session: SessionConfig,

    /// Backend order API configuration
    pub backend: BackendConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Market/instrument configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Instrument identifier (e.g., "ETH-PERP")
    pub symbol: String,

    /// Tick size used as a late price fallback
    pub tick_size: Option<Decimal>,
}

/// Venue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Venue kind: "vamm" or "orderbook"
    pub kind: String,

    /// Venue contract address, when already known
    pub venue_address: Option<String>,

    /// Venue addresses from fetched market metadata, keyed by symbol
    pub metadata_venues: HashMap<String, String>,

    /// Slippage tolerance in basis points
    pub slippage_bps: u32,

    /// Leverage for vAMM position opens
    pub leverage: u32,

    /// Retries beyond the first submission attempt
    pub max_retries: u32,

    /// Connected wallet address
    pub wallet_address: String,
}

/// Gasless session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Gasless trading available for this deployment
    pub gasless_enabled: bool,

    /// Sessions are mandatory; never fall back to direct transactions
    pub gasless_required: bool,

    /// Relay service base URL
    pub relay_url: Option<String>,
}

/// Backend order API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the order-matching API
    pub base_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let market = MarketConfig {
            symbol: env::var("MARKET_SYMBOL").unwrap_or_else(|_| "ETH-PERP".to_string()),
            tick_size: env::var("TICK_SIZE").ok().and_then(|v| v.parse().ok()),
        };

        let venue = VenueConfig {
            kind: env::var("VENUE_KIND").unwrap_or_else(|_| "orderbook".to_string()),
            venue_address: env::var("VENUE_ADDRESS").ok(),
            metadata_venues: HashMap::new(), // loaded from market metadata at runtime
            slippage_bps: env::var("SLIPPAGE_BPS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            leverage: env::var("LEVERAGE")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            wallet_address: env::var("WALLET_ADDRESS").map_err(|_| {
                AppError::Config("Missing WALLET_ADDRESS environment variable".to_string())
            })?,
        };

        let session = SessionConfig {
            gasless_enabled: env::var("GASLESS_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            gasless_required: env::var("GASLESS_REQUIRED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            relay_url: env::var("RELAY_URL").ok(),
        };

        let backend = BackendConfig {
            base_url: env::var("BACKEND_URL").ok(),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env::var("LOG_TO_FILE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            market,
            venue,
            session,
            backend,
            logging,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| AppError::Config(format!("Failed to open config file: {}", e)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path)
                    .map_err(|e| AppError::Config(format!("Failed to create log file: {}", e)))?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // Initialize the logger
        builder.init();

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: MarketConfig {
                symbol: "ETH-PERP".to_string(),
                tick_size: Some(dec!(0.01)),
            },
            venue: VenueConfig {
                kind: "orderbook".to_string(),
                venue_address: None,
                metadata_venues: HashMap::new(),
                slippage_bps: 100,
                leverage: 1,
                max_retries: 3,
                wallet_address: "".to_string(),
            },
            session: SessionConfig {
                gasless_enabled: false,
                gasless_required: false,
                relay_url: None,
            },
            backend: BackendConfig { base_url: None },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.market.symbol, "ETH-PERP");
        assert_eq!(parsed.venue.slippage_bps, 100);
        assert!(!parsed.session.gasless_required);
    }
}
