// Crypto Desk Simulator Library
//
// Market-data analytics sandbox for crypto spot and perpetual markets:
// order-book metrics, NDF quoting, VWAP/TWAP execution simulation,
// historical VaR and stress scenarios

pub mod clients;
pub mod config;
pub mod dashboard;
pub mod error;       // Unified error handling
pub mod execution;
pub mod market_data;
pub mod pricing;
pub mod progress;
pub mod risk;
pub mod simulation;

// Re-export error types
pub use error::{DeskError, DeskResult};

// Re-export configuration
pub use config::{Config, ConfigError, DeskDefaults, ExchangeConfig, LoggingConfig, SimulationConfig, StressConfig};

// Re-export client types
pub use clients::{BinanceClient, MarketDataSource, MarketType, RetryPolicy};

// Re-export the calculation library
pub use market_data::{
    depth_snapshot, mid_from_order_book, spread_top, BookLevel, BookSample, Candle, DepthRow, OrderBook, Side,
    DEFAULT_DEPTH,
};
pub use simulation::{microprice_path, microprice_path_with_rng, synthetic_volumes};
pub use pricing::{crypto_forward_curve, make_ndf_quote, ForwardPoint, NdfQuote};
pub use execution::{twap_execute, vwap_execute, Algorithm, ExecutionResult, ScheduleRow};
pub use risk::{historical_var, inventory_pnl, stress_scenarios, PnLReport, StressParams, StressRow};

// Re-export dashboard assembly
pub use dashboard::{build_market_report, DeskParams, MarketReport, MarketSelection};

pub use progress::Spinner;
