// Crypto Desk Simulator - CLI
// Order-book analytics, NDF quotes, execution and risk for spot and perp markets

use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crypto_desk_sim::{Config, DeskParams, DeskResult, MarketSelection, MarketType};

// Load command modules from cli directory
#[path = "../cli/analytics_commands.rs"]
mod analytics_commands;
#[path = "../cli/market_commands.rs"]
mod market_commands;
#[path = "../cli/render.rs"]
mod render;

#[derive(Parser)]
#[command(name = "desk")]
#[command(version)]
#[command(about = "Crypto Derivatives Liquidity & Risk Simulator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarketArg {
    Spot,
    Perp,
}

impl From<MarketArg> for MarketType {
    fn from(arg: MarketArg) -> Self {
        match arg {
            MarketArg::Spot => MarketType::Spot,
            MarketArg::Perp => MarketType::Perp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SelectionArg {
    Spot,
    Perp,
    Both,
}

impl From<SelectionArg> for MarketSelection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Spot => MarketSelection::Spot,
            SelectionArg::Perp => MarketSelection::Perp,
            SelectionArg::Both => MarketSelection::Both,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show order-book depth, mid and spread
    Book {
        #[arg(short, long, value_enum, default_value = "spot")]
        market: MarketArg,

        /// Levels requested from the exchange
        #[arg(short, long)]
        limit: Option<usize>,

        /// Levels per side in the depth table
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Print OHLCV candles
    Candles {
        #[arg(short, long, value_enum, default_value = "spot")]
        market: MarketArg,

        /// Candle interval (e.g. 1m, 1h, 1d)
        #[arg(short, long)]
        timeframe: Option<String>,

        #[arg(short, long, default_value = "24")]
        limit: usize,
    },

    /// Sample mid and spread repeatedly
    Poll {
        #[arg(short, long, value_enum, default_value = "both")]
        market: SelectionArg,

        #[arg(short, long, default_value = "10")]
        samples: usize,

        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,
    },

    /// Price a forward curve from a spot level
    Ndf {
        /// Spot or perp mid
        #[arg(long)]
        spot: f64,

        /// Annual domestic funding rate
        #[arg(long, allow_hyphen_values = true)]
        r: Option<f64>,

        /// Annual crypto funding rate
        #[arg(long, allow_hyphen_values = true)]
        q: Option<f64>,

        /// Tenors in days (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "1,7,30,90,180")]
        tenors: Vec<u32>,

        #[arg(long)]
        spread_bp: Option<f64>,
    },

    /// Simulate VWAP and TWAP on a synthetic microprice path
    Execute {
        /// Starting mid price
        #[arg(long)]
        mid: f64,

        /// Notional to execute in quote currency
        #[arg(short, long)]
        notional: Option<f64>,
    },

    /// Price-shock / fee / volatility stress grid
    Stress {
        /// Current price
        #[arg(long)]
        price: f64,

        /// Position size
        #[arg(long, allow_hyphen_values = true)]
        qty: Option<f64>,
    },

    /// Full dashboard pass on live data
    Dashboard {
        #[arg(short, long, value_enum, default_value = "both")]
        market: SelectionArg,

        #[arg(long, allow_hyphen_values = true)]
        r: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        q: Option<f64>,

        #[arg(long)]
        spread_bp: Option<f64>,

        #[arg(short, long)]
        notional: Option<f64>,

        #[arg(long)]
        tenor_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load config before logging so the file can set the level
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    std::env::set_var("RUST_LOG", log_level);
    tracing_subscriber::fmt::init();

    match run(cli.command, &cli.config, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {} error", e.category());
            error!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Missing config files fall back to defaults; broken ones are errors
fn load_config(path: &str) -> DeskResult<Config> {
    if Path::new(path).exists() {
        Ok(Config::from_file(path)?)
    } else {
        Ok(Config::default())
    }
}

async fn run(command: Commands, config_path: &str, config: Config) -> DeskResult<()> {
    match command {
        Commands::Init { force } => init_config(config_path, force),
        Commands::Book { market, limit, depth } => {
            market_commands::show_book(market.into(), limit, depth, &config).await
        }
        Commands::Candles { market, timeframe, limit } => {
            market_commands::show_candles(market.into(), timeframe, limit, &config).await
        }
        Commands::Poll { market, samples, interval_ms } => {
            market_commands::poll_markets(market.into(), samples, interval_ms, &config).await
        }
        Commands::Ndf { spot, r, q, tenors, spread_bp } => {
            analytics_commands::show_forward_curve(spot, r, q, &tenors, spread_bp, &config)
        }
        Commands::Execute { mid, notional } => analytics_commands::simulate_execution(mid, notional, &config),
        Commands::Stress { price, qty } => analytics_commands::show_stress(price, qty, &config),
        Commands::Dashboard { market, r, q, spread_bp, notional, tenor_days } => {
            let defaults = DeskParams::from_defaults(&config.desk);
            let params = DeskParams {
                r_annual: r.unwrap_or(defaults.r_annual),
                q_annual: q.unwrap_or(defaults.q_annual),
                spread_bp: spread_bp.unwrap_or(defaults.spread_bp),
                target_notional: notional.unwrap_or(defaults.target_notional),
                tenor_days: tenor_days.unwrap_or(defaults.tenor_days),
                var_alpha: defaults.var_alpha,
            };
            market_commands::run_dashboard(market.into(), params, &config).await
        }
    }
}

fn init_config(path: &str, force: bool) -> DeskResult<()> {
    info!("🔧 Initializing configuration...");

    if Path::new(path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", path);
        return Ok(());
    }

    Config::default().to_file(path)?;
    info!("📝 Created {}", path);
    info!("💡 Next steps:");
    info!("   1. Review pairs and stress grids in {}", path);
    info!("   2. Run: desk dashboard --market both");
    Ok(())
}
