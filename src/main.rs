//! Call auction demonstration binary.
//!
//! Loads configuration, installs logging, then submits a fixed set of
//! orders for one symbol and runs a single clearing cycle over them.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use call_auction::config::{self, AppConfig};
use call_auction::engine::Exchange;
use call_auction::matching::VolumeMaximization;
use call_auction::types::{Order, Side};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEMO_SYMBOL: &str = "0005.HK";

#[derive(Parser)]
#[command(name = "call-auction", about = "Uniform-price call auction")]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config_path: PathBuf,
}

fn init_logging(cfg: &AppConfig) {
    // RUST_LOG directives refine the configured level
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::from(cfg.logger.level).into())
        .from_env_lossy();

    match cfg.logger.format {
        config::LogFormat::JSON => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .init();
        }
        config::LogFormat::COMPACT => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
    }
}

/// (side, quantity, price) for the demonstration book
const DEMO_ORDERS: &[(Side, u64, &str)] = &[
    (Side::Buy, 2_000, "100.0004"),
    (Side::Buy, 2_000, "100.0003"),
    (Side::Buy, 2_000, "100.0001"),
    (Side::Buy, 2_000, "100.0001"),
    (Side::Sell, 1_000, "100"),
    (Side::Sell, 2_000, "100"),
    (Side::Sell, 1_500, "100.0005"),
];

/// Submit `(side, quantity, price)` orders with ids from 1, returning how
/// many were accepted and how many rejected.
fn submit_orders(
    exchange: &Exchange,
    symbol: &str,
    orders: &[(Side, u64, &str)],
) -> Result<(usize, usize), rust_decimal::Error> {
    let (mut accepted, mut rejected) = (0, 0);
    for (id, &(side, quantity, price)) in (1u64..).zip(orders) {
        let price = Decimal::from_str(price)?;
        // The exchange logs the reason
        match exchange.send_order(Order::new(id, symbol, side, quantity, price)) {
            Ok(()) => accepted += 1,
            Err(_) => rejected += 1,
        }
    }
    Ok((accepted, rejected))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::load(&cli.config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("could not load config: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);

    let exchange = match Exchange::new(config.exchange.clone()) {
        Ok(exchange) => exchange,
        Err(err) => {
            error!(%err, "could not build exchange");
            return ExitCode::FAILURE;
        }
    };

    match submit_orders(&exchange, DEMO_SYMBOL, DEMO_ORDERS) {
        Ok((accepted, 0)) => info!(accepted, "demo orders submitted"),
        Ok((accepted, rejected)) => warn!(accepted, rejected, "demo orders partly rejected"),
        Err(err) => {
            error!(%err, "bad demo price");
            return ExitCode::FAILURE;
        }
    }

    let Some(report) = exchange.run_clearing_cycle(&VolumeMaximization, DEMO_SYMBOL) else {
        error!(symbol = DEMO_SYMBOL, "no book to clear");
        return ExitCode::FAILURE;
    };

    let converter = exchange.converter();
    for exec in &report.executions {
        info!(
            execution_id = exec.execution_id,
            order_id = exec.order_id,
            side = ?exec.side(),
            price = %converter.to_decimal(exec.price),
            quantity = exec.quantity,
            execution_type = ?exec.execution_type(),
            "execution"
        );
    }
    for side in [Side::Buy, Side::Sell] {
        for level in exchange.depth(DEMO_SYMBOL, side) {
            info!(
                ?side,
                price = %converter.to_decimal(level.tick),
                quantity = level.quantity,
                orders = level.order_count,
                "resting"
            );
        }
    }

    ExitCode::SUCCESS
}
