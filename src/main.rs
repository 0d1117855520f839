//! fxmatch - Binary Entry Point
//!
//! Seeds the reference sample balances, replays the reference sample
//! orders, and logs the trades and final balances.
//!
//! Set `FXMATCH_CONFIG` to a TOML file to override the defaults and
//! `RUST_LOG` to change verbosity.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fxmatch::{Currency, EngineConfig, Ledger, MatchingSession, Order, TracingSink};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("FXMATCH_CONFIG") {
        Ok(path) => match EngineConfig::load(Path::new(&path)) {
            Ok(config) => {
                info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => EngineConfig::default(),
    };

    let pair = config.pair.clone();
    let mut ledger = Ledger::new();

    let seeds: [(u64, Currency, Decimal); 7] = [
        (1, Currency::Quote, dec!(2000)),
        (2, Currency::Base, dec!(100)),
        (3, Currency::Quote, dec!(1500)),
        (4, Currency::Base, dec!(50)),
        (5, Currency::Quote, dec!(3000)),
        (6, Currency::Base, dec!(120)),
        (7, Currency::Quote, dec!(500)),
    ];
    for (trader, currency, amount) in seeds {
        if let Err(e) = ledger.deposit(trader, currency, amount) {
            error!("Failed to seed trader {}: {}", trader, e);
            std::process::exit(1);
        }
    }

    let orders = [
        Order::buy(1, dec!(50), dec!(25)),
        Order::sell(2, dec!(50), dec!(24)),
        Order::buy(3, dec!(30), dec!(26)),
        Order::sell(4, dec!(20), dec!(23)),
        Order::buy(5, dec!(70), dec!(27)),
        Order::sell(6, dec!(60), dec!(22)),
        Order::buy(7, dec!(40), dec!(28)),
    ];

    info!("Matching {} orders on {}", orders.len(), pair);
    let mut session = MatchingSession::with_sink(ledger, TracingSink::new(pair.clone()), config);

    for order in orders {
        // Halts and rejections are reported through the sink
        let _ = session.submit(order);
    }

    info!("=== Current Balances ===");
    for row in session.balances() {
        info!(
            "Trader {}: {} {}, {} {}",
            row.trader_id, row.base, pair.base, row.quote, pair.quote
        );
    }

    let receipt = session.receipt();
    info!(
        "Processed {} orders, {} trades, {} halts, state root {}",
        receipt.orders_processed,
        receipt.trades_executed,
        receipt.halts,
        receipt.state_root_hex()
    );
}
