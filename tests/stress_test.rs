//! Stress tests for the matching engine.
//!
//! These tests verify:
//! 1. Balance invariants hold over long random order streams
//! 2. Determinism is preserved across runs (same seed, same state root)
//! 3. Throughput stays reasonable
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

use fxmatch::{Currency, EngineConfig, Ledger, MatchingSession, NullSink, Order};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Orders per stress run
const STRESS_ORDER_COUNT: usize = 20_000;

/// Number of distinct traders
const TRADER_COUNT: u64 = 50;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Ledger with random starting balances; some traders are deliberately poor
/// so that shortfall halts happen.
fn seeded_ledger(rng: &mut ChaCha8Rng) -> Ledger {
    let mut ledger = Ledger::new();
    for trader in 1..=TRADER_COUNT {
        let quote = Decimal::new(rng.gen_range(0..=2_000_000), 2);
        let base = Decimal::new(rng.gen_range(0..=20_000), 1);
        ledger.deposit(trader, Currency::Quote, quote).unwrap();
        ledger.deposit(trader, Currency::Base, base).unwrap();
    }
    ledger
}

/// Generate deterministic orders around a rate of 100.00.
fn generate_orders(rng: &mut ChaCha8Rng, count: usize) -> Vec<Order> {
    (0..count)
        .map(|_| {
            let trader = rng.gen_range(1..=TRADER_COUNT);
            let rate = Decimal::new(rng.gen_range(9_000..=11_000), 2);
            let volume = Decimal::new(rng.gen_range(1..=500), 1);
            if rng.gen_bool(0.5) {
                Order::buy(trader, volume, rate)
            } else {
                Order::sell(trader, volume, rate)
            }
        })
        .collect()
}

/// Run a seeded sequence and return the final state root.
fn run_deterministic_sequence(seed: u64, count: usize) -> [u8; 32] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ledger = seeded_ledger(&mut rng);
    let orders = generate_orders(&mut rng, count);

    let mut session = MatchingSession::with_sink(ledger, NullSink, EngineConfig::default());
    for order in orders {
        let _ = session.submit(order);
    }
    session.receipt().state_root
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn stress_invariants_hold() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let ledger = seeded_ledger(&mut rng);
    let totals = ledger.totals().unwrap();
    let orders = generate_orders(&mut rng, STRESS_ORDER_COUNT);

    let config = EngineConfig {
        order_capacity: STRESS_ORDER_COUNT,
        ..EngineConfig::default()
    };
    let mut session = MatchingSession::with_sink(ledger, NullSink, config);

    let start = Instant::now();
    let mut halted = 0usize;
    for (i, order) in orders.into_iter().enumerate() {
        match session.submit(order) {
            Ok(_) => assert!(!session.book().is_crossed(), "book crossed after order {i}"),
            Err(_) => halted += 1,
        }

        if i % 1_000 == 0 {
            assert_eq!(session.ledger().totals().unwrap(), totals);
        }
    }
    let elapsed = start.elapsed();

    let receipt = session.receipt();
    println!(
        "{} orders, {} trades, {} halts in {:.2?}",
        receipt.orders_processed, receipt.trades_executed, receipt.halts, elapsed
    );

    assert_eq!(receipt.orders_processed, STRESS_ORDER_COUNT as u64);
    assert_eq!(receipt.halts, halted as u64);
    assert!(receipt.trades_executed > 0, "expected some matching");
    assert_eq!(session.ledger().totals().unwrap(), totals);
    for row in session.balances() {
        assert!(row.base >= Decimal::ZERO, "trader {} base negative", row.trader_id);
        assert!(row.quote >= Decimal::ZERO, "trader {} quote negative", row.trader_id);
    }
}

#[test]
fn stress_determinism() {
    let a = run_deterministic_sequence(7, 5_000);
    let b = run_deterministic_sequence(7, 5_000);
    let c = run_deterministic_sequence(8, 5_000);

    assert_eq!(a, b, "same seed must give the same state root");
    assert_ne!(a, c, "different seeds should diverge");
}
