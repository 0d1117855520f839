//! # fxmatch
//!
//! Double-auction matching engine for a single base/quote currency pair.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Trade, MatchEvent, ExecutionReceipt)
//! - **Ledger**: Per-trader balances in the base and quote currencies
//! - **OrderBook**: Bid/ask priority queues over slab-stored orders
//! - **Engine**: The matching session that drives submissions to quiescence
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: All amounts are exact decimals
//! 3. **Solvency First**: Balances are checked before any of them move
//! 4. **Synchronous Execution**: No async; one lock per pair when shared
//!
//! The [`candies`] module is an independent interval-DP utility with no
//! connection to the engine.

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, events, receipts
pub mod types;

/// Trader balances
pub mod ledger;

/// Order book: priority queues with slab-based storage
pub mod orderbook;

/// Matching engine: sessions, sinks, shortfall policy
pub mod engine;

pub mod config;
pub mod error;

/// Standalone pinata-smashing optimizer
pub mod candies;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::EngineConfig;
pub use engine::{
    EventLog, EventSink, MatchResult, MatchingSession, NullSink, SharedSession, ShortfallPolicy,
    TracingSink,
};
pub use error::{ConfigError, EngineError, EngineResult};
pub use ledger::{AccountBalance, Balances, Ledger};
pub use orderbook::OrderBook;
pub use types::{
    AssetPair, Currency, ExecutionReceipt, MatchEvent, Order, Shortfall, Side, Trade, TraderId,
};
