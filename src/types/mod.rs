//! Core data types for the matching engine
//!
//! ## Types
//!
//! - [`Order`]: A limit order for the base currency
//! - [`Side`]: Buy or Sell
//! - [`Currency`] / [`AssetPair`]: The two legs of the traded pair
//! - [`Trade`]: An executed match between the best bid and the best ask
//! - [`MatchEvent`] / [`Shortfall`]: Events for the reporting collaborator
//! - [`ExecutionReceipt`]: Session summary with a state root
//!
//! All amounts are `rust_decimal::Decimal`; nothing here uses floating point.

mod currency;
mod event;
mod order;
mod receipt;
mod trade;

pub use currency::{AssetPair, Currency};
pub use event::{MatchEvent, Shortfall};
pub use order::{Order, Side, TraderId};
pub use receipt::ExecutionReceipt;
pub use trade::{transaction_value, Trade};
