//! Order types for the matching engine.
//!
//! An order carries a fixed identity (trader, side) and a fixed limit rate.
//! Only its remaining volume changes, and only the matching loop changes it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Trader/account identifier. Not unique across orders.
pub type TraderId = u64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid) - pays quote, receives base
    Buy,
    /// Sell order (ask) - pays base, receives quote
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order for the base currency, priced in the quote currency.
///
/// ## Example
///
/// ```
/// use fxmatch::types::{Order, Side};
/// use rust_decimal_macros::dec;
///
/// // Trader 1 wants 50 units of base at up to 25 quote each
/// let order = Order::buy(1, dec!(50), dec!(25));
/// assert_eq!(order.side, Side::Buy);
/// assert_eq!(order.remaining_volume, dec!(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Owner of the order
    pub trader_id: TraderId,

    pub side: Side,

    /// Limit rate in quote per unit of base
    pub limit_rate: Decimal,

    /// Volume at submission
    pub original_volume: Decimal,

    /// Volume still open; decremented as the order is matched
    pub remaining_volume: Decimal,

    /// Arrival sequence assigned by the book (0 until admitted)
    pub sequence: u64,
}

impl Order {
    /// Create a new limit order
    ///
    /// # Arguments
    ///
    /// * `trader_id` - Owner of the order
    /// * `side` - Buy or Sell
    /// * `volume` - Base-currency volume
    /// * `limit_rate` - Quote per unit of base
    pub fn new(trader_id: TraderId, side: Side, volume: Decimal, limit_rate: Decimal) -> Self {
        Self {
            trader_id,
            side,
            limit_rate,
            original_volume: volume,
            remaining_volume: volume,
            sequence: 0,
        }
    }

    /// Create a buy order
    pub fn buy(trader_id: TraderId, volume: Decimal, limit_rate: Decimal) -> Self {
        Self::new(trader_id, Side::Buy, volume, limit_rate)
    }

    /// Create a sell order
    pub fn sell(trader_id: TraderId, volume: Decimal, limit_rate: Decimal) -> Self {
        Self::new(trader_id, Side::Sell, volume, limit_rate)
    }

    /// Reject orders that must never reach a book.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOrder`] if the rate or the volume is not positive.
    pub fn validate(&self) -> EngineResult<()> {
        let reason = if self.limit_rate <= Decimal::ZERO {
            format!("rate must be positive, got {}", self.limit_rate)
        } else if self.remaining_volume <= Decimal::ZERO {
            format!("volume must be positive, got {}", self.remaining_volume)
        } else {
            return Ok(());
        };

        Err(EngineError::InvalidOrder {
            trader_id: self.trader_id,
            reason,
        })
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining_volume.is_zero()
    }

    /// Volume matched so far
    pub fn filled_volume(&self) -> Decimal {
        self.original_volume - self.remaining_volume
    }

    /// Fill a portion of this order
    ///
    /// Returns the volume actually filled, capped at the remaining volume.
    pub fn fill(&mut self, volume: Decimal) -> Decimal {
        let filled = volume.min(self.remaining_volume).max(Decimal::ZERO);
        self.remaining_volume -= filled;
        filled
    }

    /// Whether this bid and `ask` can trade (`bid rate >= ask rate`)
    pub fn crosses(&self, ask: &Order) -> bool {
        self.limit_rate >= ask.limit_rate
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
