//! Trade record emitted for every executed match.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::TraderId;

/// A single execution between the best bid and the best ask.
///
/// ## Price Discovery
///
/// The trade always executes at the ask's limit rate, whichever of the two
/// orders arrived last.
///
/// ## Example
///
/// ```
/// use fxmatch::types::Trade;
/// use rust_decimal_macros::dec;
///
/// let trade = Trade::new(1, 1, 2, 1, 2, dec!(50), dec!(24));
/// assert_eq!(trade.value().unwrap(), dec!(1200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Session-local trade number, starting at 1
    pub id: u64,

    pub buyer_id: TraderId,

    pub seller_id: TraderId,

    /// Book sequence of the bid that traded
    pub bid_sequence: u64,

    /// Book sequence of the ask that traded
    pub ask_sequence: u64,

    /// Executed base-currency volume
    pub volume: Decimal,

    /// Execution rate (the ask's limit rate)
    pub price: Decimal,
}

impl Trade {
    pub fn new(
        id: u64,
        buyer_id: TraderId,
        seller_id: TraderId,
        bid_sequence: u64,
        ask_sequence: u64,
        volume: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            buyer_id,
            seller_id,
            bid_sequence,
            ask_sequence,
            volume,
            price,
        }
    }

    /// Quote-currency amount that changed hands (`volume * price`)
    pub fn value(&self) -> EngineResult<Decimal> {
        transaction_value(self.volume, self.price)
    }
}

/// `volume * price`, exact or an error.
///
/// An exact product carries the sum of the operand scales. `checked_mul`
/// rounds to a smaller scale when the product has more than 28 decimal
/// places or outgrows the mantissa; that is reported as
/// [`EngineError::PrecisionLoss`] instead of settling a rounded value.
pub fn transaction_value(volume: Decimal, price: Decimal) -> EngineResult<Decimal> {
    let (volume, price) = (volume.normalize(), price.normalize());
    let value = volume
        .checked_mul(price)
        .ok_or(EngineError::Overflow("transaction value"))?;

    if volume.is_zero() || price.is_zero() {
        return Ok(value);
    }
    if value.is_zero() || value.scale() < volume.scale() + price.scale() {
        return Err(EngineError::PrecisionLoss("transaction value"));
    }
    Ok(value)
}
