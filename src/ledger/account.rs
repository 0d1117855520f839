//! Per-trader balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, TraderId};

/// Balances of one trader in both currencies. Both start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balances {
    pub base: Decimal,
    pub quote: Decimal,
}

impl Balances {
    pub fn new(base: Decimal, quote: Decimal) -> Self {
        Self { base, quote }
    }

    /// Balance in one currency
    #[inline]
    pub fn get(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Base => self.base,
            Currency::Quote => self.quote,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, currency: Currency) -> &mut Decimal {
        match currency {
            Currency::Base => &mut self.base,
            Currency::Quote => &mut self.quote,
        }
    }
}

/// One row of a balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub trader_id: TraderId,
    pub base: Decimal,
    pub quote: Decimal,
}

impl AccountBalance {
    pub fn new(trader_id: TraderId, balances: Balances) -> Self {
        Self {
            trader_id,
            base: balances.base,
            quote: balances.quote,
        }
    }
}
