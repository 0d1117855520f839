//! Events emitted to the reporting collaborator while matching.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Currency, Trade, TraderId};

/// A trader could not cover their side of the next trade.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("trader {trader_id} lacks sufficient {currency} balance: required {required}, available {available}")]
pub struct Shortfall {
    pub trader_id: TraderId,
    pub currency: Currency,
    pub required: Decimal,
    pub available: Decimal,
}

impl Shortfall {
    pub fn new(
        trader_id: TraderId,
        currency: Currency,
        required: Decimal,
        available: Decimal,
    ) -> Self {
        Self {
            trader_id,
            currency,
            required,
            available,
        }
    }
}

/// Structured event stream produced by a matching session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A trade was executed and settled
    Trade(Trade),

    /// Matching stopped on a solvency shortfall; both orders stay resting
    Halted(Shortfall),

    /// An order was refused at submission
    Rejected { trader_id: TraderId, reason: String },
}

impl MatchEvent {
    /// The trade carried by this event, if any
    pub fn as_trade(&self) -> Option<&Trade> {
        match self {
            MatchEvent::Trade(trade) => Some(trade),
            _ => None,
        }
    }
}
