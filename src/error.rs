//! Error taxonomy for the matching engine.
//!
//! Unknown traders are never an error: the ledger treats them as holding a
//! zero balance. Everything here is deterministic and in-memory, so nothing
//! is retried.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Shortfall, TraderId};

/// Errors raised by the ledger, the order book and the matching session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Order rejected at submission (non-positive rate or volume)
    #[error("invalid order from trader {trader_id}: {reason}")]
    InvalidOrder { trader_id: TraderId, reason: String },

    /// Ledger credit/debit called with a negative amount
    #[error("invalid amount {amount}: must be non-negative")]
    InvalidAmount { amount: Decimal },

    /// Solvency check failed; matching for the submission was halted
    #[error(transparent)]
    InsufficientBalance(#[from] Shortfall),

    /// Decimal arithmetic left the representable range
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// Decimal arithmetic would have rounded away significant digits
    #[error("precision loss computing {0}")]
    PrecisionLoss(&'static str),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidOrder {
            trader_id: 7,
            reason: "volume must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid order from trader 7: volume must be positive"
        );

        let err = EngineError::InvalidAmount { amount: dec!(-5) };
        assert_eq!(err.to_string(), "invalid amount -5: must be non-negative");
    }

    #[test]
    fn test_shortfall_converts() {
        let shortfall = Shortfall::new(3, Currency::Quote, dec!(2000), dec!(10));
        let err: EngineError = shortfall.clone().into();

        assert_eq!(err, EngineError::InsufficientBalance(shortfall.clone()));
        assert_eq!(err.to_string(), shortfall.to_string());
    }
}
