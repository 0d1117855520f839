//! The two currencies of a trading pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One leg of the traded pair.
///
/// Volumes are denominated in the base currency; rates and transaction
/// values are denominated in the quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// The asset being bought and sold
    Base,
    /// The asset prices are expressed in
    Quote,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Base => write!(f, "base"),
            Currency::Quote => write!(f, "quote"),
        }
    }
}

/// Display codes for the base/quote pair, e.g. `UAH/USD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPair {
    pub base: String,
    pub quote: String,
}

impl AssetPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Currency code for one leg of the pair
    pub fn code(&self, currency: Currency) -> &str {
        match currency {
            Currency::Base => &self.base,
            Currency::Quote => &self.quote,
        }
    }
}

impl Default for AssetPair {
    fn default() -> Self {
        Self::new("UAH", "USD")
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair() {
        let pair = AssetPair::default();
        assert_eq!(pair.code(Currency::Base), "UAH");
        assert_eq!(pair.code(Currency::Quote), "USD");
        assert_eq!(pair.to_string(), "UAH/USD");
    }

    #[test]
    fn test_currency_serde_names() {
        let json = serde_json::to_string(&Currency::Quote).unwrap();
        assert_eq!(json, "\"quote\"");
    }
}
