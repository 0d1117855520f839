//! Engine configuration.
//!
//! Loads from a TOML file; every field has a default, so an empty file is a
//! valid configuration.
//!
//! ```toml
//! order_capacity = 4096
//! shortfall_policy = "fail_fast"
//!
//! [pair]
//! base = "UAH"
//! quote = "USD"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::ShortfallPolicy;
use crate::error::ConfigError;
use crate::types::AssetPair;

/// Settings for one matching session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Currency codes used in reports
    pub pair: AssetPair,

    /// Resting orders to pre-allocate room for
    pub order_capacity: usize,

    pub shortfall_policy: ShortfallPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pair: AssetPair::default(),
            order_capacity: 1024,
            shortfall_policy: ShortfallPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.pair.base.trim();
        let quote = self.pair.quote.trim();

        if base.is_empty() || quote.is_empty() {
            return Err(ConfigError::Invalid("currency codes must not be empty".into()));
        }
        if base.eq_ignore_ascii_case(quote) {
            return Err(ConfigError::Invalid(format!(
                "base and quote must differ, both are {base}"
            )));
        }
        if self.order_capacity == 0 {
            return Err(ConfigError::Invalid("order_capacity must be positive".into()));
        }
        Ok(())
    }
}
