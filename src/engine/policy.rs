//! What the matching loop does when a trader cannot cover a trade.

use serde::{Deserialize, Serialize};

/// Reaction to a failed solvency pre-check.
///
/// Changing this changes observable trade sequences, so it is an explicit
/// configuration value rather than an implementation detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// FailFastOnShortfall: stop the whole matching loop for this
    /// submission. The blocked pair stays resting with its volume intact and
    /// deeper orders that could match are not tried.
    #[default]
    FailFast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fail_fast() {
        assert_eq!(ShortfallPolicy::default(), ShortfallPolicy::FailFast);
    }
}
