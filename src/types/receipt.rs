//! Execution receipt summarising a matching session.
//!
//! The state root is a SHA-256 digest over the ledger and the resting book,
//! so two sessions fed the same submissions produce the same receipt.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Summary of everything a session has processed so far.
///
/// ## Example
///
/// ```
/// use fxmatch::types::ExecutionReceipt;
///
/// let receipt = ExecutionReceipt::new(7, 3, 0, [0u8; 32]);
/// assert_eq!(receipt.state_root_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Number of orders admitted to the book
    pub orders_processed: u64,

    /// Number of trades executed
    pub trades_executed: u64,

    /// Number of submissions halted by a shortfall
    pub halts: u64,

    /// SHA-256 of the ledger and resting book
    pub state_root: [u8; 32],
}

impl ExecutionReceipt {
    pub fn new(orders_processed: u64, trades_executed: u64, halts: u64, state_root: [u8; 32]) -> Self {
        Self {
            orders_processed,
            trades_executed,
            halts,
            state_root,
        }
    }

    /// Finish a hasher into a 32-byte state root
    pub fn finalize_root(hasher: Sha256) -> [u8; 32] {
        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_root_is_sha256() {
        let mut hasher = Sha256::new();
        hasher.update(b"hello");
        let root = ExecutionReceipt::finalize_root(hasher);

        let receipt = ExecutionReceipt::new(1, 1, 0, root);
        assert_eq!(
            receipt.state_root_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
