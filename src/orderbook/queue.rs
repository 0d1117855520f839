//! Priority keys for the bid and ask heaps.
//!
//! `BinaryHeap` is a max-heap and gives no FIFO guarantee among equal keys,
//! so every entry carries the order's arrival sequence as a tie-break:
//!
//! ```text
//! bids: higher rate first, then lower sequence
//! asks: lower rate first,  then lower sequence
//! ```
//!
//! Entries point into the book's slab. Only the remaining volume of a
//! resting order ever changes, so the key stays valid for its lifetime.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::types::{Order, Side};

/// Heap entry for one resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub side: Side,
    pub rate: Decimal,
    pub sequence: u64,
    /// Slab key of the order
    pub key: usize,
}

impl QueueEntry {
    pub fn new(order: &Order, key: usize) -> Self {
        Self {
            side: order.side,
            rate: order.limit_rate,
            sequence: order.sequence,
            key,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_rate = match self.side {
            Side::Buy => self.rate.cmp(&other.rate),
            Side::Sell => other.rate.cmp(&self.rate),
        };
        by_rate.then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
