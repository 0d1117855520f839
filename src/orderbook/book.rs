//! Two-sided order book for a single pair.
//!
//! ## Architecture
//!
//! - **Slab**: storage for resting orders, O(1) insert/remove by key
//! - **BinaryHeap** per side: priority queue of [`QueueEntry`] keys
//!
//! The head of each heap is always the true best order on that side. The
//! heaps are never re-sorted; only push/pop maintain them.
//!
//! ## Example
//!
//! ```
//! use fxmatch::orderbook::OrderBook;
//! use fxmatch::types::Order;
//! use rust_decimal_macros::dec;
//!
//! let mut book = OrderBook::with_capacity(16);
//! book.insert(Order::buy(1, dec!(50), dec!(25)));
//! book.insert(Order::sell(2, dec!(50), dec!(26)));
//!
//! assert_eq!(book.best_bid_rate(), Some(dec!(25)));
//! assert_eq!(book.best_ask_rate(), Some(dec!(26)));
//! assert_eq!(book.spread(), Some(dec!(1)));
//! assert!(!book.is_crossed());
//! ```

use std::collections::BinaryHeap;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use slab::Slab;

use crate::orderbook::QueueEntry;
use crate::types::{Order, Side};

/// Bid and ask priority queues over slab-stored orders.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Resting orders
    orders: Slab<Order>,

    /// Highest rate first, FIFO within a rate
    bids: BinaryHeap<QueueEntry>,

    /// Lowest rate first, FIFO within a rate
    asks: BinaryHeap<QueueEntry>,

    /// Next arrival sequence (starts at 1)
    next_sequence: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with room for `order_capacity` resting orders
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BinaryHeap::with_capacity(order_capacity / 2),
            asks: BinaryHeap::with_capacity(order_capacity / 2),
            next_sequence: 1,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Total number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    /// Sequence the next inserted order will receive
    #[inline]
    pub fn peek_next_sequence(&self) -> u64 {
        self.next_sequence
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Add an order to the side given by `order.side`
    ///
    /// The book stamps the order with the next arrival sequence and returns
    /// it. Validation is the caller's job.
    pub fn insert(&mut self, mut order: Order) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        order.sequence = sequence;

        let side = order.side;
        let entry = self.orders.vacant_entry();
        let queued = QueueEntry::new(&order, entry.key());
        entry.insert(order);

        self.heap_mut(side).push(queued);
        sequence
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest-priority bid, if any
    #[inline]
    pub fn peek_best_bid(&self) -> Option<&Order> {
        self.peek_best(Side::Buy)
    }

    /// Highest-priority ask, if any
    #[inline]
    pub fn peek_best_ask(&self) -> Option<&Order> {
        self.peek_best(Side::Sell)
    }

    /// Highest-priority order on `side`, if any
    pub fn peek_best(&self, side: Side) -> Option<&Order> {
        self.heap(side)
            .peek()
            .and_then(|entry| self.orders.get(entry.key))
    }

    /// Remove and return the best bid
    #[inline]
    pub fn pop_best_bid(&mut self) -> Option<Order> {
        self.pop_best(Side::Buy)
    }

    /// Remove and return the best ask
    #[inline]
    pub fn pop_best_ask(&mut self) -> Option<Order> {
        self.pop_best(Side::Sell)
    }

    /// Remove and return the best order on `side`
    pub fn pop_best(&mut self, side: Side) -> Option<Order> {
        let entry = self.heap_mut(side).pop()?;
        self.orders.try_remove(entry.key)
    }

    /// Match `volume` against the head of `side`.
    ///
    /// The head is removed exactly when its remaining volume reaches zero;
    /// the removed order is returned in that case.
    pub fn fill_best(&mut self, side: Side, volume: Decimal) -> Option<Order> {
        let key = self.heap(side).peek()?.key;
        let order = self.orders.get_mut(key)?;
        order.fill(volume);

        if order.is_filled() {
            self.pop_best(side)
        } else {
            None
        }
    }

    /// Best bid rate (highest)
    #[inline]
    pub fn best_bid_rate(&self) -> Option<Decimal> {
        self.bids.peek().map(|entry| entry.rate)
    }

    /// Best ask rate (lowest)
    #[inline]
    pub fn best_ask_rate(&self) -> Option<Decimal> {
        self.asks.peek().map(|entry| entry.rate)
    }

    /// `best_ask - best_bid` when the book is not crossed
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid_rate(), self.best_ask_rate()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Whether the best bid and best ask can trade
    pub fn is_crossed(&self) -> bool {
        match (self.peek_best_bid(), self.peek_best_ask()) {
            (Some(bid), Some(ask)) => bid.crosses(ask),
            _ => false,
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Resting orders on `side`, best first
    pub fn resting(&self, side: Side) -> Vec<&Order> {
        let mut entries: Vec<_> = self.heap(side).iter().collect();
        entries.sort_unstable_by(|a, b| b.cmp(a));
        entries
            .into_iter()
            .filter_map(|entry| self.orders.get(entry.key))
            .collect()
    }

    /// Total remaining volume on `side`, or None if it leaves the decimal
    /// range
    pub fn depth(&self, side: Side) -> Option<Decimal> {
        self.heap(side)
            .iter()
            .filter_map(|entry| self.orders.get(entry.key))
            .try_fold(Decimal::ZERO, |total, order| {
                total.checked_add(order.remaining_volume)
            })
    }

    /// Feed the resting orders, in priority order, into a state-root hasher
    pub fn digest(&self, hasher: &mut Sha256) {
        for side in [Side::Buy, Side::Sell] {
            for order in self.resting(side) {
                hasher.update(order.sequence.to_le_bytes());
                hasher.update(order.trader_id.to_le_bytes());
                hasher.update(order.limit_rate.normalize().to_string().as_bytes());
                hasher.update([0u8]);
                hasher.update(order.remaining_volume.normalize().to_string().as_bytes());
                hasher.update([0u8]);
            }
        }
    }

    #[inline]
    fn heap(&self, side: Side) -> &BinaryHeap<QueueEntry> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    #[inline]
    fn heap_mut(&mut self, side: Side) -> &mut BinaryHeap<QueueEntry> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
