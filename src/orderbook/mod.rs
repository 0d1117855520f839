//! Order book for a single base/quote pair.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: resting orders live in a `Slab<Order>`
//! - **Priority queues**: one `BinaryHeap` per side holding [`QueueEntry`] keys
//! - **Price-time priority**: rate first, then arrival sequence (FIFO)
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert | O(log n) |
//! | Peek best bid/ask | O(1) |
//! | Pop best bid/ask | O(log n) |
//! | Partial fill of head | O(1) |

pub mod book;
pub mod queue;

pub use book::OrderBook;
pub use queue::QueueEntry;
