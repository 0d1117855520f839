//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same submissions always produce the same trades and balances
//! 2. **Exact Math**: Decimal arithmetic, no floating point
//! 3. **Synchronous Execution**: A submission runs to quiescence before returning
//! 4. **Price-Time Priority**: Best rate first, then FIFO
//!
//! ## Example
//!
//! ```
//! use fxmatch::engine::MatchingSession;
//! use fxmatch::error::EngineError;
//! use fxmatch::ledger::Ledger;
//! use fxmatch::types::{Currency, Order};
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::new();
//! ledger.deposit(3, Currency::Quote, dec!(10)).unwrap();
//! ledger.deposit(4, Currency::Base, dec!(100)).unwrap();
//!
//! let mut session = MatchingSession::new(ledger);
//! session.submit(Order::buy(3, dec!(100), dec!(30))).unwrap();
//!
//! // Buyer 3 cannot pay 2000: matching halts, both orders keep resting
//! let err = session.submit(Order::sell(4, dec!(100), dec!(20))).unwrap_err();
//! assert!(matches!(err, EngineError::InsufficientBalance(_)));
//! assert_eq!(session.book().len(), 2);
//! ```

pub mod policy;
pub mod session;
pub mod shared;
pub mod sink;

pub use policy::ShortfallPolicy;
pub use session::{MatchResult, MatchingSession};
pub use shared::SharedSession;
pub use sink::{EventLog, EventSink, NullSink, TracingSink};
