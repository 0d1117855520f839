//! Thread-safe handle to a matching session.
//!
//! The check-then-settle sequence in the matching loop is only sound if
//! nothing else touches the ledger in between, so the book and the ledger of
//! one pair sit behind a single lock. Every call holds it for a whole
//! submission.

use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::engine::{EventLog, EventSink, MatchResult, MatchingSession};
use crate::error::EngineResult;
use crate::ledger::AccountBalance;
use crate::types::{Currency, ExecutionReceipt, Order, TraderId};

/// Cloneable, lock-protected [`MatchingSession`].
#[derive(Debug)]
pub struct SharedSession<S: EventSink = EventLog> {
    inner: Arc<Mutex<MatchingSession<S>>>,
}

impl<S: EventSink> Clone for SharedSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink> SharedSession<S> {
    pub fn new(session: MatchingSession<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// See [`MatchingSession::submit`]
    pub fn submit(&self, order: Order) -> EngineResult<MatchResult> {
        self.inner.lock().submit(order)
    }

    pub fn deposit(&self, trader: TraderId, currency: Currency, amount: Decimal) -> EngineResult<()> {
        self.inner.lock().deposit(trader, currency, amount)
    }

    pub fn available(&self, trader: TraderId, currency: Currency) -> Decimal {
        self.inner.lock().ledger().available(trader, currency)
    }

    pub fn balances(&self) -> Vec<AccountBalance> {
        self.inner.lock().balances()
    }

    pub fn receipt(&self) -> ExecutionReceipt {
        self.inner.lock().receipt()
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchingSession<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Recover the session once this is the last handle
    pub fn try_unwrap(self) -> Result<MatchingSession<S>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
