//! The matching session: submission, insertion and the matching loop.
//!
//! ## Matching Rules
//!
//! - The loop pairs the best bid with the best ask while
//!   `bid rate >= ask rate`
//! - Volume is `min` of both remaining volumes
//! - Price is always the ask's limit rate
//! - Both traders are checked for solvency before any balance moves
//! - On a shortfall the loop stops for the whole submission
//!   ([`ShortfallPolicy::FailFast`]); both orders stay resting untouched
//!
//! A submission runs to completion before anything else can observe the
//! book or the ledger.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::{EventLog, EventSink, ShortfallPolicy};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{AccountBalance, Ledger};
use crate::orderbook::OrderBook;
use crate::types::{
    transaction_value, Currency, ExecutionReceipt, MatchEvent, Order, Shortfall, Side, Trade,
    TraderId,
};

/// Outcome of a submission that ran to a non-crossing book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Book sequence assigned to the submitted order
    pub sequence: u64,

    /// Trades executed during this submission, in order
    pub trades: Vec<Trade>,

    /// Volume of the submitted order still resting (zero if fully filled)
    pub resting_volume: Decimal,
}

impl MatchResult {
    pub fn is_fully_filled(&self) -> bool {
        self.resting_volume.is_zero()
    }

    /// Total base volume traded during the submission, or None if it leaves
    /// the decimal range
    pub fn traded_volume(&self) -> Option<Decimal> {
        self.trades
            .iter()
            .try_fold(Decimal::ZERO, |total, trade| total.checked_add(trade.volume))
    }
}

/// Order book plus ledger for one pair, driven one submission at a time.
///
/// ## Example
///
/// ```
/// use fxmatch::engine::MatchingSession;
/// use fxmatch::ledger::Ledger;
/// use fxmatch::types::{Currency, Order};
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new();
/// ledger.deposit(1, Currency::Quote, dec!(2000)).unwrap();
/// ledger.deposit(2, Currency::Base, dec!(100)).unwrap();
///
/// let mut session = MatchingSession::new(ledger);
/// session.submit(Order::buy(1, dec!(50), dec!(25))).unwrap();
/// let result = session.submit(Order::sell(2, dec!(50), dec!(24))).unwrap();
///
/// assert_eq!(result.trades.len(), 1);
/// assert_eq!(result.trades[0].price, dec!(24));
/// assert_eq!(session.ledger().available(1, Currency::Quote), dec!(800));
/// ```
#[derive(Debug)]
pub struct MatchingSession<S: EventSink = EventLog> {
    ledger: Ledger,
    book: OrderBook,
    sink: S,
    config: EngineConfig,

    /// Next trade ID
    next_trade_id: u64,

    orders_processed: u64,
    trades_executed: u64,
    halts: u64,
}

impl MatchingSession<EventLog> {
    /// Session with default config that records events in an [`EventLog`]
    pub fn new(ledger: Ledger) -> Self {
        Self::with_sink(ledger, EventLog::new(), EngineConfig::default())
    }
}

impl<S: EventSink> MatchingSession<S> {
    pub fn with_sink(ledger: Ledger, sink: S, config: EngineConfig) -> Self {
        Self {
            ledger,
            book: OrderBook::with_capacity(config.order_capacity),
            sink,
            config,
            next_trade_id: 1,
            orders_processed: 0,
            trades_executed: 0,
            halts: 0,
        }
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Insert `order` and match until the book no longer crosses.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidOrder`]: rate or volume not positive; the
    ///   book is untouched.
    /// - [`EngineError::InsufficientBalance`]: matching halted on a
    ///   shortfall. Trades executed earlier in this submission stay applied
    ///   and have already been emitted to the sink.
    /// - [`EngineError::Overflow`] / [`EngineError::PrecisionLoss`]: a
    ///   transaction value or a new balance cannot be held exactly; nothing
    ///   was applied for that pair.
    pub fn submit(&mut self, mut order: Order) -> EngineResult<MatchResult> {
        order.remaining_volume = order.original_volume;
        if let Err(err) = order.validate() {
            if let EngineError::InvalidOrder { trader_id, reason } = &err {
                warn!(trader_id, %reason, "order rejected");
                self.sink.emit(&MatchEvent::Rejected {
                    trader_id: *trader_id,
                    reason: reason.clone(),
                });
            }
            return Err(err);
        }

        let side = order.side;
        let volume = order.original_volume;
        let trader_id = order.trader_id;
        let sequence = self.book.insert(order);
        self.orders_processed += 1;
        debug!(sequence, trader_id, %side, %volume, "order admitted");

        let trades = self.run_matching()?;

        let filled: Decimal = trades
            .iter()
            .filter(|trade| match side {
                Side::Buy => trade.bid_sequence == sequence,
                Side::Sell => trade.ask_sequence == sequence,
            })
            .map(|trade| trade.volume)
            .sum();

        Ok(MatchResult {
            sequence,
            trades,
            resting_volume: volume - filled,
        })
    }

    /// Pair best bid with best ask until the book stops crossing.
    fn run_matching(&mut self) -> EngineResult<Vec<Trade>> {
        let mut trades = Vec::new();

        loop {
            let (bid, ask) = match (self.book.peek_best_bid(), self.book.peek_best_ask()) {
                (Some(bid), Some(ask)) => (bid, ask),
                _ => return Ok(trades),
            };
            if !bid.crosses(ask) {
                return Ok(trades);
            }

            let volume = bid.remaining_volume.min(ask.remaining_volume);
            let price = ask.limit_rate;
            let value = transaction_value(volume, price)?;
            let (buyer, seller) = (bid.trader_id, ask.trader_id);
            let (bid_sequence, ask_sequence) = (bid.sequence, ask.sequence);

            if let Err(shortfall) = self.check_solvency(buyer, seller, volume, value) {
                return Err(self.halt(shortfall));
            }

            self.ledger.settle(buyer, seller, volume, value)?;
            self.book.fill_best(Side::Buy, volume);
            self.book.fill_best(Side::Sell, volume);

            let trade = Trade::new(
                self.next_trade_id,
                buyer,
                seller,
                bid_sequence,
                ask_sequence,
                volume,
                price,
            );
            self.next_trade_id += 1;
            self.trades_executed += 1;

            debug!(
                trade_id = trade.id,
                buyer,
                seller,
                %volume,
                %price,
                "trade executed"
            );
            self.sink.emit(&MatchEvent::Trade(trade.clone()));
            trades.push(trade);
        }
    }

    /// Buyer must cover `value` in quote, seller `volume` in base.
    fn check_solvency(
        &self,
        buyer: TraderId,
        seller: TraderId,
        volume: Decimal,
        value: Decimal,
    ) -> Result<(), Shortfall> {
        self.ledger.ensure_available(buyer, Currency::Quote, value)?;
        self.ledger.ensure_available(seller, Currency::Base, volume)
    }

    fn halt(&mut self, shortfall: Shortfall) -> EngineError {
        match self.config.shortfall_policy {
            ShortfallPolicy::FailFast => {
                warn!(
                    trader_id = shortfall.trader_id,
                    currency = %shortfall.currency,
                    required = %shortfall.required,
                    available = %shortfall.available,
                    "matching halted on shortfall"
                );
                self.halts += 1;
                self.sink.emit(&MatchEvent::Halted(shortfall.clone()));
                EngineError::InsufficientBalance(shortfall)
            }
        }
    }

    // ========================================================================
    // Ledger access
    // ========================================================================

    /// Seed a trader balance
    pub fn deposit(&mut self, trader: TraderId, currency: Currency, amount: Decimal) -> EngineResult<()> {
        self.ledger.deposit(trader, currency, amount)
    }

    #[inline]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable ledger access for seeding between submissions
    #[inline]
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Read-only view of every trader's balances
    pub fn balances(&self) -> Vec<AccountBalance> {
        self.ledger.snapshot()
    }

    // ========================================================================
    // Other accessors
    // ========================================================================

    #[inline]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters plus a state root over ledger and resting book
    pub fn receipt(&self) -> ExecutionReceipt {
        let mut hasher = Sha256::new();
        self.ledger.digest(&mut hasher);
        self.book.digest(&mut hasher);

        ExecutionReceipt::new(
            self.orders_processed,
            self.trades_executed,
            self.halts,
            ExecutionReceipt::finalize_root(hasher),
        )
    }

    pub fn into_parts(self) -> (Ledger, OrderBook, S) {
        (self.ledger, self.book, self.sink)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Balances;
    use rust_decimal_macros::dec;

    fn funded_session() -> MatchingSession {
        let mut ledger = Ledger::new();
        ledger.deposit(1, Currency::Quote, dec!(2000)).unwrap();
        ledger.deposit(2, Currency::Base, dec!(100)).unwrap();
        MatchingSession::new(ledger)
    }

    #[test]
    fn test_resting_order_without_counterpart() {
        let mut session = funded_session();
        let before = session.ledger().clone();

        let result = session.submit(Order::buy(1, dec!(50), dec!(25))).unwrap();

        assert_eq!(result.sequence, 1);
        assert!(result.trades.is_empty());
        assert_eq!(result.resting_volume, dec!(50));
        assert_eq!(session.ledger(), &before);
        assert_eq!(session.book().bid_count(), 1);
    }

    #[test]
    fn test_basic_match_at_ask_price() {
        let mut session = funded_session();
        session.submit(Order::buy(1, dec!(50), dec!(25))).unwrap();
        let result = session.submit(Order::sell(2, dec!(50), dec!(24))).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.id, 1);
        assert_eq!((trade.buyer_id, trade.seller_id), (1, 2));
        assert_eq!(trade.volume, dec!(50));
        assert_eq!(trade.price, dec!(24));
        assert!(result.is_fully_filled());

        assert_eq!(session.ledger().balances(1), Balances::new(dec!(50), dec!(800)));
        assert_eq!(session.ledger().balances(2), Balances::new(dec!(50), dec!(1200)));
        assert!(session.book().is_empty());
    }

    #[test]
    fn test_ask_price_used_when_bid_is_newer() {
        let mut session = funded_session();
        session.submit(Order::sell(2, dec!(10), dec!(20))).unwrap();
        let result = session.submit(Order::buy(1, dec!(10), dec!(30))).unwrap();

        assert_eq!(result.trades[0].price, dec!(20));
        assert_eq!(session.ledger().available(1, Currency::Quote), dec!(1800));
    }

    #[test]
    fn test_partial_fill_rests_remainder() {
        let mut session = funded_session();
        session.submit(Order::buy(1, dec!(30), dec!(26))).unwrap();
        let result = session.submit(Order::sell(2, dec!(20), dec!(23))).unwrap();

        assert!(result.is_fully_filled());
        assert_eq!(result.traded_volume(), Some(dec!(20)));
        let bid = session.book().peek_best_bid().unwrap();
        assert_eq!(bid.remaining_volume, dec!(10));
        assert_eq!(bid.original_volume, dec!(30));
        assert!(session.book().peek_best_ask().is_none());
    }

    #[test]
    fn test_incoming_order_sweeps_multiple_levels() {
        let mut ledger = Ledger::new();
        ledger.deposit(1, Currency::Quote, dec!(10000)).unwrap();
        ledger.deposit(2, Currency::Base, dec!(100)).unwrap();
        let mut session = MatchingSession::new(ledger);

        session.submit(Order::sell(2, dec!(10), dec!(22))).unwrap();
        session.submit(Order::sell(2, dec!(10), dec!(21))).unwrap();
        session.submit(Order::sell(2, dec!(10), dec!(25))).unwrap();

        let result = session.submit(Order::buy(1, dec!(25), dec!(23))).unwrap();
        let prices: Vec<_> = result.trades.iter().map(|t| t.price).collect();

        assert_eq!(prices, vec![dec!(21), dec!(22)]);
        assert_eq!(result.resting_volume, dec!(5));
        assert_eq!(session.ledger().available(1, Currency::Quote), dec!(9570));
        assert_eq!(session.book().best_bid_rate(), Some(dec!(23)));
        assert_eq!(session.book().best_ask_rate(), Some(dec!(25)));
    }

    #[test]
    fn test_shortfall_halts_and_keeps_orders() {
        let mut ledger = Ledger::new();
        ledger.deposit(3, Currency::Quote, dec!(10)).unwrap();
        ledger.deposit(4, Currency::Base, dec!(100)).unwrap();
        let mut session = MatchingSession::new(ledger);
        let before = session.ledger().clone();

        session.submit(Order::buy(3, dec!(100), dec!(30))).unwrap();
        let err = session.submit(Order::sell(4, dec!(100), dec!(20))).unwrap_err();

        assert_eq!(
            err,
            EngineError::InsufficientBalance(Shortfall::new(3, Currency::Quote, dec!(2000), dec!(10)))
        );
        assert_eq!(session.ledger(), &before);
        assert_eq!(session.book().peek_best_bid().unwrap().remaining_volume, dec!(100));
        assert_eq!(session.book().peek_best_ask().unwrap().remaining_volume, dec!(100));
        assert!(session.book().is_crossed());

        let events = session.sink().events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MatchEvent::Halted(_)));
        assert_eq!(session.receipt().halts, 1);
    }

    #[test]
    fn test_seller_shortfall_reported_in_base() {
        let mut ledger = Ledger::new();
        ledger.deposit(1, Currency::Quote, dec!(1000)).unwrap();
        ledger.deposit(2, Currency::Base, dec!(5)).unwrap();
        let mut session = MatchingSession::new(ledger);

        session.submit(Order::buy(1, dec!(10), dec!(25))).unwrap();
        let err = session.submit(Order::sell(2, dec!(10), dec!(25))).unwrap_err();

        assert_eq!(
            err,
            EngineError::InsufficientBalance(Shortfall::new(2, Currency::Base, dec!(10), dec!(5)))
        );
    }

    #[test]
    fn test_invalid_order_rejected() {
        let mut session = funded_session();

        let err = session.submit(Order::buy(1, dec!(0), dec!(25))).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder { trader_id: 1, .. }));
        assert!(session.submit(Order::sell(2, dec!(5), dec!(-1))).is_err());

        assert!(session.book().is_empty());
        assert_eq!(session.book().peek_next_sequence(), 1);
        assert_eq!(session.sink().len(), 2);
        assert_eq!(session.receipt().orders_processed, 0);
    }

    #[test]
    fn test_traded_volume_overflow_is_none() {
        let trade = Trade::new(1, 1, 2, 1, 2, Decimal::MAX, dec!(1));
        let result = MatchResult {
            sequence: 2,
            trades: vec![trade.clone(), trade],
            resting_volume: Decimal::ZERO,
        };
        assert_eq!(result.traded_volume(), None);
    }

    #[test]
    fn test_admitted_volume_is_original_volume() {
        let mut session = funded_session();
        let mut order = Order::buy(1, dec!(50), dec!(25));
        order.remaining_volume = dec!(10);

        let result = session.submit(order).unwrap();
        assert_eq!(result.resting_volume, dec!(50));
        assert_eq!(session.book().peek_best_bid().unwrap().remaining_volume, dec!(50));

        let result = session.submit(Order::sell(2, dec!(20), dec!(25))).unwrap();
        assert_eq!(result.resting_volume, Decimal::ZERO);
        assert_eq!(session.book().peek_best_bid().unwrap().remaining_volume, dec!(30));
    }

    #[test]
    fn test_overflowing_settlement_keeps_state() {
        let mut ledger = Ledger::new();
        ledger.deposit(1, Currency::Quote, dec!(1000)).unwrap();
        ledger.deposit(1, Currency::Base, Decimal::MAX).unwrap();
        ledger.deposit(2, Currency::Base, dec!(10)).unwrap();
        let mut session = MatchingSession::new(ledger);
        let before = session.ledger().clone();

        session.submit(Order::sell(2, dec!(10), dec!(5))).unwrap();
        let err = session.submit(Order::buy(1, dec!(10), dec!(5))).unwrap_err();

        assert_eq!(err, EngineError::Overflow("settlement"));
        assert_eq!(session.ledger(), &before);
        assert_eq!(session.book().peek_best_bid().unwrap().remaining_volume, dec!(10));
        assert_eq!(session.book().peek_best_ask().unwrap().remaining_volume, dec!(10));
        assert_eq!(session.sink().trades().count(), 0);
        assert_eq!(session.receipt().trades_executed, 0);
    }

    #[test]
    fn test_trade_ids_increase_across_submissions() {
        let mut session = funded_session();
        session.submit(Order::buy(1, dec!(10), dec!(25))).unwrap();
        session.submit(Order::sell(2, dec!(5), dec!(25))).unwrap();
        session.submit(Order::sell(2, dec!(5), dec!(25))).unwrap();

        let ids: Vec<_> = session.sink().trades().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(session.receipt().trades_executed, 2);
    }

    #[test]
    fn test_receipt_tracks_state() {
        let mut a = funded_session();
        let mut b = funded_session();
        assert_eq!(a.receipt(), b.receipt());

        a.submit(Order::buy(1, dec!(10), dec!(25))).unwrap();
        assert_ne!(a.receipt().state_root, b.receipt().state_root);

        b.submit(Order::buy(1, dec!(10), dec!(25))).unwrap();
        assert_eq!(a.receipt(), b.receipt());
    }
}
