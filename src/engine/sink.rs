//! Reporting collaborators that receive [`MatchEvent`]s.

use tracing::{info, warn};

use crate::types::{AssetPair, MatchEvent, Trade};

/// Receives every event a matching session produces, in order.
pub trait EventSink {
    fn emit(&mut self, event: &MatchEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &MatchEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &MatchEvent) {
        (**self).emit(event);
    }
}

/// In-memory event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Trades only, in execution order
    pub fn trades(&self) -> impl Iterator<Item = &Trade> + '_ {
        self.events.iter().filter_map(MatchEvent::as_trade)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every buffered event, leaving the log empty
    pub fn drain(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &MatchEvent) {
        self.events.push(event.clone());
    }
}

/// Writes one human-readable line per event through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    pair: AssetPair,
}

impl TracingSink {
    pub fn new(pair: AssetPair) -> Self {
        Self { pair }
    }
}

impl EventSink for TracingSink {
    fn emit(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::Trade(trade) => {
                info!(
                    "Trade executed: trader {} buys {} {} at {} {}",
                    trade.buyer_id, trade.volume, self.pair.base, trade.price, self.pair.quote
                );
                info!(
                    "Trade executed: trader {} sells {} {} at {} {}",
                    trade.seller_id, trade.volume, self.pair.base, trade.price, self.pair.quote
                );
            }
            MatchEvent::Halted(shortfall) => {
                warn!(
                    "Trader {} lacks sufficient {}: required {}, available {}",
                    shortfall.trader_id,
                    self.pair.code(shortfall.currency),
                    shortfall.required,
                    shortfall.available
                );
            }
            MatchEvent::Rejected { trader_id, reason } => {
                warn!("Order from trader {} rejected: {}", trader_id, reason);
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &MatchEvent) {}
}
