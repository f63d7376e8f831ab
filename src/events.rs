//! Observer hooks and the event frames pushed to stream adapters.
//!
//! The book notifies a fixed set of event kinds synchronously on the calling
//! context. A hook must not re-enter the book; adapters that perform I/O
//! (the SSE stream, outbound queues) marshal the event into a channel and
//! return immediately.

use crate::order::{Order, Trade};
use crate::snapshot::Snapshot;

pub type TradeHook = Box<dyn Fn(&Trade) + Send + Sync>;
pub type OrderHook = Box<dyn Fn(&Order) + Send + Sync>;

/// Optional observer callbacks invoked by the book.
///
/// Invocation order within a single submission: `on_order_removed` fires
/// during matching after each fully consumed resting order, `on_trade` fires
/// once per trade in generation order after the matching loop, and
/// `on_order_added` fires last if a limit remainder rests. Every trade is
/// already in the trade log by the time any hook observes it.
#[derive(Default)]
pub struct BookHooks {
    pub on_trade: Option<TradeHook>,
    pub on_order_added: Option<OrderHook>,
    pub on_order_removed: Option<OrderHook>,
}

impl BookHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_trade(mut self, hook: impl Fn(&Trade) + Send + Sync + 'static) -> Self {
        self.on_trade = Some(Box::new(hook));
        self
    }

    pub fn on_order_added(mut self, hook: impl Fn(&Order) + Send + Sync + 'static) -> Self {
        self.on_order_added = Some(Box::new(hook));
        self
    }

    pub fn on_order_removed(mut self, hook: impl Fn(&Order) + Send + Sync + 'static) -> Self {
        self.on_order_removed = Some(Box::new(hook));
        self
    }
}

/// A hook event as fanned out to push subscribers.
#[derive(Debug, Clone)]
pub enum EventFrame {
    Snapshot(Snapshot),
    Trade(Trade),
    OrderAdded(Order),
    OrderRemoved(Order),
}

impl EventFrame {
    /// Event name used on the SSE wire.
    pub fn name(&self) -> &'static str {
        match self {
            EventFrame::Snapshot(_) => "snapshot",
            EventFrame::Trade(_) => "trade",
            EventFrame::OrderAdded(_) => "order_added",
            EventFrame::OrderRemoved(_) => "order_removed",
        }
    }
}
