//! Order and trade records.
//!
//! [`Order`] is the canonical unit submitted to the book and gossiped
//! between peers; [`Trade`] is the immutable record produced by a fill.
//! Both are `pub` so they can travel through snapshots, broadcasts and the
//! REST surface, but resting orders are owned exclusively by the book and
//! only reachable as copies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{OrderStatus, OrderType, Side};

/// An order as submitted to the book.
///
/// `quantity` is mutated in place as fills accrue; `price` is `None` for
/// market orders. `timestamp` is the price-time priority tiebreaker and is
/// defaulted to the node clock on entry when the submitter leaves it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub side: Side,
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Creates a limit order with the given price and quantity.
    pub fn limit(id: impl Into<String>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            peer_id: None,
            timestamp: None,
            status: OrderStatus::Open,
        }
    }

    /// Creates a market order for the given quantity.
    pub fn market(id: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
            peer_id: None,
            timestamp: None,
            status: OrderStatus::Open,
        }
    }

    /// Sets an explicit priority timestamp (millis).
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the originating peer.
    pub fn with_peer_id(mut self, peer_id: impl Into<String>) -> Self {
        self.peer_id = Some(peer_id.into());
        self
    }
}

/// Immutable record of a single fill.
///
/// `price` is always the resting order's price, so an aggressor crossing a
/// better-priced level gets the improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub pair: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub buy_order_id: String,
    pub sell_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_peer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_peer_id: Option<String>,
    pub timestamp: i64,
}

/// Millisecond wall clock used to stamp orders, trades and snapshots.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}
