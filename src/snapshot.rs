//! Self-contained representation of a book's resting state.
//!
//! Used to onboard or resynchronize peers: the heap arrays are carried in
//! heap order, which is not significant; receivers rebuild priority order by
//! inserting each order individually. Trade history is not part of a
//! snapshot and is never replayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::Order;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pair: String,
    pub timestamp: i64,
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_bid: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_ask: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<Decimal>,
}
