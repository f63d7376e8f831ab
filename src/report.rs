//! Result type returned after processing a submitted order.

use serde::Serialize;

use crate::order::{Order, Trade};
use crate::OrderStatus;

/// Outcome of a single `add_order` call.
///
/// # Fields
/// - `order_id`: id of the submitted order (assigned by the replica when absent)
/// - `status`: final status of the aggressor
/// - `trades`: fills produced by this submission, in generation order
/// - `remainder`: the resting limit remainder, if any; market leftovers are
///   discarded and never reported here
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResult {
    pub order_id: String,
    pub status: OrderStatus,
    pub trades: Vec<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remainder: Option<Order>,
}
