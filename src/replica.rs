//! Replica adapter: classifies orders as local or remote and drives the
//! broadcast substrate.
//!
//! Locally submitted orders are stamped with this node's peer id, applied to
//! the book, then handed to the transport for best-effort propagation.
//! Inbound payloads are applied idempotently with respect to origin: a
//! node's own broadcasts looping back are dropped. Each replica matches
//! independently on arrival; no cross-peer total order is attempted.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::book::OrderBook;
use crate::error::Result;
use crate::order::{now_millis, Order};
use crate::report::SubmitResult;
use crate::transport::{GossipPayload, GossipReply, Transport, TransportError};

/// One node's authoritative replica of the shared book.
pub struct Replica<T: Transport> {
    peer_id: String,
    book: OrderBook,
    transport: T,
}

impl<T: Transport> Replica<T> {
    pub fn new(peer_id: impl Into<String>, book: OrderBook, transport: T) -> Self {
        Self { peer_id: peer_id.into(), book, transport }
    }

    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.book
    }

    /// Submits a locally originated order.
    ///
    /// Assigns a fresh id when the submitter left it empty, stamps the order
    /// with this node's peer id, applies it locally, then broadcasts the
    /// pre-matching payload. The timestamp is fixed before the broadcast so
    /// every replica resolves time priority for this order identically.
    ///
    /// Broadcast failure is non-fatal: the local application stands and the
    /// failure is logged and swallowed.
    ///
    /// # Errors
    /// Returns `Err` only when the book rejects the order as invalid; no
    /// broadcast is attempted in that case.
    pub async fn submit(&mut self, mut order: Order) -> Result<SubmitResult> {
        if order.id.is_empty() {
            order.id = self.fresh_order_id();
        }
        order.peer_id = Some(self.peer_id.clone());
        if order.timestamp.is_none() {
            order.timestamp = Some(now_millis());
        }

        let outbound = order.clone();
        let result = self.book.add_order(order)?;

        match self.transport.broadcast(GossipPayload::NewOrder { order: outbound }).await {
            Ok(deliveries) => {
                for delivery in deliveries.iter().filter(|d| !d.ok) {
                    warn!(
                        peer_id = %delivery.peer_id,
                        error = delivery.error.as_deref().unwrap_or("unknown"),
                        "order broadcast not delivered"
                    );
                }
            }
            Err(TransportError::NoPeers) => {
                debug!(order_id = %result.order_id, "no peers found, order applied locally only");
            }
            Err(err) => {
                warn!(order_id = %result.order_id, %err, "order broadcast failed");
            }
        }

        Ok(result)
    }

    /// Handles a payload delivered by the transport.
    ///
    /// - `NEW_ORDER` from this node (loopback) is dropped.
    /// - `NEW_ORDER` from a peer is applied through
    ///   [`OrderBook::apply_remote_order`]; a rejected remote order is logged
    ///   and dropped, never surfaced back across the transport.
    /// - `SNAPSHOT_REQUEST` answers with the current resting state.
    /// - Unknown payload types are ignored.
    pub fn on_request(&mut self, payload: GossipPayload) -> Option<GossipReply> {
        match payload {
            GossipPayload::NewOrder { order } => {
                if order.peer_id.as_deref() == Some(self.peer_id.as_str()) {
                    return None;
                }
                match self.book.apply_remote_order(order) {
                    Ok(result) => Some(GossipReply::Applied(result)),
                    Err(err) => {
                        warn!(%err, "dropping invalid remote order");
                        None
                    }
                }
            }
            GossipPayload::SnapshotRequest => {
                Some(GossipReply::Snapshot(self.book.get_snapshot()))
            }
            GossipPayload::Unknown => None,
        }
    }

    /// Peer-scoped order ids: orders minted concurrently on different nodes
    /// can never collide.
    fn fresh_order_id(&self) -> String {
        format!("{}-{}", self.peer_id, Uuid::new_v4().simple())
    }
}
