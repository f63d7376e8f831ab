//! Abstract broadcast port between a replica and the peer overlay.
//!
//! The core never implements peer discovery or delivery; it hands payloads
//! to an injected [`Transport`] and tolerates every failure it can report.
//! A payload carries a `type` discriminator on the wire so that peers
//! running newer software can send frames this node ignores.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::order::Order;
use crate::report::SubmitResult;
use crate::snapshot::Snapshot;

/// A broadcast frame exchanged between replicas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GossipPayload {
    /// An accepted order, as submitted and before any matching.
    #[serde(rename = "NEW_ORDER")]
    NewOrder { order: Order },
    /// Ask a peer for its current resting state.
    #[serde(rename = "SNAPSHOT_REQUEST")]
    SnapshotRequest,
    /// Any discriminator this node does not understand.
    #[serde(other)]
    Unknown,
}

/// Reply produced when a replica handles an inbound payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GossipReply {
    Applied(SubmitResult),
    Snapshot(Snapshot),
}

/// Per-peer delivery outcome of a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub peer_id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// Nobody to deliver to. Not an error for the submitting order flow.
    #[error("no peers found")]
    NoPeers,
    #[error("broadcast failed: {0}")]
    Broadcast(String),
}

/// Outbound half of the transport port.
///
/// Implementations are free to suspend; the book itself never does. Partial
/// delivery is reported per peer in the `Ok` case and is non-fatal.
pub trait Transport {
    fn broadcast(
        &self,
        payload: GossipPayload,
    ) -> impl Future<Output = std::result::Result<Vec<Delivery>, TransportError>> + Send;
}

/// Transport for a node running without an overlay: every broadcast
/// reports the no-peers condition.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    async fn broadcast(
        &self,
        _payload: GossipPayload,
    ) -> std::result::Result<Vec<Delivery>, TransportError> {
        Err(TransportError::NoPeers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_tags() {
        let json = serde_json::to_string(&GossipPayload::SnapshotRequest).unwrap();
        assert_eq!(json, r#"{"type":"SNAPSHOT_REQUEST"}"#);

        let parsed: GossipPayload = serde_json::from_str(r#"{"type":"SNAPSHOT_REQUEST"}"#).unwrap();
        assert_eq!(parsed, GossipPayload::SnapshotRequest);
    }

    #[test]
    fn test_unknown_payload_type_is_tolerated() {
        let parsed: GossipPayload =
            serde_json::from_str(r#"{"type":"PEER_GOSSIP","hops":3}"#).unwrap();
        assert_eq!(parsed, GossipPayload::Unknown);
    }
}
