use p2p_order_book::transport::{
    Delivery, GossipPayload, GossipReply, Transport, TransportError,
};
use p2p_order_book::{Order, OrderBook, OrderBookBuilder, OrderStatus, Replica, Side};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_book() -> OrderBook {
    OrderBookBuilder::new("BTC-USD").build()
}

/// What the broadcast should report back to the replica.
#[derive(Clone, Copy)]
enum Outcome {
    Delivered,
    PartialFailure,
    NoPeers,
    Error,
}

/// Test double that records every payload handed to the port.
#[derive(Clone)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<GossipPayload>>>,
    outcome: Outcome,
}

impl RecordingTransport {
    fn new(outcome: Outcome) -> Self {
        Self { sent: Arc::new(Mutex::new(Vec::new())), outcome }
    }

    fn sent(&self) -> Vec<GossipPayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn broadcast(
        &self,
        payload: GossipPayload,
    ) -> Result<Vec<Delivery>, TransportError> {
        self.sent.lock().unwrap().push(payload);
        match self.outcome {
            Outcome::Delivered => {
                Ok(vec![Delivery { peer_id: "peer-b".into(), ok: true, error: None }])
            }
            Outcome::PartialFailure => Ok(vec![
                Delivery { peer_id: "peer-b".into(), ok: true, error: None },
                Delivery { peer_id: "peer-c".into(), ok: false, error: Some("timeout".into()) },
            ]),
            Outcome::NoPeers => Err(TransportError::NoPeers),
            Outcome::Error => Err(TransportError::Broadcast("overlay unreachable".into())),
        }
    }
}

#[tokio::test]
async fn test_submit_assigns_identity_and_broadcasts_pre_matching_payload() {
    let transport = RecordingTransport::new(Outcome::Delivered);
    let mut replica = Replica::new("peer-a", make_book(), transport.clone());

    // resting liquidity so the submission partially matches before broadcast
    let _ = replica
        .submit(Order::limit("s1", Side::Sell, dec("100"), dec("1")))
        .await
        .unwrap();

    let result = replica.submit(Order::limit("", Side::Buy, dec("100"), dec("3"))).await.unwrap();

    assert!(result.order_id.starts_with("peer-a-"));
    assert_eq!(result.status, OrderStatus::PartiallyFilled);
    assert_eq!(result.trades.len(), 1);

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    match &sent[1] {
        GossipPayload::NewOrder { order } => {
            assert_eq!(order.id, result.order_id);
            assert_eq!(order.peer_id.as_deref(), Some("peer-a"));
            assert!(order.timestamp.is_some());
            // the payload carries the order as submitted, before matching
            assert_eq!(order.quantity, dec("3"));
        }
        other => panic!("expected NEW_ORDER, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_submission_is_not_broadcast() {
    let transport = RecordingTransport::new(Outcome::Delivered);
    let mut replica = Replica::new("peer-a", make_book(), transport.clone());

    let result = replica.submit(Order::limit("b1", Side::Buy, dec("0"), dec("1"))).await;

    assert!(result.is_err());
    assert!(transport.sent().is_empty());
    assert!(replica.book().get_bids().is_empty());
}

#[tokio::test]
async fn test_broadcast_failures_are_swallowed() {
    for outcome in [Outcome::PartialFailure, Outcome::NoPeers, Outcome::Error] {
        let transport = RecordingTransport::new(outcome);
        let mut replica = Replica::new("peer-a", make_book(), transport);

        let result = replica
            .submit(Order::limit("b1", Side::Buy, dec("100"), dec("1")))
            .await
            .unwrap();

        // the local application stands regardless of delivery
        assert_eq!(result.status, OrderStatus::Open);
        assert_eq!(replica.book().get_bids().len(), 1);
    }
}

#[tokio::test]
async fn test_loopback_orders_are_dropped() {
    let mut replica = Replica::new("peer-a", make_book(), RecordingTransport::new(Outcome::NoPeers));

    let order = Order::limit("o1", Side::Buy, dec("100"), dec("1")).with_peer_id("peer-a");
    let reply = replica.on_request(GossipPayload::NewOrder { order });

    assert!(reply.is_none());
    assert!(replica.book().get_bids().is_empty());
}

#[tokio::test]
async fn test_remote_orders_are_applied() {
    let mut replica = Replica::new("peer-a", make_book(), RecordingTransport::new(Outcome::NoPeers));

    let order = Order::limit("o1", Side::Buy, dec("100"), dec("1"))
        .with_peer_id("peer-b")
        .with_timestamp(1000);
    let reply = replica.on_request(GossipPayload::NewOrder { order });

    match reply {
        Some(GossipReply::Applied(result)) => assert_eq!(result.status, OrderStatus::Open),
        other => panic!("expected Applied reply, got {:?}", other),
    }
    assert_eq!(replica.book().get_bids().len(), 1);
    assert_eq!(replica.book().get_bids()[0].peer_id.as_deref(), Some("peer-b"));
}

#[tokio::test]
async fn test_invalid_remote_order_is_dropped_silently() {
    let mut replica = Replica::new("peer-a", make_book(), RecordingTransport::new(Outcome::NoPeers));

    let order = Order::limit("o1", Side::Buy, dec("100"), dec("0")).with_peer_id("peer-b");
    let reply = replica.on_request(GossipPayload::NewOrder { order });

    assert!(reply.is_none());
    assert!(replica.book().get_bids().is_empty());
}

#[tokio::test]
async fn test_snapshot_request_returns_current_state() {
    let mut replica = Replica::new("peer-a", make_book(), RecordingTransport::new(Outcome::NoPeers));
    let _ = replica.submit(Order::limit("b1", Side::Buy, dec("99"), dec("2"))).await.unwrap();

    let reply = replica.on_request(GossipPayload::SnapshotRequest);

    match reply {
        Some(GossipReply::Snapshot(snapshot)) => {
            assert_eq!(snapshot.pair, "BTC-USD");
            assert_eq!(snapshot.bids.len(), 1);
            assert!(snapshot.asks.is_empty());
        }
        other => panic!("expected Snapshot reply, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_payloads_are_ignored() {
    let mut replica = Replica::new("peer-a", make_book(), RecordingTransport::new(Outcome::NoPeers));
    assert!(replica.on_request(GossipPayload::Unknown).is_none());
}

#[tokio::test]
async fn test_two_replicas_converge_on_shuttled_broadcasts() {
    let transport_a = RecordingTransport::new(Outcome::Delivered);
    let transport_b = RecordingTransport::new(Outcome::Delivered);
    let mut replica_a = Replica::new("peer-a", make_book(), transport_a.clone());
    let mut replica_b = Replica::new("peer-b", make_book(), transport_b.clone());

    let _ = replica_a.submit(Order::limit("", Side::Sell, dec("100"), dec("1"))).await.unwrap();
    for payload in transport_a.sent() {
        replica_b.on_request(payload);
    }

    let _ = replica_b.submit(Order::limit("", Side::Buy, dec("100"), dec("1"))).await.unwrap();
    for payload in transport_b.sent() {
        replica_a.on_request(payload);
    }

    for replica in [&replica_a, &replica_b] {
        assert!(replica.book().get_bids().is_empty());
        assert!(replica.book().get_asks().is_empty());
        let trades = replica.book().get_trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, dec("100"));
        assert_eq!(trades[0].quantity, dec("1"));
    }
}
