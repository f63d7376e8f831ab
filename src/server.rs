//! REST and Server-Sent-Events surface for a node.
//!
//! A thin adapter over the replica: handlers take the replica lock, call
//! into the core, and serialize the result. Book hooks push event frames
//! into a broadcast channel that fans out to every `/events` subscriber;
//! sends to a channel with no subscribers are intentionally ignored.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::OrderBookError;
use crate::events::{BookHooks, EventFrame};
use crate::order::{Order, Trade};
use crate::replica::Replica;
use crate::report::SubmitResult;
use crate::snapshot::Snapshot;
use crate::transport::Transport;
use crate::{OrderStatus, OrderType, Side};

/// Shared state handed to every handler.
pub struct AppState<T: Transport> {
    pub replica: Arc<RwLock<Replica<T>>>,
    pub events: broadcast::Sender<EventFrame>,
}

impl<T: Transport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self { replica: self.replica.clone(), events: self.events.clone() }
    }
}

/// Hooks that forward every book event into the SSE broadcast channel.
///
/// The hooks only enqueue; they never re-enter the book and never fail the
/// submission that triggered them.
pub fn event_hooks(events: broadcast::Sender<EventFrame>) -> BookHooks {
    let trade_tx = events.clone();
    let added_tx = events.clone();
    let removed_tx = events;
    BookHooks::new()
        .on_trade(move |trade| {
            let _ = trade_tx.send(EventFrame::Trade(trade.clone()));
        })
        .on_order_added(move |order| {
            let _ = added_tx.send(EventFrame::OrderAdded(order.clone()));
        })
        .on_order_removed(move |order| {
            let _ = removed_tx.send(EventFrame::OrderRemoved(order.clone()));
        })
}

/// Builds the node router.
pub fn router<T: Transport + Send + Sync + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/state", get(get_state::<T>))
        .route("/order", post(submit_order::<T>))
        .route("/order/:id", delete(cancel_order::<T>))
        .route("/events", get(event_stream::<T>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the node until the task is aborted.
pub async fn serve<T: Transport + Send + Sync + 'static>(
    addr: &str,
    state: AppState<T>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "order book node listening");
    axum::serve(listener, router(state)).await
}

/// Body of `POST /order`.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
struct StateResponse {
    peer_id: String,
    #[serde(flatten)]
    snapshot: Snapshot,
    trades: Vec<Trade>,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancelled: Option<Order>,
}

async fn get_state<T: Transport + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
) -> impl IntoResponse {
    let replica = state.replica.read().await;
    let response = StateResponse {
        peer_id: replica.peer_id().to_string(),
        snapshot: replica.book().get_snapshot(),
        trades: replica.book().recent_trades(20),
    };
    Json(response)
}

async fn submit_order<T: Transport + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<SubmitResult>, ApiError> {
    // id, peer id and timestamp are assigned by the replica
    let order = Order {
        id: String::new(),
        side: request.side,
        order_type: request.order_type,
        price: request.price,
        quantity: request.quantity,
        peer_id: None,
        timestamp: None,
        status: OrderStatus::Open,
    };
    let mut replica = state.replica.write().await;
    let result = replica.submit(order).await?;
    Ok(Json(result))
}

async fn cancel_order<T: Transport + Send + Sync + 'static>(
    Path(id): Path<String>,
    State(state): State<AppState<T>>,
) -> impl IntoResponse {
    let mut replica = state.replica.write().await;
    let cancelled = replica.book_mut().cancel_order(&id);
    Json(CancelResponse { ok: cancelled.is_some(), cancelled })
}

async fn event_stream<T: Transport + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();
    let snapshot = state.replica.read().await.book().get_snapshot();

    let initial = stream::once(async move {
        Ok::<Event, Infallible>(frame_to_event(&EventFrame::Snapshot(snapshot)))
    });
    let updates = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(frame) => {
                    return Some((Ok::<Event, Infallible>(frame_to_event(&frame)), receiver))
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagging, frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(initial.chain(updates)).keep_alive(KeepAlive::default())
}

fn frame_to_event(frame: &EventFrame) -> Event {
    let data = match frame {
        EventFrame::Snapshot(snapshot) => serde_json::to_string(snapshot),
        EventFrame::Trade(trade) => serde_json::to_string(trade),
        EventFrame::OrderAdded(order) | EventFrame::OrderRemoved(order) => {
            serde_json::to_string(order)
        }
    }
    .unwrap_or_else(|_| "{}".to_string());
    Event::default().event(frame.name()).data(data)
}

/// Maps core errors onto HTTP responses.
///
/// Every error the book can surface through this adapter is a request
/// validation failure, so the status is always 400.
#[derive(Debug)]
struct ApiError(OrderBookError);

impl From<OrderBookError> for ApiError {
    fn from(err: OrderBookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "code": self.0.code,
            "error": self.0.message,
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
