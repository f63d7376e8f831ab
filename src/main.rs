use clap::Parser;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};

use p2p_order_book::server::{self, event_hooks, AppState};
use p2p_order_book::transport::NullTransport;
use p2p_order_book::{OrderBookBuilder, Replica};

#[derive(Parser)]
#[command(name = "p2p-order-book")]
#[command(about = "Peer-to-peer limit order book node")]
struct Args {
    /// Trading pair handled by this node
    #[arg(long, default_value = "BTC-USD")]
    pair: String,
    /// Address for the REST/SSE surface
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,
    /// Peer identity; generated when omitted
    #[arg(long)]
    peer_id: Option<String>,
    #[arg(long, default_value_t = 2)]
    price_precision: u32,
    #[arg(long, default_value_t = 8)]
    quantity_precision: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let peer_id = args.peer_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let (events, _) = broadcast::channel(1024);

    let book = OrderBookBuilder::new(&args.pair)
        .with_price_precision(args.price_precision)
        .with_quantity_precision(args.quantity_precision)
        .with_hooks(event_hooks(events.clone()))
        .build();

    info!(%peer_id, pair = %args.pair, "starting order book node");

    let replica = Replica::new(peer_id, book, NullTransport);
    let state = AppState { replica: Arc::new(RwLock::new(replica)), events };

    if let Err(err) = server::serve(&args.listen, state).await {
        error!(%err, "server terminated");
    }
}
