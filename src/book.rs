//! Core module for the order book engine.
//!
//! This module defines the [`OrderBook`] struct, which provides the main
//! interface for submitting, canceling, and querying orders, and for
//! exporting/loading the snapshots used to onboard peers.
//!
//! Use [`OrderBookBuilder`](crate::OrderBookBuilder) to create a new instance.
//!
//! # Example
//! ```rust
//! use p2p_order_book::{Order, OrderBookBuilder, Side};
//! use rust_decimal::Decimal;
//!
//! let mut ob = OrderBookBuilder::new("BTC-USD").build();
//! let result = ob.add_order(Order::limit("o1", Side::Buy, Decimal::from(100), Decimal::from(1)));
//! ```

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{make_error, ErrorType, Result};
use crate::events::BookHooks;
use crate::heap::OrderHeap;
use crate::math::round_dp;
use crate::order::{now_millis, Order, Trade};
use crate::report::SubmitResult;
use crate::snapshot::Snapshot;
use crate::{BookOptions, OrderStatus, OrderType, Side};

/// A single-pair limit order book with price-time priority matching.
///
/// The book owns its resting orders exclusively: the heaps and the hook
/// table are private, queries return copies, and snapshots are deep copies
/// that never alias live heap entries. All operations are synchronous and
/// run to completion on the calling context.
pub struct OrderBook {
    pair: String,
    price_precision: u32,
    quantity_precision: u32,
    bids: OrderHeap,
    asks: OrderHeap,
    trades: Vec<Trade>,
    hooks: BookHooks,
    trade_seq: u64,
}

impl OrderBook {
    /// Creates a new `OrderBook` for the given pair.
    ///
    /// Prefer [`OrderBookBuilder`](crate::OrderBookBuilder) for clarity.
    pub fn new(pair: &str, options: BookOptions) -> Self {
        Self {
            pair: pair.to_string(),
            price_precision: options.price_precision,
            quantity_precision: options.quantity_precision,
            bids: OrderHeap::bids(),
            asks: OrderHeap::asks(),
            trades: Vec::new(),
            hooks: BookHooks::new(),
            trade_seq: 0,
        }
    }

    /// The pair symbol of this book.
    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn price_precision(&self) -> u32 {
        self.price_precision
    }

    pub fn quantity_precision(&self) -> u32 {
        self.quantity_precision
    }

    /// Replaces the observer hooks.
    pub fn set_hooks(&mut self, hooks: BookHooks) {
        self.hooks = hooks;
    }

    /// Submits an order to the book.
    ///
    /// The order is validated and normalized (prices and quantities rounded
    /// to the configured precisions, timestamp defaulted to the node clock),
    /// matched against the opposing side, and any unfilled limit remainder
    /// is inserted on its own side. Unfilled market remainders are discarded;
    /// a market order that finds no liquidity at all reports `Canceled`.
    ///
    /// # Returns
    /// A [`SubmitResult`] with the fills, the resting remainder (if any) and
    /// the aggressor's final status.
    ///
    /// # Errors
    /// Returns `Err` on validation failure (empty id, non-positive quantity,
    /// missing or non-positive price on a limit). The book is not mutated.
    pub fn add_order(&mut self, mut order: Order) -> Result<SubmitResult> {
        self.validate(&order)?;
        self.normalize(&mut order)?;

        let order_id = order.id.clone();
        let trades = self.match_incoming(&mut order);
        for trade in &trades {
            if let Some(hook) = &self.hooks.on_trade {
                hook(trade);
            }
        }

        let mut remainder = None;
        let status = if order.quantity <= Decimal::ZERO {
            OrderStatus::Filled
        } else if order.order_type == OrderType::Limit {
            order.status =
                if trades.is_empty() { OrderStatus::Open } else { OrderStatus::PartiallyFilled };
            let status = order.status;
            let resting = order.clone();
            let side = order.side;
            self.side_mut(side).insert(order);
            if let Some(hook) = &self.hooks.on_order_added {
                hook(&resting);
            }
            remainder = Some(resting);
            status
        } else if trades.is_empty() {
            // a market order that found no liquidity is discarded, never resting
            OrderStatus::Canceled
        } else {
            // market remainder never rests
            OrderStatus::PartiallyFilled
        };

        Ok(SubmitResult { order_id, status, trades, remainder })
    }

    /// Applies an order received from a remote peer.
    ///
    /// Identical in effect to [`add_order`](Self::add_order); the separate
    /// entry point marks provenance so callers never rebroadcast through it.
    pub fn apply_remote_order(&mut self, order: Order) -> Result<SubmitResult> {
        self.add_order(order)
    }

    /// Cancels a resting order by id.
    ///
    /// Searches bids first, then asks. Cancellation of an unknown id is not
    /// an error and returns `None`.
    pub fn cancel_order(&mut self, id: &str) -> Option<Order> {
        let mut order = match self.bids.remove_by_id(id) {
            Some(order) => order,
            None => self.asks.remove_by_id(id)?,
        };
        order.status = OrderStatus::Canceled;
        if let Some(hook) = &self.hooks.on_order_removed {
            hook(&order);
        }
        Some(order)
    }

    /// The best (highest-priced) bid, if any. Returns a copy.
    pub fn best_bid(&self) -> Option<Order> {
        self.bids.peek().cloned()
    }

    /// The best (lowest-priced) ask, if any. Returns a copy.
    pub fn best_ask(&self) -> Option<Order> {
        self.asks.peek().cloned()
    }

    /// Best ask minus best bid, rounded to the price precision.
    ///
    /// Defined only when both sides are non-empty.
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.peek().and_then(|o| o.price)?;
        let ask = self.asks.peek().and_then(|o| o.price)?;
        Some(round_dp(ask - bid, self.price_precision))
    }

    /// Copies of all resting bids, in heap order.
    pub fn get_bids(&self) -> Vec<Order> {
        self.bids.to_vec()
    }

    /// Copies of all resting asks, in heap order.
    pub fn get_asks(&self) -> Vec<Order> {
        self.asks.to_vec()
    }

    /// A copy of the append-only trade log, oldest first.
    pub fn get_trades(&self) -> Vec<Trade> {
        self.trades.clone()
    }

    /// The most recent `n` trades, oldest first.
    pub fn recent_trades(&self, n: usize) -> Vec<Trade> {
        let start = self.trades.len().saturating_sub(n);
        self.trades[start..].to_vec()
    }

    /// Exports a deep copy of the resting state.
    pub fn get_snapshot(&self) -> Snapshot {
        Snapshot {
            pair: self.pair.clone(),
            timestamp: now_millis(),
            bids: self.bids.to_vec(),
            asks: self.asks.to_vec(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            spread: self.spread(),
        }
    }

    /// Replaces the resting state with the contents of `snapshot`.
    ///
    /// The snapshot arrays are treated as unordered multisets; heap order is
    /// re-established by inserting each order individually. The trade history
    /// is not replayed.
    ///
    /// # Errors
    /// Returns a pair-mismatch error when the snapshot was taken from a book
    /// with a different pair. The book is not mutated in that case.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        if snapshot.pair != self.pair {
            return Err(make_error(ErrorType::PairMismatch));
        }
        self.bids = OrderHeap::bids();
        self.asks = OrderHeap::asks();
        for order in snapshot.bids {
            self.bids.insert(order);
        }
        for order in snapshot.asks {
            self.asks.insert(order);
        }
        Ok(())
    }

    fn validate(&self, order: &Order) -> Result<()> {
        if order.id.trim().is_empty() {
            return Err(make_error(ErrorType::EmptyOrderId));
        }
        if order.quantity <= Decimal::ZERO {
            return Err(make_error(ErrorType::InvalidQuantity));
        }
        if order.order_type == OrderType::Limit {
            match order.price {
                Some(price) if price > Decimal::ZERO => {}
                _ => return Err(make_error(ErrorType::InvalidPrice)),
            }
        }
        Ok(())
    }

    fn normalize(&self, order: &mut Order) -> Result<()> {
        order.quantity = round_dp(order.quantity, self.quantity_precision);
        // a positive quantity below the precision would rest at zero
        if order.quantity <= Decimal::ZERO {
            return Err(make_error(ErrorType::InvalidQuantity));
        }
        match order.order_type {
            OrderType::Market => order.price = None,
            OrderType::Limit => {
                let price = order.price.ok_or_else(|| make_error(ErrorType::InvalidPrice))?;
                let price = round_dp(price, self.price_precision);
                if price <= Decimal::ZERO {
                    return Err(make_error(ErrorType::InvalidPrice));
                }
                order.price = Some(price);
            }
        }
        if order.timestamp.is_none() {
            order.timestamp = Some(now_millis());
        }
        order.status = OrderStatus::Open;
        Ok(())
    }

    /// Runs the matching loop for an incoming order against the opposing heap.
    ///
    /// Trades execute at the resting order's price. Each trade is appended to
    /// the log as it is generated, so every hook that fires afterwards can
    /// observe it through `get_trades`.
    fn match_incoming(&mut self, taker: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();

        while taker.quantity > Decimal::ZERO {
            let Some(maker) = self.opposing(taker.side).peek().cloned() else { break };
            let Some(maker_price) = maker.price else { break };
            if !Self::crosses(taker, maker_price) {
                break;
            }

            let traded = round_dp(taker.quantity.min(maker.quantity), self.quantity_precision);
            let trade = self.new_trade(taker, &maker, maker_price, traded);
            self.trades.push(trade.clone());

            taker.quantity = round_dp(taker.quantity - traded, self.quantity_precision);
            let maker_left = round_dp(maker.quantity - traded, self.quantity_precision);

            if maker_left <= Decimal::ZERO {
                if let Some(mut filled) = self.opposing_mut(taker.side).extract_top() {
                    filled.quantity = Decimal::ZERO;
                    filled.status = OrderStatus::Filled;
                    if let Some(hook) = &self.hooks.on_order_removed {
                        hook(&filled);
                    }
                }
            } else {
                self.opposing_mut(taker.side).update_quantity(&maker.id, maker_left);
            }

            trades.push(trade);
        }

        trades
    }

    fn crosses(taker: &Order, maker_price: Decimal) -> bool {
        match taker.order_type {
            OrderType::Market => true,
            OrderType::Limit => match (taker.side, taker.price) {
                (Side::Buy, Some(price)) => price >= maker_price,
                (Side::Sell, Some(price)) => price <= maker_price,
                (_, None) => false,
            },
        }
    }

    fn new_trade(&mut self, taker: &Order, maker: &Order, price: Decimal, quantity: Decimal) -> Trade {
        self.trade_seq += 1;
        let (buy_order_id, sell_order_id, buy_peer_id, sell_peer_id) = match taker.side {
            Side::Buy => {
                (taker.id.clone(), maker.id.clone(), taker.peer_id.clone(), maker.peer_id.clone())
            }
            Side::Sell => {
                (maker.id.clone(), taker.id.clone(), maker.peer_id.clone(), taker.peer_id.clone())
            }
        };
        Trade {
            id: format!("{}_{}_{}", taker.id, maker.id, self.trade_seq),
            pair: self.pair.clone(),
            price,
            quantity,
            buy_order_id,
            sell_order_id,
            buy_peer_id,
            sell_peer_id,
            timestamp: now_millis(),
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut OrderHeap {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn opposing(&self, side: Side) -> &OrderHeap {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    fn opposing_mut(&mut self, side: Side) -> &mut OrderHeap {
        match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        }
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (price, volume) in price_levels(&self.asks.to_vec()).iter().rev() {
            writeln!(f, "{} -> {}", price, volume)?;
        }
        writeln!(f, "------------------------------------")?;
        for (price, volume) in price_levels(&self.bids.to_vec()).iter().rev() {
            writeln!(f, "{} -> {}", price, volume)?;
        }
        Ok(())
    }
}

fn price_levels(orders: &[Order]) -> BTreeMap<Decimal, Decimal> {
    let mut levels = BTreeMap::new();
    for order in orders {
        if let Some(price) = order.price {
            *levels.entry(price).or_insert(Decimal::ZERO) += order.quantity;
        }
    }
    levels
}
