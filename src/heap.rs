//! Binary heap over a priority relation, specialized for resting orders.
//!
//! The book instantiates two heaps: [`OrderHeap::bids`] (price descending,
//! timestamp ascending) and [`OrderHeap::asks`] (price ascending, timestamp
//! ascending). Because the priority relation reads only `price` and
//! `timestamp`, quantities can be mutated in place without re-sifting; any
//! change to the priority functions must revisit [`OrderHeap::update_quantity`].

use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::order::Order;

/// Priority relation: `Ordering::Less` means the first order has priority.
pub type PriorityFn = fn(&Order, &Order) -> Ordering;

fn bid_priority(a: &Order, b: &Order) -> Ordering {
    b.price.cmp(&a.price).then(a.timestamp.cmp(&b.timestamp))
}

fn ask_priority(a: &Order, b: &Order) -> Ordering {
    a.price.cmp(&b.price).then(a.timestamp.cmp(&b.timestamp))
}

/// A Vec-backed binary heap of resting orders.
#[derive(Debug)]
pub struct OrderHeap {
    items: Vec<Order>,
    priority: PriorityFn,
}

impl OrderHeap {
    /// Creates an empty heap over the given priority relation.
    pub fn new(priority: PriorityFn) -> Self {
        Self { items: Vec::new(), priority }
    }

    /// Heap for the bid side: highest price first, earliest timestamp wins ties.
    pub fn bids() -> Self {
        Self::new(bid_priority)
    }

    /// Heap for the ask side: lowest price first, earliest timestamp wins ties.
    pub fn asks() -> Self {
        Self::new(ask_priority)
    }

    /// Inserts an order and restores heap order. O(log n).
    pub fn insert(&mut self, order: Order) {
        self.items.push(order);
        self.sift_up(self.items.len() - 1);
    }

    /// The highest-priority order, if any. O(1), does not mutate.
    pub fn peek(&self) -> Option<&Order> {
        self.items.first()
    }

    /// Removes and returns the highest-priority order. O(log n).
    pub fn extract_top(&mut self) -> Option<Order> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// Removes the order with the given id, if present. O(n).
    ///
    /// The vacated slot is filled with the tail element, then sifted in both
    /// directions since the replacement may violate heap order either way.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Order> {
        let idx = self.items.iter().position(|o| o.id == id)?;
        let last = self.items.len() - 1;
        self.items.swap(idx, last);
        let removed = self.items.pop();
        if idx < self.items.len() {
            self.sift_up(idx);
            self.sift_down(idx);
        }
        removed
    }

    /// Mutates the quantity of the order with the given id in place. O(n).
    ///
    /// No re-sift: the priority relation is independent of quantity.
    /// Returns `false` when no order with that id is resting here.
    pub fn update_quantity(&mut self, id: &str, quantity: Decimal) -> bool {
        match self.items.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copies out the backing array for snapshots. Heap order, not sorted.
    pub fn to_vec(&self) -> Vec<Order> {
        self.items.clone()
    }

    fn higher(&self, a: usize, b: usize) -> bool {
        (self.priority)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.higher(idx, parent) {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut best = idx;
            if left < self.items.len() && self.higher(left, best) {
                best = left;
            }
            if right < self.items.len() && self.higher(right, best) {
                best = right;
            }
            if best == idx {
                break;
            }
            self.items.swap(idx, best);
            idx = best;
        }
    }
}
