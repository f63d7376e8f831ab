//! Common enumerations used throughout the order book engine.
//!
//! This module defines order sides, types and statuses used to describe
//! and control order behavior across the book, the replica adapter and
//! the wire formats.

use serde::{Deserialize, Serialize};

/// Represents the side of an order: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side (bids)
    Buy,
    /// Sell side (asks)
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Represents the type of order being placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// A limit order that rests on the book until matched or canceled.
    #[default]
    Limit,
    /// A market order that matches immediately and never rests.
    Market,
}

/// Represents the current status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order has been accepted but not yet matched.
    #[default]
    Open,
    /// The order was partially matched, some quantity remains.
    PartiallyFilled,
    /// The order was completely matched.
    Filled,
    /// The order was canceled before being fully filled.
    Canceled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::to_string;

    #[test]
    fn test_enum_serialization() {
        assert_eq!(to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(to_string(&Side::Sell).unwrap(), "\"sell\"");

        assert_eq!(to_string(&OrderType::Market).unwrap(), "\"market\"");
        assert_eq!(to_string(&OrderType::Limit).unwrap(), "\"limit\"");

        assert_eq!(to_string(&OrderStatus::Open).unwrap(), "\"open\"");
        assert_eq!(to_string(&OrderStatus::PartiallyFilled).unwrap(), "\"partially_filled\"");
        assert_eq!(to_string(&OrderStatus::Filled).unwrap(), "\"filled\"");
        assert_eq!(to_string(&OrderStatus::Canceled).unwrap(), "\"canceled\"");
    }

    #[test]
    fn test_defaults_and_opposite() {
        assert_eq!(OrderType::default(), OrderType::Limit);
        assert_eq!(OrderStatus::default(), OrderStatus::Open);
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
