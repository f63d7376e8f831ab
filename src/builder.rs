//! Builder for configuring and constructing an [`OrderBook`].
//!
//! # Example
//! ```rust
//! use p2p_order_book::OrderBookBuilder;
//!
//! let ob = OrderBookBuilder::new("BTC-USD")
//!     .with_price_precision(2)
//!     .with_quantity_precision(8)
//!     .build();
//! ```

use crate::events::BookHooks;
use crate::{BookOptions, OrderBook};

/// A builder for constructing an [`OrderBook`] with custom options.
pub struct OrderBookBuilder {
    pair: String,
    options: BookOptions,
    hooks: BookHooks,
}

impl OrderBookBuilder {
    /// Creates a new builder instance for the given trading pair.
    ///
    /// # Parameters
    /// - `pair`: The pair symbol (e.g., `"BTC-USD"`)
    pub fn new(pair: impl Into<String>) -> Self {
        Self { pair: pair.into(), options: BookOptions::default(), hooks: BookHooks::new() }
    }

    /// Sets all options in bulk via a [`BookOptions`] struct.
    pub fn with_options(mut self, options: BookOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the number of decimal places for price rounding.
    pub fn with_price_precision(mut self, dp: u32) -> Self {
        self.options.price_precision = dp;
        self
    }

    /// Sets the number of decimal places for quantity rounding.
    pub fn with_quantity_precision(mut self, dp: u32) -> Self {
        self.options.quantity_precision = dp;
        self
    }

    /// Registers observer hooks.
    pub fn with_hooks(mut self, hooks: BookHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Builds and returns a fully configured [`OrderBook`] instance.
    pub fn build(self) -> OrderBook {
        let mut book = OrderBook::new(self.pair.as_str(), self.options);
        book.set_hooks(self.hooks);
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_defaults() {
        let ob = OrderBookBuilder::new("BTC-USD").build();
        assert_eq!(ob.pair(), "BTC-USD");
        assert_eq!(ob.price_precision(), 2);
        assert_eq!(ob.quantity_precision(), 8);
    }

    #[test]
    fn test_builder_with_precisions() {
        let ob = OrderBookBuilder::new("ETH-USD")
            .with_price_precision(4)
            .with_quantity_precision(6)
            .build();

        assert_eq!(ob.pair(), "ETH-USD");
        assert_eq!(ob.price_precision(), 4);
        assert_eq!(ob.quantity_precision(), 6);
    }

    #[test]
    fn test_builder_with_options_struct() {
        let opts = BookOptions { price_precision: 0, quantity_precision: 0 };
        let ob = OrderBookBuilder::new("DOGE-USD").with_options(opts).build();

        assert_eq!(ob.pair(), "DOGE-USD");
        assert_eq!(ob.price_precision(), 0);
        assert_eq!(ob.quantity_precision(), 0);
    }
}
