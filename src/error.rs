//! Error module for the order book: typed error with (code, message).
//!
//! - Use `ErrorType` when you know the semantic category
//! - Use `OrderBookError` as the concrete error type
//! - Format: Display -> "[{code}] {message}"

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorType {
    // 10xx General issues
    Default,

    // 11xx Request issues
    EmptyOrderId,
    InvalidQuantity,
    InvalidPrice,

    // 12xx State issues
    PairMismatch,
}

impl ErrorType {
    /// Numeric code for the error type.
    pub fn code(self) -> u32 {
        match self {
            ErrorType::Default => 1000,

            ErrorType::EmptyOrderId => 1101,
            ErrorType::InvalidQuantity => 1102,
            ErrorType::InvalidPrice => 1103,

            ErrorType::PairMismatch => 1201,
        }
    }

    /// Default human message for the error type.
    pub const fn message(self) -> &'static str {
        match self {
            ErrorType::Default => "Something wrong",

            ErrorType::EmptyOrderId => "Order id must not be empty",
            ErrorType::InvalidQuantity => "Invalid order quantity",
            ErrorType::InvalidPrice => "Invalid order price",

            ErrorType::PairMismatch => "Snapshot pair does not match book pair",
        }
    }
}

/// Concrete error type carrying both code and message.
///
/// `Display` renders as `"[{code}] {message}"`.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("[{code}] {message}")]
#[non_exhaustive]
pub struct OrderBookError {
    pub code: u32,
    pub message: String,
}

impl OrderBookError {
    /// Create from explicit code and message.
    #[inline]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Return a new error with the same code but a different message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<ErrorType> for OrderBookError {
    #[inline]
    fn from(t: ErrorType) -> Self {
        Self::new(t.code(), t.message())
    }
}

/// Shorthand used at every error site in the engine.
#[inline]
pub fn make_error(kind: ErrorType) -> OrderBookError {
    kind.into()
}

/// Result alias for the library.
pub type Result<T> = std::result::Result<T, OrderBookError>;
