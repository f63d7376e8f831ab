/// Configuration options for initializing a new order book.
///
/// # Fields
/// - `price_precision`: decimal places applied to every price write. Defaults to 2.
/// - `quantity_precision`: decimal places applied to every quantity write. Defaults to 8.
#[derive(Debug, Clone, Copy)]
pub struct BookOptions {
    pub price_precision: u32,
    pub quantity_precision: u32,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self { price_precision: 2, quantity_precision: 8 }
    }
}
