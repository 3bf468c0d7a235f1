//! Market Configuration

/// $1,000,000 per share
pub const DEFAULT_MAX_PRICE: i64 = 100_000_000;

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Upper bound for any order price, in cents
    pub max_price: i64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl MarketConfig {
    pub fn development() -> Self {
        Self::default()
    }

    pub fn with_max_price(mut self, max_price: i64) -> Self {
        self.max_price = max_price;
        self
    }
}
