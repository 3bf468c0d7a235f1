//! Order side

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Ask placed by the share holder
    List,
    /// Bid, or a buyer taking a LIST
    Buy,
    /// Holder taking a BUY bid
    Sell,
}

impl OrderType {
    pub const fn code(&self) -> &'static str {
        match self {
            OrderType::List => "LIST",
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "LIST" => Some(OrderType::List),
            "BUY" => Some(OrderType::Buy),
            "SELL" => Some(OrderType::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
