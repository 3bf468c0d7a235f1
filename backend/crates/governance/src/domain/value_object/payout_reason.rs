//! Payout reason

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutReason {
    /// Income distributed to holders
    Dividend,
    /// Parcel sold outright; the listing closes
    Buyout,
}

impl PayoutReason {
    pub const fn code(&self) -> &'static str {
        match self {
            PayoutReason::Dividend => "DIVIDEND",
            PayoutReason::Buyout => "BUYOUT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "DIVIDEND" => Some(PayoutReason::Dividend),
            "BUYOUT" => Some(PayoutReason::Buyout),
            _ => None,
        }
    }

    pub const fn closes_listing(&self) -> bool {
        matches!(self, PayoutReason::Buyout)
    }
}

impl fmt::Display for PayoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
