//! Listing lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// PENDING -> LIVE <-> PAUSED, anything but CLOSED -> CLOSED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    /// Awaiting admin approval
    #[default]
    Pending,
    Live,
    Paused,
    Closed,
}

impl ListingStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "PENDING",
            ListingStatus::Live => "LIVE",
            ListingStatus::Paused => "PAUSED",
            ListingStatus::Closed => "CLOSED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(ListingStatus::Pending),
            "LIVE" => Some(ListingStatus::Live),
            "PAUSED" => Some(ListingStatus::Paused),
            "CLOSED" => Some(ListingStatus::Closed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, to: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (self, to),
            (Pending, Live) | (Live, Paused) | (Paused, Live) | (Pending | Live | Paused, Closed)
        )
    }

    /// Title, description and price can change
    pub const fn is_editable(&self) -> bool {
        matches!(self, ListingStatus::Pending | ListingStatus::Paused)
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ListingStatus::*;
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(Pending.can_transition_to(Live));
        assert!(Live.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Live));
        assert!(Pending.can_transition_to(Closed));
        assert!(Paused.can_transition_to(Closed));

        assert!(!Closed.can_transition_to(Live));
        assert!(!Closed.can_transition_to(Closed));
        assert!(!Live.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Paused));
        assert!(!Live.can_transition_to(Live));
    }

    #[test]
    fn test_codes() {
        for status in [Pending, Live, Paused, Closed] {
            assert_eq!(ListingStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ListingStatus::from_code("live"), Some(Live));
        assert_eq!(ListingStatus::from_code("SOLD"), None);
    }
}
