//! Share as seen by the marketplace

use kernel::id::{ListingId, UserId};
use listing::ListingStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct TradableShare {
    pub mint_address: String,
    pub listing_id: ListingId,
    pub owner_id: Option<UserId>,
    pub listing_status: ListingStatus,
}

impl TradableShare {
    pub fn is_held_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    pub fn is_tradable(&self) -> bool {
        self.listing_status == ListingStatus::Live
    }
}
