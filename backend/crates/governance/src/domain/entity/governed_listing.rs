//! Listing as seen by governance

use auth::AuthUser;
use kernel::id::{ListingId, UserId};
use listing::ListingStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct GovernedListing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub status: ListingStatus,
    pub total_shares: i32,
}

impl GovernedListing {
    /// Owner or admin
    pub fn can_manage(&self, actor: &AuthUser) -> bool {
        actor.is_admin() || self.owner_id == actor.user_id
    }

    pub fn is_visible_to(&self, actor: &AuthUser) -> bool {
        self.status == ListingStatus::Live || self.can_manage(actor)
    }
}
