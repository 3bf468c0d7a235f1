//! Delete Listing Use Case

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::ListingId;

use crate::application::load_visible;
use crate::domain::repository::{ListingRepository, ShareRepository};
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::{ListingError, ListingResult};

pub struct DeleteListingUseCase<R>
where
    R: ListingRepository + ShareRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteListingUseCase<R>
where
    R: ListingRepository + ShareRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Owners may delete a PENDING listing with no minted shares; admins anything
    pub async fn execute(&self, actor: &AuthUser, id: ListingId) -> ListingResult<()> {
        let listing = load_visible(self.repo.as_ref(), id, actor).await?;
        listing.ensure_manageable(actor)?;

        if !actor.is_admin() {
            if listing.status != ListingStatus::Pending {
                return Err(ListingError::NotEditable(listing.status));
            }
            if !self.repo.minted_indexes(listing.id).await?.is_empty() {
                return Err(ListingError::HasMintedShares);
            }
        }

        self.repo.delete(listing.id).await?;

        tracing::info!(listing_id = %listing.id, actor_id = %actor.user_id, "Listing deleted");

        Ok(())
    }
}
