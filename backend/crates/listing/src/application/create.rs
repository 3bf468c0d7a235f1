//! Create Listing Use Case

use std::sync::Arc;

use auth::{AuthUser, UserRole};
use chain::derive_listing_address;

use crate::application::config::ListingConfig;
use crate::domain::entity::listing::{Listing, NewListing};
use crate::domain::repository::ListingRepository;
use crate::error::{ListingError, ListingResult};

pub struct CreateListingUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
    config: Arc<ListingConfig>,
}

impl<R> CreateListingUseCase<R>
where
    R: ListingRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<ListingConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, actor: &AuthUser, fields: NewListing) -> ListingResult<Listing> {
        actor
            .ensure_role(&[UserRole::Lister, UserRole::Admin])
            .map_err(|_| ListingError::ListerRequired)?;

        if !self.repo.is_kyc_verified(actor.user_id).await? {
            return Err(ListingError::KycRequired);
        }

        let mut listing = Listing::new(actor.user_id, fields);
        let (pda, _bump) = derive_listing_address(listing.id.as_uuid(), &self.config.program_id)?;
        listing.chain_address = Some(pda.to_string());

        self.repo.create(&listing).await?;

        tracing::info!(
            listing_id = %listing.id,
            owner_id = %listing.owner_id,
            total_shares = listing.total_shares,
            chain_address = %pda,
            "Listing created"
        );

        Ok(listing)
    }
}
