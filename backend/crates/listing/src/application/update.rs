//! Update Listing Use Case

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::ListingId;

use crate::application::load_visible;
use crate::domain::entity::listing::Listing;
use crate::domain::repository::{ListingRepository, ShareRepository};
use crate::domain::value_object::{geo_json::GeoJson, listing_status::ListingStatus};
use crate::error::{ListingError, ListingResult};

/// `None` leaves the field untouched
#[derive(Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub geo_json: Option<GeoJson>,
    pub parcel_size: Option<f64>,
    pub total_shares: Option<i32>,
    pub price_per_share: Option<i64>,
}

pub struct UpdateListingUseCase<R>
where
    R: ListingRepository + ShareRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateListingUseCase<R>
where
    R: ListingRepository + ShareRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        id: ListingId,
        patch: ListingPatch,
    ) -> ListingResult<Listing> {
        let mut listing = load_visible(self.repo.as_ref(), id, actor).await?;
        listing.ensure_manageable(actor)?;
        listing.ensure_editable()?;

        if let Some(total) = patch.total_shares
            && total != listing.total_shares
        {
            let minted = self.repo.minted_indexes(listing.id).await?;
            if listing.status != ListingStatus::Pending || !minted.is_empty() {
                return Err(ListingError::SharesLocked);
            }
            listing.total_shares = total;
        }

        if let Some(title) = patch.title {
            listing.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            let description = description.trim();
            listing.description = (!description.is_empty()).then(|| description.to_string());
        }
        if let Some(geo_json) = patch.geo_json {
            listing.geo_json = geo_json;
        }
        if let Some(parcel_size) = patch.parcel_size {
            listing.parcel_size = parcel_size;
        }
        if let Some(price) = patch.price_per_share {
            listing.price_per_share = price;
        }

        listing.touch();
        self.repo.update(&listing).await?;

        tracing::info!(listing_id = %listing.id, actor_id = %actor.user_id, "Listing updated");

        Ok(listing)
    }
}
