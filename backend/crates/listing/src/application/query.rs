//! Read-side Use Cases

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::ListingId;
use kernel::page::{Page, Paginated};

use crate::application::load_visible;
use crate::domain::entity::{listing::Listing, share_token::ShareToken};
use crate::domain::repository::{ListingFilter, ListingRepository, ShareRepository};
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::ListingResult;

pub struct GetListingUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
}

impl<R> GetListingUseCase<R>
where
    R: ListingRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &AuthUser, id: ListingId) -> ListingResult<Listing> {
        load_visible(self.repo.as_ref(), id, actor).await
    }
}

pub struct ListListingsUseCase<R>
where
    R: ListingRepository,
{
    repo: Arc<R>,
}

impl<R> ListListingsUseCase<R>
where
    R: ListingRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// GET /listings/public
    pub async fn public(&self, page: Page) -> ListingResult<Paginated<Listing>> {
        self.run(ListingFilter::Public, page).await
    }

    /// Admins see everything (optionally one status); others LIVE plus their own
    pub async fn for_actor(
        &self,
        actor: &AuthUser,
        status: Option<ListingStatus>,
        page: Page,
    ) -> ListingResult<Paginated<Listing>> {
        let filter = if actor.is_admin() {
            ListingFilter::All(status)
        } else {
            ListingFilter::VisibleTo(actor.user_id)
        };
        self.run(filter, page).await
    }

    async fn run(&self, filter: ListingFilter, page: Page) -> ListingResult<Paginated<Listing>> {
        let page = page.clamped();
        let items = self.repo.list(filter, page).await?;
        Ok(Paginated::new(items, page))
    }
}

pub struct ListSharesUseCase<R>
where
    R: ListingRepository + ShareRepository,
{
    repo: Arc<R>,
}

impl<R> ListSharesUseCase<R>
where
    R: ListingRepository + ShareRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &AuthUser, id: ListingId) -> ListingResult<Vec<ShareToken>> {
        let listing = load_visible(self.repo.as_ref(), id, actor).await?;
        self.repo.list_shares(listing.id).await
    }
}
