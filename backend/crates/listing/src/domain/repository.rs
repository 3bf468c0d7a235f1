//! Repository Traits

use kernel::id::{DocumentId, ListingId, UserId};
use kernel::page::Page;

use crate::domain::entity::{document::Document, listing::Listing, share_token::ShareToken};
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::ListingResult;

/// Which listings a query may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    /// LIVE only
    Public,
    /// LIVE plus the viewer's own listings
    VisibleTo(UserId),
    /// Admin view, optionally narrowed to one status
    All(Option<ListingStatus>),
}

#[trait_variant::make(ListingRepository: Send)]
pub trait LocalListingRepository {
    async fn create(&self, listing: &Listing) -> ListingResult<()>;

    async fn find_by_id(&self, id: ListingId) -> ListingResult<Option<Listing>>;

    async fn update(&self, listing: &Listing) -> ListingResult<()>;

    /// Shares and documents go with it
    async fn delete(&self, id: ListingId) -> ListingResult<()>;

    /// Newest first
    async fn list(&self, filter: ListingFilter, page: Page) -> ListingResult<Vec<Listing>>;

    async fn is_kyc_verified(&self, user_id: UserId) -> ListingResult<bool>;
}

#[trait_variant::make(ShareRepository: Send)]
pub trait LocalShareRepository {
    /// Ordered by index
    async fn list_shares(&self, listing_id: ListingId) -> ListingResult<Vec<ShareToken>>;

    async fn minted_indexes(&self, listing_id: ListingId) -> ListingResult<Vec<i32>>;

    /// Insert in one transaction; rows whose (listing, index) already exist
    /// are skipped. Returns the number inserted.
    async fn insert_shares(&self, shares: &[ShareToken]) -> ListingResult<u64>;
}

#[trait_variant::make(DocumentRepository: Send)]
pub trait LocalDocumentRepository {
    async fn create_document(&self, document: &Document) -> ListingResult<()>;

    async fn find_document(&self, id: DocumentId) -> ListingResult<Option<Document>>;

    async fn list_documents(&self, listing_id: ListingId) -> ListingResult<Vec<Document>>;

    async fn delete_document(&self, id: DocumentId) -> ListingResult<()>;
}

/// Everything the listing routes need from one store
pub trait ListingStore:
    ListingRepository + ShareRepository + DocumentRepository + Send + Sync + 'static
{
}

impl<T> ListingStore for T where
    T: ListingRepository + ShareRepository + DocumentRepository + Send + Sync + 'static
{
}
