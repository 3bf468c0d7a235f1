//! In-memory listing repository for tests and tooling

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use kernel::id::{DocumentId, ListingId, UserId};
use kernel::page::Page;

use crate::domain::entity::{document::Document, listing::Listing, share_token::ShareToken};
use crate::domain::repository::{
    DocumentRepository, ListingFilter, ListingRepository, ShareRepository,
};
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::{ListingError, ListingResult};

#[derive(Default)]
struct Tables {
    listings: Vec<Listing>,
    shares: Vec<ShareToken>,
    documents: Vec<Document>,
    verified_users: HashSet<UserId>,
}

#[derive(Default)]
pub struct InMemoryListingRepository {
    tables: Mutex<Tables>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as KYC VERIFIED
    pub fn verify_kyc(&self, user_id: UserId) {
        self.lock().verified_users.insert(user_id);
    }

    pub fn share_count(&self, listing_id: ListingId) -> usize {
        self.lock()
            .shares
            .iter()
            .filter(|s| s.listing_id == listing_id)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: &Listing) -> ListingResult<()> {
        self.lock().listings.push(listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ListingId) -> ListingResult<Option<Listing>> {
        Ok(self.lock().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn update(&self, listing: &Listing) -> ListingResult<()> {
        let mut tables = self.lock();
        let slot = tables
            .listings
            .iter_mut()
            .find(|l| l.id == listing.id)
            .ok_or(ListingError::ListingNotFound)?;
        *slot = listing.clone();
        Ok(())
    }

    async fn delete(&self, id: ListingId) -> ListingResult<()> {
        let mut tables = self.lock();
        let before = tables.listings.len();
        tables.listings.retain(|l| l.id != id);
        if tables.listings.len() == before {
            return Err(ListingError::ListingNotFound);
        }
        tables.shares.retain(|s| s.listing_id != id);
        tables.documents.retain(|d| d.listing_id != id);
        Ok(())
    }

    async fn list(&self, filter: ListingFilter, page: Page) -> ListingResult<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .lock()
            .listings
            .iter()
            .filter(|l| match filter {
                ListingFilter::Public => l.status == ListingStatus::Live,
                ListingFilter::VisibleTo(viewer) => {
                    l.status == ListingStatus::Live || l.owner_id == viewer
                }
                ListingFilter::All(status) => status.is_none_or(|s| l.status == s),
            })
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&listings))
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> ListingResult<bool> {
        Ok(self.lock().verified_users.contains(&user_id))
    }
}

impl ShareRepository for InMemoryListingRepository {
    async fn list_shares(&self, listing_id: ListingId) -> ListingResult<Vec<ShareToken>> {
        let mut shares: Vec<ShareToken> = self
            .lock()
            .shares
            .iter()
            .filter(|s| s.listing_id == listing_id)
            .cloned()
            .collect();
        shares.sort_by_key(|s| s.index_number);
        Ok(shares)
    }

    async fn minted_indexes(&self, listing_id: ListingId) -> ListingResult<Vec<i32>> {
        let mut indexes: Vec<i32> = self
            .lock()
            .shares
            .iter()
            .filter(|s| s.listing_id == listing_id)
            .map(|s| s.index_number)
            .collect();
        indexes.sort_unstable();
        Ok(indexes)
    }

    async fn insert_shares(&self, shares: &[ShareToken]) -> ListingResult<u64> {
        let mut tables = self.lock();
        let mut inserted = 0;
        for share in shares {
            let exists = tables.shares.iter().any(|s| {
                s.listing_id == share.listing_id && s.index_number == share.index_number
            });
            if !exists {
                tables.shares.push(share.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

impl DocumentRepository for InMemoryListingRepository {
    async fn create_document(&self, document: &Document) -> ListingResult<()> {
        self.lock().documents.push(document.clone());
        Ok(())
    }

    async fn find_document(&self, id: DocumentId) -> ListingResult<Option<Document>> {
        Ok(self.lock().documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_documents(&self, listing_id: ListingId) -> ListingResult<Vec<Document>> {
        Ok(self
            .lock()
            .documents
            .iter()
            .filter(|d| d.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn delete_document(&self, id: DocumentId) -> ListingResult<()> {
        let mut tables = self.lock();
        let before = tables.documents.len();
        tables.documents.retain(|d| d.id != id);
        if tables.documents.len() == before {
            return Err(ListingError::DocumentNotFound);
        }
        Ok(())
    }
}
