//! Listing Document Use Cases

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::{DocumentId, ListingId};

use crate::application::load_visible;
use crate::domain::entity::document::Document;
use crate::domain::repository::{DocumentRepository, ListingRepository};
use crate::domain::value_object::document_kind::DocumentKind;
use crate::error::{ListingError, ListingResult};

pub struct AddDocumentUseCase<R>
where
    R: ListingRepository + DocumentRepository,
{
    repo: Arc<R>,
}

impl<R> AddDocumentUseCase<R>
where
    R: ListingRepository + DocumentRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        listing_id: ListingId,
        kind: DocumentKind,
        storage_path: String,
    ) -> ListingResult<Document> {
        let listing = load_visible(self.repo.as_ref(), listing_id, actor).await?;
        listing.ensure_manageable(actor)?;

        let document = Document::new(listing.id, kind, storage_path, actor.user_id);
        self.repo.create_document(&document).await?;

        tracing::info!(
            listing_id = %listing.id,
            document_id = %document.id,
            kind = %kind,
            "Document attached"
        );

        Ok(document)
    }
}

pub struct ListDocumentsUseCase<R>
where
    R: ListingRepository + DocumentRepository,
{
    repo: Arc<R>,
}

impl<R> ListDocumentsUseCase<R>
where
    R: ListingRepository + DocumentRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        listing_id: ListingId,
    ) -> ListingResult<Vec<Document>> {
        let listing = load_visible(self.repo.as_ref(), listing_id, actor).await?;
        self.repo.list_documents(listing.id).await
    }
}

pub struct DeleteDocumentUseCase<R>
where
    R: DocumentRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteDocumentUseCase<R>
where
    R: DocumentRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Uploader or admin
    pub async fn execute(&self, actor: &AuthUser, id: DocumentId) -> ListingResult<()> {
        let document = self
            .repo
            .find_document(id)
            .await?
            .ok_or(ListingError::DocumentNotFound)?;

        if !actor.is_admin() && document.uploaded_by != actor.user_id {
            return Err(ListingError::NotOwner);
        }

        self.repo.delete_document(id).await?;

        tracing::info!(document_id = %id, actor_id = %actor.user_id, "Document deleted");

        Ok(())
    }
}
