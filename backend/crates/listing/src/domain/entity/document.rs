//! Listing document (deed scans, surveys, ...)

use chrono::{DateTime, Utc};
use kernel::id::{DocumentId, ListingId, UserId};

use crate::domain::value_object::document_kind::DocumentKind;

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub listing_id: ListingId,
    pub kind: DocumentKind,
    /// Object storage key; the file itself never passes through the API
    pub storage_path: String,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        listing_id: ListingId,
        kind: DocumentKind,
        storage_path: String,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            listing_id,
            kind,
            storage_path,
            uploaded_by,
            created_at: Utc::now(),
        }
    }
}
