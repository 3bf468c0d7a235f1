//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::{AppError, AppResult, FieldViolation};
use kernel::id::{DocumentId, ListingId, ShareTokenId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::application::ListingPatch;
use crate::domain::entity::listing::NewListing;
use crate::domain::{Document, DocumentKind, GeoJson, Listing, ListingStatus, ShareToken};

fn check_parcel_size(value: f64) -> AppResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::validation(vec![FieldViolation::new(
            "parcelSize",
            "parcelSize must be greater than 0",
        )]))
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[validate(length(min = 3, max = 120, message = "title must be 3 to 120 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    pub geo_json: Value,
    /// Acres
    pub parcel_size: f64,
    #[validate(range(min = 1, max = 10000, message = "totalShares must be between 1 and 10000"))]
    pub total_shares: i32,
    /// Cents
    #[validate(range(min = 1, message = "pricePerShare must be a positive amount of cents"))]
    pub price_per_share: i64,
}

impl CreateListingRequest {
    pub fn into_new_listing(self) -> AppResult<NewListing> {
        Ok(NewListing {
            title: trimmed(self.title),
            description: self.description.map(trimmed).filter(|d| !d.is_empty()),
            geo_json: GeoJson::new(self.geo_json)?,
            parcel_size: check_parcel_size(self.parcel_size)?,
            total_shares: self.total_shares,
            price_per_share: self.price_per_share,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    #[validate(length(min = 3, max = 120, message = "title must be 3 to 120 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    pub geo_json: Option<Value>,
    pub parcel_size: Option<f64>,
    #[validate(range(min = 1, max = 10000, message = "totalShares must be between 1 and 10000"))]
    pub total_shares: Option<i32>,
    #[validate(range(min = 1, message = "pricePerShare must be a positive amount of cents"))]
    pub price_per_share: Option<i64>,
}

impl UpdateListingRequest {
    pub fn into_patch(self) -> AppResult<ListingPatch> {
        Ok(ListingPatch {
            title: self.title,
            description: self.description,
            geo_json: self.geo_json.map(GeoJson::new).transpose()?,
            parcel_size: self.parcel_size.map(check_parcel_size).transpose()?,
            total_shares: self.total_shares,
            price_per_share: self.price_per_share,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// `?status=` on GET /listings (admins only)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: ListingId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub geo_json: Value,
    pub parcel_size: f64,
    pub total_shares: i32,
    pub price_per_share: i64,
    pub status: ListingStatus,
    pub chain_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            owner_id: listing.owner_id,
            title: listing.title,
            description: listing.description,
            geo_json: listing.geo_json.into_value(),
            parcel_size: listing.parcel_size,
            total_shares: listing.total_shares,
            price_per_share: listing.price_per_share,
            status: listing.status,
            chain_address: listing.chain_address,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

// ============================================================================
// Shares
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTokenResponse {
    pub id: ShareTokenId,
    pub listing_id: ListingId,
    pub index_number: i32,
    pub mint_address: String,
    pub metadata_uri: String,
    pub owner_id: Option<UserId>,
    pub mint_signature: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ShareToken> for ShareTokenResponse {
    fn from(share: ShareToken) -> Self {
        Self {
            id: share.id,
            listing_id: share.listing_id,
            index_number: share.index_number,
            mint_address: share.mint_address,
            metadata_uri: share.metadata_uri,
            owner_id: share.owner_id,
            mint_signature: share.mint_signature,
            created_at: share.created_at,
        }
    }
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentRequest {
    #[validate(length(min = 1, message = "kind is required"))]
    pub kind: String,
    #[validate(length(min = 1, max = 512, message = "storagePath must be 1 to 512 characters"))]
    pub storage_path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: DocumentId,
    pub listing_id: ListingId,
    pub kind: DocumentKind,
    pub storage_path: String,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            listing_id: document.listing_id,
            kind: document.kind,
            storage_path: document.storage_path,
            uploaded_by: document.uploaded_by,
            created_at: document.created_at,
        }
    }
}
