//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{DocumentId, ListingId, ShareTokenId, UserId};
use kernel::page::Page;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{document::Document, listing::Listing, share_token::ShareToken};
use crate::domain::repository::{
    DocumentRepository, ListingFilter, ListingRepository, ShareRepository,
};
use crate::domain::value_object::{
    document_kind::DocumentKind, geo_json::GeoJson, listing_status::ListingStatus,
};
use crate::error::{ListingError, ListingResult};

const LISTING_COLUMNS: &str = r#"
    id,
    owner_id,
    title,
    description,
    geo_json,
    parcel_size,
    total_shares,
    price_per_share,
    status,
    chain_address,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed listing, share and document repository
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Listing Repository Implementation
// ============================================================================

impl ListingRepository for PgListingRepository {
    async fn create(&self, listing: &Listing) -> ListingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id,
                owner_id,
                title,
                description,
                geo_json,
                parcel_size,
                total_shares,
                price_per_share,
                status,
                chain_address,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(listing.owner_id.as_uuid())
        .bind(&listing.title)
        .bind(listing.description.as_deref())
        .bind(listing.geo_json.as_value())
        .bind(listing.parcel_size)
        .bind(listing.total_shares)
        .bind(listing.price_per_share)
        .bind(listing.status.code())
        .bind(listing.chain_address.as_deref())
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: ListingId) -> ListingResult<Option<Listing>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_listing()).transpose()
    }

    async fn update(&self, listing: &Listing) -> ListingResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE listings SET
                title = $2,
                description = $3,
                geo_json = $4,
                parcel_size = $5,
                total_shares = $6,
                price_per_share = $7,
                status = $8,
                chain_address = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(&listing.title)
        .bind(listing.description.as_deref())
        .bind(listing.geo_json.as_value())
        .bind(listing.parcel_size)
        .bind(listing.total_shares)
        .bind(listing.price_per_share)
        .bind(listing.status.code())
        .bind(listing.chain_address.as_deref())
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ListingError::ListingNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: ListingId) -> ListingResult<()> {
        // share_tokens / documents / proposals は ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ListingError::ListingNotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: ListingFilter, page: Page) -> ListingResult<Vec<Listing>> {
        let order = "ORDER BY created_at DESC, id";
        let rows = match filter {
            ListingFilter::Public => {
                let sql = format!(
                    "SELECT {LISTING_COLUMNS} FROM listings WHERE status = 'LIVE' {order} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ListingRow>(&sql)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            ListingFilter::VisibleTo(viewer) => {
                let sql = format!(
                    "SELECT {LISTING_COLUMNS} FROM listings WHERE status = 'LIVE' OR owner_id = $3 {order} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ListingRow>(&sql)
                    .bind(page.limit)
                    .bind(page.offset)
                    .bind(viewer.as_uuid())
                    .fetch_all(&self.pool)
                    .await?
            }
            ListingFilter::All(status) => {
                let sql = format!(
                    "SELECT {LISTING_COLUMNS} FROM listings WHERE ($3::text IS NULL OR status = $3) {order} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ListingRow>(&sql)
                    .bind(page.limit)
                    .bind(page.offset)
                    .bind(status.map(|s| s.code()))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(|r| r.into_listing()).collect()
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> ListingResult<bool> {
        let verified = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND kyc_status = 'VERIFIED')",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(verified)
    }
}

// ============================================================================
// Share Repository Implementation
// ============================================================================

impl ShareRepository for PgListingRepository {
    async fn list_shares(&self, listing_id: ListingId) -> ListingResult<Vec<ShareToken>> {
        let rows = sqlx::query_as::<_, ShareRow>(
            r#"
            SELECT
                id,
                listing_id,
                index_number,
                mint_address,
                metadata_uri,
                owner_id,
                mint_signature,
                created_at,
                updated_at
            FROM share_tokens
            WHERE listing_id = $1
            ORDER BY index_number
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ShareRow::into_share).collect())
    }

    async fn minted_indexes(&self, listing_id: ListingId) -> ListingResult<Vec<i32>> {
        let indexes = sqlx::query_scalar::<_, i32>(
            "SELECT index_number FROM share_tokens WHERE listing_id = $1 ORDER BY index_number",
        )
        .bind(listing_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(indexes)
    }

    async fn insert_shares(&self, shares: &[ShareToken]) -> ListingResult<u64> {
        if shares.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for share in shares {
            inserted += sqlx::query(
                r#"
                INSERT INTO share_tokens (
                    id,
                    listing_id,
                    index_number,
                    mint_address,
                    metadata_uri,
                    owner_id,
                    mint_signature,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (listing_id, index_number) DO NOTHING
                "#,
            )
            .bind(share.id.as_uuid())
            .bind(share.listing_id.as_uuid())
            .bind(share.index_number)
            .bind(&share.mint_address)
            .bind(&share.metadata_uri)
            .bind(share.owner_id.map(UserId::into_uuid))
            .bind(share.mint_signature.as_deref())
            .bind(share.created_at)
            .bind(share.updated_at)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }
}

// ============================================================================
// Document Repository Implementation
// ============================================================================

impl DocumentRepository for PgListingRepository {
    async fn create_document(&self, document: &Document) -> ListingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, listing_id, kind, storage_path, uploaded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.listing_id.as_uuid())
        .bind(document.kind.code())
        .bind(&document.storage_path)
        .bind(document.uploaded_by.as_uuid())
        .bind(document.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_document(&self, id: DocumentId) -> ListingResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, listing_id, kind, storage_path, uploaded_by, created_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_document()).transpose()
    }

    async fn list_documents(&self, listing_id: ListingId) -> ListingResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, listing_id, kind, storage_path, uploaded_by, created_at
            FROM documents
            WHERE listing_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_document()).collect()
    }

    async fn delete_document(&self, id: DocumentId) -> ListingResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ListingError::DocumentNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    geo_json: Value,
    parcel_size: f64,
    total_shares: i32,
    price_per_share: i64,
    status: String,
    chain_address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self) -> ListingResult<Listing> {
        let status = ListingStatus::from_code(&self.status).ok_or_else(|| {
            kernel::error::AppError::internal(format!("Invalid listing status: {}", self.status))
        })?;

        Ok(Listing {
            id: ListingId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            title: self.title,
            description: self.description,
            geo_json: GeoJson::from_db(self.geo_json),
            parcel_size: self.parcel_size,
            total_shares: self.total_shares,
            price_per_share: self.price_per_share,
            status,
            chain_address: self.chain_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    id: Uuid,
    listing_id: Uuid,
    index_number: i32,
    mint_address: String,
    metadata_uri: String,
    owner_id: Option<Uuid>,
    mint_signature: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShareRow {
    fn into_share(self) -> ShareToken {
        ShareToken {
            id: ShareTokenId::from_uuid(self.id),
            listing_id: ListingId::from_uuid(self.listing_id),
            index_number: self.index_number,
            mint_address: self.mint_address,
            metadata_uri: self.metadata_uri,
            owner_id: self.owner_id.map(UserId::from_uuid),
            mint_signature: self.mint_signature,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    listing_id: Uuid,
    kind: String,
    storage_path: String,
    uploaded_by: Uuid,
    created_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> ListingResult<Document> {
        let kind = DocumentKind::from_code(&self.kind).ok_or_else(|| {
            kernel::error::AppError::internal(format!("Invalid document kind: {}", self.kind))
        })?;

        Ok(Document {
            id: DocumentId::from_uuid(self.id),
            listing_id: ListingId::from_uuid(self.listing_id),
            kind,
            storage_path: self.storage_path,
            uploaded_by: UserId::from_uuid(self.uploaded_by),
            created_at: self.created_at,
        })
    }
}
