//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use auth::AuthUser;
use jobs::JobQueue;
use kernel::id::markers;
use kernel::page::{Page, Paginated};
use kernel::validation::{PathId, QueryParams, ValidatedJson};
use std::sync::Arc;

use crate::application::config::ListingConfig;
use crate::application::{
    AddDocumentUseCase, ChangeStatusUseCase, CreateListingUseCase, DeleteDocumentUseCase,
    DeleteListingUseCase, GetListingUseCase, ListDocumentsUseCase, ListListingsUseCase,
    ListSharesUseCase, UpdateListingUseCase,
};
use crate::domain::repository::ListingStore;
use crate::domain::value_object::{document_kind::DocumentKind, listing_status::ListingStatus};
use crate::error::{ListingError, ListingResult};
use crate::presentation::dto::{
    AddDocumentRequest, ChangeStatusRequest, CreateListingRequest, DocumentResponse,
    ListingResponse, ShareTokenResponse, StatusQuery, UpdateListingRequest,
};

/// Shared state for listing handlers
pub struct ListingAppState<R, Q> {
    pub repo: Arc<R>,
    pub queue: Arc<Q>,
    pub config: Arc<ListingConfig>,
}

impl<R, Q> Clone for ListingAppState<R, Q> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            queue: self.queue.clone(),
            config: self.config.clone(),
        }
    }
}

fn parse_status(code: String) -> ListingResult<ListingStatus> {
    ListingStatus::from_code(&code).ok_or(ListingError::UnknownCode {
        field: "status",
        value: code,
    })
}

// ============================================================================
// Listings
// ============================================================================

/// GET /listings/public
pub async fn list_public<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    QueryParams(page): QueryParams<Page>,
) -> ListingResult<Json<Paginated<ListingResponse>>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let listings = ListListingsUseCase::new(state.repo.clone())
        .public(page)
        .await?;
    Ok(Json(listings.map(ListingResponse::from)))
}

/// GET /listings
pub async fn list_listings<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    QueryParams(page): QueryParams<Page>,
    QueryParams(query): QueryParams<StatusQuery>,
) -> ListingResult<Json<Paginated<ListingResponse>>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let status = query.status.map(parse_status).transpose()?;
    let listings = ListListingsUseCase::new(state.repo.clone())
        .for_actor(&auth, status, page)
        .await?;
    Ok(Json(listings.map(ListingResponse::from)))
}

/// GET /listings/{id}
pub async fn get_listing<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
) -> ListingResult<Json<ListingResponse>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let listing = GetListingUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(Json(listing.into()))
}

/// POST /listings
pub async fn create_listing<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateListingRequest>,
) -> ListingResult<(StatusCode, Json<ListingResponse>)>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let fields = req.into_new_listing()?;
    let listing = CreateListingUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&auth, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// PATCH /listings/{id}
pub async fn update_listing<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
    ValidatedJson(req): ValidatedJson<UpdateListingRequest>,
) -> ListingResult<Json<ListingResponse>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let patch = req.into_patch()?;
    let listing = UpdateListingUseCase::new(state.repo.clone())
        .execute(&auth, id, patch)
        .await?;
    Ok(Json(listing.into()))
}

/// POST /listings/{id}/status
pub async fn change_status<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
    ValidatedJson(req): ValidatedJson<ChangeStatusRequest>,
) -> ListingResult<Json<ListingResponse>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let to = parse_status(req.status)?;
    let listing = ChangeStatusUseCase::new(
        state.repo.clone(),
        state.queue.clone(),
        state.config.clone(),
    )
    .execute(&auth, id, to)
    .await?;
    Ok(Json(listing.into()))
}

/// DELETE /listings/{id}
pub async fn delete_listing<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
) -> ListingResult<StatusCode>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    DeleteListingUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Shares
// ============================================================================

/// GET /listings/{id}/shares
pub async fn list_shares<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
) -> ListingResult<Json<Vec<ShareTokenResponse>>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let shares = ListSharesUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(Json(shares.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Documents
// ============================================================================

/// GET /listings/{id}/documents
pub async fn list_documents<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
) -> ListingResult<Json<Vec<DocumentResponse>>>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let documents = ListDocumentsUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

/// POST /listings/{id}/documents
pub async fn add_document<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Listing>,
    ValidatedJson(req): ValidatedJson<AddDocumentRequest>,
) -> ListingResult<(StatusCode, Json<DocumentResponse>)>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    let kind = DocumentKind::from_code(&req.kind).ok_or(ListingError::UnknownCode {
        field: "kind",
        value: req.kind,
    })?;
    let document = AddDocumentUseCase::new(state.repo.clone())
        .execute(&auth, id, kind, req.storage_path.trim().to_string())
        .await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

/// DELETE /documents/{id}
pub async fn delete_document<R, Q>(
    State(state): State<ListingAppState<R, Q>>,
    auth: AuthUser,
    PathId(id): PathId<markers::Document>,
) -> ListingResult<StatusCode>
where
    R: ListingStore,
    Q: JobQueue + Sync + 'static,
{
    DeleteDocumentUseCase::new(state.repo.clone())
        .execute(&auth, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
