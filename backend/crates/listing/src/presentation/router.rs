//! Listing Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use jobs::{JobQueue, PgJobQueue};
use auth::AuthGuard;
use std::sync::Arc;

use crate::application::config::ListingConfig;
use crate::domain::repository::ListingStore;
use crate::infra::postgres::PgListingRepository;
use crate::presentation::handlers::{self, ListingAppState};

/// Create the Listing router with PostgreSQL repositories
pub fn listing_router(
    repo: PgListingRepository,
    queue: Arc<PgJobQueue>,
    config: ListingConfig,
    guard: impl Into<AuthGuard>,
) -> Router {
    listing_router_generic(repo, queue, config, guard)
}

/// Create a generic Listing router for any repository implementation
pub fn listing_router_generic<R, Q>(
    repo: R,
    queue: Arc<Q>,
    config: ListingConfig,
    guard: impl Into<AuthGuard>,
) -> Router
where
    R: ListingStore,
    Q: JobQueue + Send + Sync + 'static,
{
    let guard: AuthGuard = guard.into();
    let state = ListingAppState {
        repo: Arc::new(repo),
        queue,
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route(
            "/listings",
            get(handlers::list_listings::<R, Q>).post(handlers::create_listing::<R, Q>),
        )
        .route(
            "/listings/{id}",
            get(handlers::get_listing::<R, Q>)
                .patch(handlers::update_listing::<R, Q>)
                .delete(handlers::delete_listing::<R, Q>),
        )
        .route("/listings/{id}/status", post(handlers::change_status::<R, Q>))
        .route("/listings/{id}/shares", get(handlers::list_shares::<R, Q>))
        .route(
            "/listings/{id}/documents",
            get(handlers::list_documents::<R, Q>).post(handlers::add_document::<R, Q>),
        )
        .route("/documents/{id}", delete(handlers::delete_document::<R, Q>))
        .route_layer(middleware::from_fn_with_state(guard, auth::require_bearer));

    Router::new()
        .route("/listings/public", get(handlers::list_public::<R, Q>))
        .merge(protected)
        .with_state(state)
}
