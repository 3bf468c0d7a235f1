//! Governance Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use auth::AuthGuard;
use std::sync::Arc;

use crate::application::config::GovernanceConfig;
use crate::domain::repository::GovernanceRepository;
use crate::infra::postgres::PgGovernanceRepository;
use crate::presentation::handlers::{self, GovernanceAppState};

/// Create the Governance router with PostgreSQL repository
pub fn governance_router(
    repo: PgGovernanceRepository,
    config: GovernanceConfig,
    guard: impl Into<AuthGuard>,
) -> Router {
    governance_router_generic(repo, config, guard)
}

/// Create a generic Governance router for any repository implementation
pub fn governance_router_generic<R>(
    repo: R,
    config: GovernanceConfig,
    guard: impl Into<AuthGuard>,
) -> Router
where
    R: GovernanceRepository + Send + Sync + 'static,
{
    let guard: AuthGuard = guard.into();
    let state = GovernanceAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/listings/{id}/proposals",
            get(handlers::list_proposals::<R>).post(handlers::create_proposal::<R>),
        )
        .route("/proposals/{id}", get(handlers::get_proposal::<R>))
        .route("/proposals/{id}/votes", post(handlers::cast_vote::<R>))
        .route("/proposals/{id}/close", post(handlers::close_proposal::<R>))
        .route(
            "/listings/{id}/payouts",
            get(handlers::list_payouts::<R>).post(handlers::create_payout::<R>),
        )
        .route("/payouts/mine", get(handlers::my_payouts::<R>))
        .route_layer(middleware::from_fn_with_state(guard, auth::require_bearer))
        .with_state(state)
}
