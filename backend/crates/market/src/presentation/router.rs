//! Marketplace Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use auth::AuthGuard;
use std::sync::Arc;

use crate::application::config::MarketConfig;
use crate::domain::repository::MarketRepository;
use crate::infra::postgres::PgMarketRepository;
use crate::presentation::handlers::{self, MarketAppState};

/// Create the Marketplace router with PostgreSQL repository
pub fn market_router(
    repo: PgMarketRepository,
    config: MarketConfig,
    guard: impl Into<AuthGuard>,
) -> Router {
    market_router_generic(repo, config, guard)
}

/// Create a generic Marketplace router for any repository implementation
pub fn market_router_generic<R>(
    repo: R,
    config: MarketConfig,
    guard: impl Into<AuthGuard>,
) -> Router
where
    R: MarketRepository + Send + Sync + 'static,
{
    let guard: AuthGuard = guard.into();
    let state = MarketAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/marketplace/list", post(handlers::list_share::<R>))
        .route("/marketplace/buy", post(handlers::buy_share::<R>))
        .route("/marketplace/sell", post(handlers::sell_share::<R>))
        .route("/marketplace/cancel", post(handlers::cancel_order::<R>))
        .route("/marketplace/orders", get(handlers::list_orders::<R>))
        .route("/marketplace/orders/mine", get(handlers::my_orders::<R>))
        .route_layer(middleware::from_fn_with_state(guard, auth::require_bearer))
        .with_state(state)
}
