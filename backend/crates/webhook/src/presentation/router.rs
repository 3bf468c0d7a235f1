//! Webhook Router
//!
//! No bearer guard; each source authenticates with its own secret.

use auth::{PgUserRepository, UserRepository};
use axum::{Router, routing::post};
use market::{MarketRepository, PgMarketRepository};
use std::sync::Arc;

use crate::application::WebhookConfig;
use crate::domain::repository::ChainEventRepository;
use crate::infra::postgres::PgChainEventRepository;
use crate::presentation::handlers::{self, WebhookAppState};

pub fn webhook_router(
    events: PgChainEventRepository,
    users: PgUserRepository,
    market: PgMarketRepository,
    config: WebhookConfig,
) -> Router {
    webhook_router_generic(events, users, market, config)
}

pub fn webhook_router_generic<W, U, M>(events: W, users: U, market: M, config: WebhookConfig) -> Router
where
    W: ChainEventRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MarketRepository + Send + Sync + 'static,
{
    let state = WebhookAppState {
        events: Arc::new(events),
        users: Arc::new(users),
        market: Arc::new(market),
        config: Arc::new(config),
    };

    Router::new()
        .route("/webhooks/helius", post(handlers::helius::<W, U, M>))
        .route("/webhooks/kyc", post(handlers::kyc::<W, U, M>))
        .route("/webhooks/stripe", post(handlers::stripe::<W, U, M>))
        .with_state(state)
}
