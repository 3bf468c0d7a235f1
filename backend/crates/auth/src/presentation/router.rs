//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGuard, require_bearer};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let guard = AuthGuard::new(config.tokens.clone(), repo.clone());
    let state = AuthAppState {
        repo,
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R>).post(handlers::update_profile::<R>),
        )
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/{id}/kyc", post(handlers::update_kyc::<R>))
        .route("/users/{id}/role", post(handlers::update_role::<R>))
        .route_layer(middleware::from_fn_with_state(guard, require_bearer));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
