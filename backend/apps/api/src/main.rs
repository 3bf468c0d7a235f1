//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod error_filter;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, AuthGuard, PgUserRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use chain::{ConfiguredShareMinter, MinterConfig, SolanaRpcClient, keypair_from_config_str};
use governance::{GovernanceConfig, PgGovernanceRepository, governance_router};
use jobs::{PgJobQueue, Worker, WorkerConfig};
use listing::{ListingConfig, MintListingSharesJob, PgListingRepository, listing_router};
use market::{MarketConfig, PgMarketRepository, market_router};
use platform::retry::RetryPolicy;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook::{PgChainEventRepository, WebhookConfig, webhook_router};

use crate::config::ApiConfig;
use crate::error_filter::{ErrorFilterConfig, error_filter};
use crate::health::{HealthState, health};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,listing=info,market=info,governance=info,webhook=info,jobs=info,chain=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    config.log_summary();

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth
    let auth_config = match config.jwt_secret.as_deref() {
        Some(secret) => AuthConfig::new(secret.as_bytes(), config.jwt_ttl),
        None => {
            tracing::warn!("JWT_SECRET not set, tokens will not survive a restart");
            AuthConfig::development()
        }
    };
    // 保護ルートはトークンのロールではなく保存済みのロールを見る
    let guard = AuthGuard::new(
        auth_config.tokens.clone(),
        Arc::new(PgUserRepository::new(pool.clone())),
    );

    // Solana
    let rpc = SolanaRpcClient::new(config.solana_rpc_url.clone());
    let authority = config
        .mint_authority
        .as_deref()
        .map(keypair_from_config_str)
        .transpose()?;
    let minter = ConfiguredShareMinter::from_parts(
        rpc.clone(),
        authority,
        MinterConfig {
            program_id: config.share_program_id,
            metadata_base_url: config.metadata_base_url.clone(),
            retry: RetryPolicy::default(),
        },
    );
    let listing_config = ListingConfig::new(config.share_program_id);

    // Job worker
    let queue = Arc::new(PgJobQueue::new(pool.clone()));
    let worker = Worker::new(
        queue.clone(),
        WorkerConfig {
            poll_interval: config.job_poll_interval,
            ..WorkerConfig::default()
        },
    )
    .register(Arc::new(MintListingSharesJob::new(
        Arc::new(PgListingRepository::new(pool.clone())),
        Arc::new(minter),
        Arc::new(listing_config.clone()),
    )));

    // Errors here should not prevent server startup
    match worker.recover().await {
        Ok(requeued) => tracing::info!(requeued, "Stuck job recovery completed"),
        Err(e) => tracing::warn!(error = %e, "Stuck job recovery failed, continuing anyway"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_task = tokio::spawn(worker.run(shutdown_rx));

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let webhook_config = WebhookConfig {
        helius_auth_token: config.helius_auth_token.clone(),
        kyc_secret: config.kyc_webhook_secret.clone(),
        stripe_secret: config.stripe_webhook_secret.clone(),
        ..WebhookConfig::default()
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health).with_state(HealthState {
            pool: pool.clone(),
            rpc,
        }))
        .nest(
            "/auth",
            auth_router(PgUserRepository::new(pool.clone()), auth_config),
        )
        .merge(listing_router(
            PgListingRepository::new(pool.clone()),
            queue,
            listing_config,
            guard.clone(),
        ))
        .merge(market_router(
            PgMarketRepository::new(pool.clone()),
            MarketConfig::default(),
            guard.clone(),
        ))
        .merge(governance_router(
            PgGovernanceRepository::new(pool.clone()),
            GovernanceConfig::default(),
            guard,
        ))
        .merge(webhook_router(
            PgChainEventRepository::new(pool.clone()),
            PgUserRepository::new(pool.clone()),
            PgMarketRepository::new(pool.clone()),
            webhook_config,
        ))
        .layer(middleware::from_fn_with_state(
            ErrorFilterConfig {
                include_stack: config.env.is_development(),
            },
            error_filter,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, waiting for job worker");
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_task.await {
        tracing::error!(error = %e, "Job worker task panicked");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
