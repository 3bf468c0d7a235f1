//! HTTP Handlers
//!
//! Bodies are taken as raw bytes: signatures cover the exact payload.

use std::sync::Arc;

use auth::UserRepository;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use chrono::Utc;
use market::MarketRepository;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::{
    ProcessHeliusUseCase, ProcessKycUseCase, ProcessStripeUseCase, WebhookConfig,
};
use crate::domain::event::{KycEvent, StripeEvent};
use crate::domain::repository::ChainEventRepository;
use crate::domain::signature::{verify_body_signature, verify_shared_token, verify_stripe_signature};
use crate::error::{WebhookError, WebhookResult};
use crate::presentation::dto::{HeliusResponse, KycResponse, StripeResponse};

pub const KYC_SIGNATURE_HEADER: &str = "x-signature";
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

pub struct WebhookAppState<W, U, M> {
    pub events: Arc<W>,
    pub users: Arc<U>,
    pub market: Arc<M>,
    pub config: Arc<WebhookConfig>,
}

impl<W, U, M> Clone for WebhookAppState<W, U, M> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            users: self.users.clone(),
            market: self.market.clone(),
            config: self.config.clone(),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> WebhookResult<T> {
    serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
}

/// POST /webhooks/helius
pub async fn helius<W, U, M>(
    State(state): State<WebhookAppState<W, U, M>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResult<Json<HeliusResponse>>
where
    W: ChainEventRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MarketRepository + Send + Sync + 'static,
{
    let token = state
        .config
        .helius_auth_token
        .as_deref()
        .ok_or(WebhookError::NotConfigured("Helius"))?;
    verify_shared_token(token, header_str(&headers, header::AUTHORIZATION))?;

    let transactions: Vec<Value> = parse_body(&body)?;
    let summary = ProcessHeliusUseCase::new(state.events.clone())
        .execute(transactions)
        .await?;

    tracing::info!(
        processed = summary.processed,
        skipped = summary.skipped,
        shares_moved = summary.shares_moved,
        "Helius webhook handled"
    );
    Ok(Json(summary.into()))
}

/// POST /webhooks/kyc
pub async fn kyc<W, U, M>(
    State(state): State<WebhookAppState<W, U, M>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResult<Json<KycResponse>>
where
    W: ChainEventRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MarketRepository + Send + Sync + 'static,
{
    let secret = state
        .config
        .kyc_secret
        .as_deref()
        .ok_or(WebhookError::NotConfigured("KYC"))?;
    verify_body_signature(secret, &body, header_str(&headers, KYC_SIGNATURE_HEADER))?;

    let event: KycEvent = parse_body(&body)?;
    let user = ProcessKycUseCase::new(state.users.clone())
        .execute(event)
        .await?;
    Ok(Json(user.into()))
}

/// POST /webhooks/stripe
pub async fn stripe<W, U, M>(
    State(state): State<WebhookAppState<W, U, M>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResult<Json<StripeResponse>>
where
    W: ChainEventRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MarketRepository + Send + Sync + 'static,
{
    let secret = state
        .config
        .stripe_secret
        .as_deref()
        .ok_or(WebhookError::NotConfigured("Stripe"))?;
    verify_stripe_signature(
        secret,
        &body,
        header_str(&headers, STRIPE_SIGNATURE_HEADER),
        Utc::now().timestamp(),
        state.config.stripe_tolerance_secs,
    )?;

    let event: StripeEvent = parse_body(&body)?;
    let outcome = ProcessStripeUseCase::new(state.market.clone())
        .execute(&event)
        .await?;

    tracing::info!(event_type = %event.kind, outcome = outcome.as_str(), "Stripe webhook handled");
    Ok(Json(outcome.into()))
}
