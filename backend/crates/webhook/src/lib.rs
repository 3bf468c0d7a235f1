//! Webhook ingestion
//!
//! - Helius: share token transfers observed on chain move `owner_id`
//! - KYC provider: verification results update the user's KYC status
//! - Stripe: payment results settle or release matched orders
//!
//! Every source is authenticated before its body is parsed. A failed
//! delivery answers 4xx and is not retried here.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::WebhookConfig;
pub use error::{WebhookError, WebhookResult};
pub use infra::{InMemoryChainEventRepository, PgChainEventRepository};
pub use presentation::{webhook_router, webhook_router_generic};
