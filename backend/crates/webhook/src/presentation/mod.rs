//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::WebhookAppState;
pub use router::{webhook_router, webhook_router_generic};
