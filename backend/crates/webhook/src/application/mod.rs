//! Application Layer

pub mod config;
pub mod helius;
pub mod kyc;
pub mod stripe;

pub use config::WebhookConfig;
pub use helius::{HeliusSummary, ProcessHeliusUseCase};
pub use kyc::ProcessKycUseCase;
pub use stripe::{ProcessStripeUseCase, StripeOutcome};
