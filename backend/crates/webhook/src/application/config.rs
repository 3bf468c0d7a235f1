//! Webhook secrets

use crate::domain::signature::STRIPE_TOLERANCE_SECS;

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Expected `Authorization` header value on Helius deliveries
    pub helius_auth_token: Option<String>,
    pub kyc_secret: Option<String>,
    pub stripe_secret: Option<String>,
    pub stripe_tolerance_secs: i64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            helius_auth_token: None,
            kyc_secret: None,
            stripe_secret: None,
            stripe_tolerance_secs: STRIPE_TOLERANCE_SECS,
        }
    }
}

impl WebhookConfig {
    pub fn development() -> Self {
        Self {
            helius_auth_token: Some("dev-helius-token".to_string()),
            kyc_secret: Some("dev-kyc-secret".to_string()),
            stripe_secret: Some("whsec_dev".to_string()),
            ..Self::default()
        }
    }
}
