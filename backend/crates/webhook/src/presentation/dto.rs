//! Webhook acknowledgements

use auth::{KycStatus, User};
use kernel::id::{OrderId, UserId};
use market::OrderStatus;
use serde::Serialize;

use crate::application::{HeliusSummary, StripeOutcome};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeliusResponse {
    pub received: bool,
    pub processed: u32,
    pub skipped: u32,
    pub shares_moved: u64,
}

impl From<HeliusSummary> for HeliusResponse {
    fn from(summary: HeliusSummary) -> Self {
        Self {
            received: true,
            processed: summary.processed,
            skipped: summary.skipped,
            shares_moved: summary.shares_moved,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycResponse {
    pub received: bool,
    pub user_id: UserId,
    pub kyc_status: KycStatus,
}

impl From<User> for KycResponse {
    fn from(user: User) -> Self {
        Self {
            received: true,
            user_id: user.id,
            kyc_status: user.kyc_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeResponse {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignored: bool,
}

impl From<StripeOutcome> for StripeResponse {
    fn from(outcome: StripeOutcome) -> Self {
        match outcome {
            StripeOutcome::Settled(pair) | StripeOutcome::Released(pair) => Self {
                received: true,
                order_id: Some(pair.taker.id),
                order_status: Some(pair.taker.status),
                ignored: false,
            },
            StripeOutcome::Ignored => Self {
                received: true,
                order_id: None,
                order_status: None,
                ignored: true,
            },
        }
    }
}
