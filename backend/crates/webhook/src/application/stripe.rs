//! Stripe payment events drive order settlement

use std::str::FromStr;
use std::sync::Arc;

use kernel::id::OrderId;
use market::{MarketRepository, MatchedPair, SettleOrderUseCase};

use crate::domain::event::{StripeAction, StripeEvent};
use crate::error::{WebhookError, WebhookResult};

#[derive(Debug)]
pub enum StripeOutcome {
    Settled(MatchedPair),
    Released(MatchedPair),
    Ignored,
}

impl StripeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StripeOutcome::Settled(_) => "settled",
            StripeOutcome::Released(_) => "released",
            StripeOutcome::Ignored => "ignored",
        }
    }
}

pub struct ProcessStripeUseCase<M>
where
    M: MarketRepository,
{
    market: Arc<M>,
}

impl<M> ProcessStripeUseCase<M>
where
    M: MarketRepository + Sync,
{
    pub fn new(market: Arc<M>) -> Self {
        Self { market }
    }

    pub async fn execute(&self, event: &StripeEvent) -> WebhookResult<StripeOutcome> {
        let action = event.action();
        if action == StripeAction::Ignore {
            tracing::debug!(event_type = %event.kind, "Ignoring Stripe event");
            return Ok(StripeOutcome::Ignored);
        }

        let Some(raw) = event.order_id() else {
            tracing::warn!(
                event_type = %event.kind,
                event_id = ?event.id,
                "Stripe payment event without orderId metadata"
            );
            return Ok(StripeOutcome::Ignored);
        };
        let order_id = OrderId::from_str(raw).map_err(|_| WebhookError::InvalidId {
            field: "orderId",
            value: raw.to_string(),
        })?;

        let settle = SettleOrderUseCase::new(self.market.clone());
        let outcome = match action {
            StripeAction::Settle => {
                StripeOutcome::Settled(settle.settle(order_id, &event.payment_reference()).await?)
            }
            StripeAction::Release => StripeOutcome::Released(settle.release(order_id).await?),
            StripeAction::Ignore => StripeOutcome::Ignored,
        };
        Ok(outcome)
    }
}
