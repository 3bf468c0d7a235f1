//! Cancel Order Use Case

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::OrderId;

use crate::domain::entity::order::Order;
use crate::domain::repository::MarketRepository;
use crate::error::{MarketError, MarketResult};

pub struct CancelOrderUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
}

impl<R> CancelOrderUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Only OPEN orders, only by whoever placed them
    pub async fn execute(&self, actor: &AuthUser, order_id: OrderId) -> MarketResult<Order> {
        let mut order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or(MarketError::OrderNotFound)?;

        order.cancel(actor.user_id)?;
        self.repo.cancel_order(&order).await?;

        tracing::info!(order_id = %order.id, actor_id = %actor.user_id, "Order cancelled");

        Ok(order)
    }
}
