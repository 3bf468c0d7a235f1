//! Order Queries

use std::sync::Arc;

use auth::AuthUser;
use kernel::page::{Page, Paginated};

use crate::domain::entity::order::Order;
use crate::domain::repository::{MarketRepository, OrderFilter};
use crate::error::MarketResult;

pub struct ListOrdersUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
}

impl<R> ListOrdersUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, filter: OrderFilter, page: Page) -> MarketResult<Paginated<Order>> {
        let page = page.clamped();
        let orders = self.repo.list_orders(&filter, page).await?;
        Ok(Paginated::new(orders, page))
    }
}

pub struct MyOrdersUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
}

impl<R> MyOrdersUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &AuthUser, page: Page) -> MarketResult<Paginated<Order>> {
        let page = page.clamped();
        let orders = self.repo.orders_of(actor.user_id, page).await?;
        Ok(Paginated::new(orders, page))
    }
}
