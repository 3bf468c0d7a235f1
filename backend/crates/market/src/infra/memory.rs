//! In-memory order book for tests and tooling

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use kernel::id::{ListingId, OrderId, UserId};
use kernel::page::Page;
use listing::ListingStatus;

use crate::domain::entity::{order::Order, share::TradableShare};
use crate::domain::repository::{MarketRepository, OrderFilter};
use crate::domain::value_object::{order_status::OrderStatus, order_type::OrderType};
use crate::error::{MarketError, MarketResult};

#[derive(Default)]
struct Tables {
    shares: Vec<TradableShare>,
    orders: Vec<Order>,
    verified_users: HashSet<UserId>,
}

#[derive(Default)]
pub struct InMemoryMarketRepository {
    tables: Mutex<Tables>,
}

impl InMemoryMarketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_share(
        &self,
        mint_address: &str,
        listing_id: ListingId,
        owner_id: Option<UserId>,
        listing_status: ListingStatus,
    ) {
        self.lock().shares.push(TradableShare {
            mint_address: mint_address.to_string(),
            listing_id,
            owner_id,
            listing_status,
        });
    }

    pub fn verify_kyc(&self, user_id: UserId) {
        self.lock().verified_users.insert(user_id);
    }

    pub fn share_owner(&self, mint_address: &str) -> Option<UserId> {
        self.lock()
            .shares
            .iter()
            .find(|s| s.mint_address == mint_address)
            .and_then(|s| s.owner_id)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Tables {
    fn replace(&mut self, order: &Order) -> MarketResult<()> {
        let slot = self
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(MarketError::OrderNotFound)?;
        *slot = order.clone();
        Ok(())
    }

    fn status_of(&self, id: OrderId) -> Option<OrderStatus> {
        self.orders.iter().find(|o| o.id == id).map(|o| o.status)
    }
}

fn newest_first(mut orders: Vec<Order>, page: Page) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    page.slice(&orders)
}

impl MarketRepository for InMemoryMarketRepository {
    async fn find_share(&self, mint_address: &str) -> MarketResult<Option<TradableShare>> {
        Ok(self
            .lock()
            .shares
            .iter()
            .find(|s| s.mint_address == mint_address)
            .cloned())
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> MarketResult<bool> {
        Ok(self.lock().verified_users.contains(&user_id))
    }

    async fn create_order(&self, order: &Order) -> MarketResult<()> {
        self.lock().orders.push(order.clone());
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> MarketResult<Option<Order>> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn cancel_order(&self, order: &Order) -> MarketResult<()> {
        let mut tables = self.lock();
        match tables.status_of(order.id) {
            None => Err(MarketError::OrderNotFound),
            Some(OrderStatus::Open) => tables.replace(order),
            Some(status) => Err(MarketError::OrderNotOpen(status)),
        }
    }

    async fn open_list(&self, share_mint: &str) -> MarketResult<Option<Order>> {
        Ok(self
            .lock()
            .orders
            .iter()
            .find(|o| {
                o.share_mint == share_mint
                    && o.order_type == OrderType::List
                    && o.status == OrderStatus::Open
            })
            .cloned())
    }

    async fn best_bid(
        &self,
        share_mint: &str,
        min_price: Option<i64>,
        exclude: UserId,
    ) -> MarketResult<Option<Order>> {
        let tables = self.lock();
        let mut bids: Vec<&Order> = tables
            .orders
            .iter()
            .filter(|o| {
                o.share_mint == share_mint
                    && o.order_type == OrderType::Buy
                    && o.status == OrderStatus::Open
                    && o.matched_order_id.is_none()
                    && o.buyer_id != Some(exclude)
                    && min_price.is_none_or(|min| o.price >= min)
            })
            .collect();
        bids.sort_by(|a, b| b.price.cmp(&a.price).then(a.created_at.cmp(&b.created_at)));
        Ok(bids.first().map(|o| (*o).clone()))
    }

    async fn list_orders(&self, filter: &OrderFilter, page: Page) -> MarketResult<Vec<Order>> {
        let orders = self
            .lock()
            .orders
            .iter()
            .filter(|o| {
                filter.share_mint.as_ref().is_none_or(|m| &o.share_mint == m)
                    && filter.status.is_none_or(|s| o.status == s)
            })
            .cloned()
            .collect();
        Ok(newest_first(orders, page))
    }

    async fn orders_of(&self, user_id: UserId, page: Page) -> MarketResult<Vec<Order>> {
        let orders = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.placed_by() == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(orders, page))
    }

    async fn save_match(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let mut tables = self.lock();
        match tables.status_of(maker.id) {
            None => return Err(MarketError::OrderNotFound),
            Some(OrderStatus::Open) => {}
            Some(status) => return Err(MarketError::OrderNotOpen(status)),
        }
        tables.replace(maker)?;
        tables.orders.push(taker.clone());
        Ok(())
    }

    async fn save_settlement(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let buyer = taker.buyer_id.ok_or(MarketError::NotMatched)?;
        let mut tables = self.lock();
        let share = tables
            .shares
            .iter_mut()
            .find(|s| s.mint_address == taker.share_mint && s.owner_id == Some(taker.seller_id))
            .ok_or(MarketError::SellerChanged)?;
        share.owner_id = Some(buyer);
        tables.replace(taker)?;
        tables.replace(maker)?;
        Ok(())
    }

    async fn save_release(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let mut tables = self.lock();
        tables.replace(taker)?;
        tables.replace(maker)?;
        Ok(())
    }
}
