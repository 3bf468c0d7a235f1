//! Repository Traits

use kernel::id::{OrderId, UserId};
use kernel::page::Page;

use crate::domain::entity::{order::Order, share::TradableShare};
use crate::domain::value_object::order_status::OrderStatus;
use crate::error::MarketResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub share_mint: Option<String>,
    pub status: Option<OrderStatus>,
}

#[trait_variant::make(MarketRepository: Send)]
pub trait LocalMarketRepository {
    async fn find_share(&self, mint_address: &str) -> MarketResult<Option<TradableShare>>;

    async fn is_kyc_verified(&self, user_id: UserId) -> MarketResult<bool>;

    async fn create_order(&self, order: &Order) -> MarketResult<()>;

    async fn find_order(&self, id: OrderId) -> MarketResult<Option<Order>>;

    /// Only while the stored row is still OPEN; otherwise `OrderNotOpen`
    async fn cancel_order(&self, order: &Order) -> MarketResult<()>;

    async fn open_list(&self, share_mint: &str) -> MarketResult<Option<Order>>;

    /// Highest OPEN BUY bid at or above `min_price`, oldest first on ties,
    /// ignoring bids placed by `exclude`
    async fn best_bid(
        &self,
        share_mint: &str,
        min_price: Option<i64>,
        exclude: UserId,
    ) -> MarketResult<Option<Order>>;

    /// Newest first
    async fn list_orders(&self, filter: &OrderFilter, page: Page) -> MarketResult<Vec<Order>>;

    /// Orders where the user is seller or buyer, newest first
    async fn orders_of(&self, user_id: UserId, page: Page) -> MarketResult<Vec<Order>>;

    /// Insert `taker` and move `maker` from OPEN to PENDING in one
    /// transaction. Fails with `OrderNotOpen` if the maker was taken first.
    async fn save_match(&self, taker: &Order, maker: &Order) -> MarketResult<()>;

    /// Both sides FILLED and the share moved from seller to buyer, atomically
    async fn save_settlement(&self, taker: &Order, maker: &Order) -> MarketResult<()>;

    async fn save_release(&self, taker: &Order, maker: &Order) -> MarketResult<()>;
}
