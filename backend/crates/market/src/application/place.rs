//! Order Placement Use Cases
//!
//! LIST puts a held share on the book. BUY takes the open LIST if there is
//! one, otherwise leaves a bid. SELL takes the best bid.

use std::sync::Arc;

use auth::AuthUser;

use crate::application::config::MarketConfig;
use crate::application::{check_price, ensure_kyc, ensure_tradable, load_share};
use crate::domain::entity::order::Order;
use crate::domain::repository::MarketRepository;
use crate::error::{MarketError, MarketResult};

pub struct ListShareUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
    config: Arc<MarketConfig>,
}

impl<R> ListShareUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<MarketConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, actor: &AuthUser, share_mint: &str, price: i64) -> MarketResult<Order> {
        let price = check_price(&self.config, price)?;
        let share = load_share(self.repo.as_ref(), share_mint).await?;
        if !share.is_held_by(actor.user_id) {
            return Err(MarketError::NotShareHolder);
        }
        ensure_kyc(self.repo.as_ref(), actor.user_id).await?;
        ensure_tradable(&share)?;
        if self.repo.open_list(&share.mint_address).await?.is_some() {
            return Err(MarketError::AlreadyListed);
        }

        let order = Order::list(actor.user_id, share.mint_address, price);
        self.repo.create_order(&order).await?;

        tracing::info!(
            order_id = %order.id,
            share_mint = %order.share_mint,
            seller_id = %actor.user_id,
            price = order.price,
            "Share listed"
        );

        Ok(order)
    }
}

pub struct BuyShareUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
    config: Arc<MarketConfig>,
}

impl<R> BuyShareUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<MarketConfig>) -> Self {
        Self { repo, config }
    }

    /// PENDING BUY matched to the open LIST, or an OPEN bid at `price`
    pub async fn execute(
        &self,
        actor: &AuthUser,
        share_mint: &str,
        price: Option<i64>,
    ) -> MarketResult<Order> {
        let share = load_share(self.repo.as_ref(), share_mint).await?;
        ensure_kyc(self.repo.as_ref(), actor.user_id).await?;
        if share.is_held_by(actor.user_id) {
            return Err(MarketError::OwnShare);
        }
        ensure_tradable(&share)?;

        if let Some(mut list) = self.repo.open_list(&share.mint_address).await? {
            let buy = Order::take_list(&mut list, actor.user_id)?;
            self.repo.save_match(&buy, &list).await?;

            tracing::info!(
                order_id = %buy.id,
                list_order_id = %list.id,
                share_mint = %buy.share_mint,
                buyer_id = %actor.user_id,
                price = buy.price,
                "Listed share taken, awaiting payment"
            );
            return Ok(buy);
        }

        let price = check_price(&self.config, price.ok_or(MarketError::PriceRequired)?)?;
        let holder = share.owner_id.ok_or(MarketError::NoHolder)?;
        let bid = Order::bid(actor.user_id, holder, share.mint_address, price);
        self.repo.create_order(&bid).await?;

        tracing::info!(
            order_id = %bid.id,
            share_mint = %bid.share_mint,
            buyer_id = %actor.user_id,
            price = bid.price,
            "Bid placed"
        );

        Ok(bid)
    }
}

pub struct SellShareUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
    config: Arc<MarketConfig>,
}

impl<R> SellShareUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<MarketConfig>) -> Self {
        Self { repo, config }
    }

    /// PENDING SELL into the best bid priced at least `min_price`
    pub async fn execute(
        &self,
        actor: &AuthUser,
        share_mint: &str,
        min_price: Option<i64>,
    ) -> MarketResult<Order> {
        let min_price = min_price
            .map(|p| check_price(&self.config, p))
            .transpose()?;
        let share = load_share(self.repo.as_ref(), share_mint).await?;
        if !share.is_held_by(actor.user_id) {
            return Err(MarketError::NotShareHolder);
        }
        ensure_kyc(self.repo.as_ref(), actor.user_id).await?;
        ensure_tradable(&share)?;

        let mut bid = self
            .repo
            .best_bid(&share.mint_address, min_price, actor.user_id)
            .await?
            .ok_or(MarketError::NoMatchingBid)?;
        let sell = Order::take_bid(&mut bid, actor.user_id)?;
        self.repo.save_match(&sell, &bid).await?;

        tracing::info!(
            order_id = %sell.id,
            bid_order_id = %bid.id,
            share_mint = %sell.share_mint,
            seller_id = %actor.user_id,
            price = sell.price,
            "Bid taken, awaiting payment"
        );

        Ok(sell)
    }
}
