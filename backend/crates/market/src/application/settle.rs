//! Settlement
//!
//! Called from the payment webhook with either side of a matched pair.
//! Repeated deliveries for a pair that is already FILLED are accepted
//! without touching anything.

use std::sync::Arc;

use kernel::id::OrderId;

use crate::domain::entity::order::Order;
use crate::domain::repository::MarketRepository;
use crate::domain::value_object::order_status::OrderStatus;
use crate::error::{MarketError, MarketResult};

#[derive(Debug, Clone)]
pub struct MatchedPair {
    pub taker: Order,
    pub maker: Order,
}

impl MatchedPair {
    pub fn buyer_id(&self) -> Option<kernel::id::UserId> {
        self.taker.buyer_id
    }
}

pub struct SettleOrderUseCase<R>
where
    R: MarketRepository,
{
    repo: Arc<R>,
}

impl<R> SettleOrderUseCase<R>
where
    R: MarketRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn load_pair(&self, order_id: OrderId) -> MarketResult<MatchedPair> {
        let order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or(MarketError::OrderNotFound)?;
        let counterpart_id = order.matched_order_id.ok_or(MarketError::NotMatched)?;
        let counterpart = self
            .repo
            .find_order(counterpart_id)
            .await?
            .ok_or(MarketError::OrderNotFound)?;

        if order.is_maker_against(&counterpart) {
            Ok(MatchedPair {
                taker: counterpart,
                maker: order,
            })
        } else {
            Ok(MatchedPair {
                taker: order,
                maker: counterpart,
            })
        }
    }

    /// Payment captured: both orders FILLED, share moved to the buyer
    pub async fn settle(&self, order_id: OrderId, payment_reference: &str) -> MarketResult<MatchedPair> {
        let mut pair = self.load_pair(order_id).await?;

        if pair.taker.status == OrderStatus::Filled && pair.maker.status == OrderStatus::Filled {
            tracing::info!(order_id = %order_id, "Order already settled");
            return Ok(pair);
        }
        for order in [&pair.taker, &pair.maker] {
            if order.status != OrderStatus::Pending {
                return Err(MarketError::OrderNotOpen(order.status));
            }
        }

        pair.taker.fill(payment_reference);
        pair.maker.fill(payment_reference);
        self.repo.save_settlement(&pair.taker, &pair.maker).await?;

        tracing::info!(
            taker_id = %pair.taker.id,
            maker_id = %pair.maker.id,
            share_mint = %pair.taker.share_mint,
            buyer_id = ?pair.buyer_id(),
            price = pair.taker.price,
            payment_reference,
            "Trade settled"
        );

        Ok(pair)
    }

    /// Payment failed: drop the taker and put the maker back
    pub async fn release(&self, order_id: OrderId) -> MarketResult<MatchedPair> {
        let mut pair = self.load_pair(order_id).await?;

        if pair.taker.status != OrderStatus::Pending {
            return Err(MarketError::OrderNotOpen(pair.taker.status));
        }

        pair.taker.release(false);
        pair.maker.release(true);
        self.repo.save_release(&pair.taker, &pair.maker).await?;

        tracing::info!(
            taker_id = %pair.taker.id,
            maker_id = %pair.maker.id,
            maker_status = %pair.maker.status,
            "Trade released after failed payment"
        );

        Ok(pair)
    }
}
