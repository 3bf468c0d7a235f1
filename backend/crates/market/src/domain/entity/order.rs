//! Marketplace order
//!
//! A trade always pairs a maker (an OPEN LIST or BUY bid) with a taker (a
//! BUY against the LIST, or a SELL into the bid). Both sides sit in PENDING
//! until the payment webhook settles or releases them.

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, UserId};

use crate::domain::value_object::{order_status::OrderStatus, order_type::OrderType};
use crate::error::{MarketError, MarketResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub order_type: OrderType,
    pub share_mint: String,
    pub seller_id: UserId,
    pub buyer_id: Option<UserId>,
    /// Cents
    pub price: i64,
    pub status: OrderStatus,
    pub matched_order_id: Option<OrderId>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    fn open(
        order_type: OrderType,
        share_mint: String,
        seller_id: UserId,
        buyer_id: Option<UserId>,
        price: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            order_type,
            share_mint,
            seller_id,
            buyer_id,
            price,
            status: OrderStatus::Open,
            matched_order_id: None,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ask from the current holder
    pub fn list(seller_id: UserId, share_mint: String, price: i64) -> Self {
        Self::open(OrderType::List, share_mint, seller_id, None, price)
    }

    /// Standing bid on a share held by `holder`
    pub fn bid(buyer_id: UserId, holder: UserId, share_mint: String, price: i64) -> Self {
        Self::open(OrderType::Buy, share_mint, holder, Some(buyer_id), price)
    }

    /// BUY at the list price, matched to `list`
    pub fn take_list(list: &mut Order, buyer_id: UserId) -> MarketResult<Self> {
        list.ensure_open()?;
        let mut buy = Self::open(
            OrderType::Buy,
            list.share_mint.clone(),
            list.seller_id,
            Some(buyer_id),
            list.price,
        );
        buy.pair_with(list);
        list.buyer_id = Some(buyer_id);
        Ok(buy)
    }

    /// SELL at the bid price, matched to `bid`
    pub fn take_bid(bid: &mut Order, seller_id: UserId) -> MarketResult<Self> {
        bid.ensure_open()?;
        let mut sell = Self::open(
            OrderType::Sell,
            bid.share_mint.clone(),
            seller_id,
            bid.buyer_id,
            bid.price,
        );
        sell.pair_with(bid);
        bid.seller_id = seller_id;
        Ok(sell)
    }

    fn pair_with(&mut self, maker: &mut Order) {
        let now = Utc::now();
        self.status = OrderStatus::Pending;
        self.matched_order_id = Some(maker.id);
        maker.status = OrderStatus::Pending;
        maker.matched_order_id = Some(self.id);
        maker.updated_at = now;
        self.updated_at = now;
    }

    /// Seller for LIST/SELL, buyer for BUY
    pub fn placed_by(&self) -> Option<UserId> {
        match self.order_type {
            OrderType::List | OrderType::Sell => Some(self.seller_id),
            OrderType::Buy => self.buyer_id,
        }
    }

    /// LIST, or a BUY bid that a SELL took
    pub fn is_maker_against(&self, other: &Order) -> bool {
        match self.order_type {
            OrderType::List => true,
            OrderType::Buy => other.order_type == OrderType::Sell,
            OrderType::Sell => false,
        }
    }

    pub fn ensure_open(&self) -> MarketResult<()> {
        if self.status == OrderStatus::Open {
            Ok(())
        } else {
            Err(MarketError::OrderNotOpen(self.status))
        }
    }

    pub fn cancel(&mut self, actor: UserId) -> MarketResult<()> {
        if self.placed_by() != Some(actor) {
            return Err(MarketError::NotOrderOwner);
        }
        self.ensure_open()?;
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn fill(&mut self, payment_reference: &str) {
        self.status = OrderStatus::Filled;
        self.payment_reference = Some(payment_reference.to_string());
        self.updated_at = Utc::now();
    }

    /// Payment failed: the taker is dropped, a LIST goes back on the book
    /// and a bid is withdrawn.
    pub fn release(&mut self, as_maker: bool) {
        if as_maker && self.order_type == OrderType::List {
            self.status = OrderStatus::Open;
            self.buyer_id = None;
            self.matched_order_id = None;
        } else {
            self.status = OrderStatus::Cancelled;
        }
        self.updated_at = Utc::now();
    }
}
