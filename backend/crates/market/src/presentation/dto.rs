//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{Order, OrderStatus, OrderType};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListShareRequest {
    #[validate(length(min = 32, max = 44, message = "shareMint must be a base58 address"))]
    pub share_mint: String,
    /// Cents
    #[validate(range(min = 1, message = "price must be a positive amount of cents"))]
    pub price: i64,
}

/// Body of both /marketplace/buy and /marketplace/sell
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    #[validate(length(min = 32, max = 44, message = "shareMint must be a base58 address"))]
    pub share_mint: String,
    #[validate(range(min = 1, message = "price must be a positive amount of cents"))]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: OrderId,
}

/// `?shareMint=&status=` on GET /marketplace/orders
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub share_mint: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub share_mint: String,
    pub seller_id: UserId,
    pub buyer_id: Option<UserId>,
    pub price: i64,
    pub status: OrderStatus,
    pub matched_order_id: Option<OrderId>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_type: order.order_type,
            share_mint: order.share_mint,
            seller_id: order.seller_id,
            buyer_id: order.buyer_id,
            price: order.price,
            status: order.status,
            matched_order_id: order.matched_order_id,
            payment_reference: order.payment_reference,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
