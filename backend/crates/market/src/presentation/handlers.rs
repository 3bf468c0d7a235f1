//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use auth::AuthUser;
use kernel::page::{Page, Paginated};
use kernel::validation::{QueryParams, ValidatedJson};
use std::sync::Arc;

use crate::application::config::MarketConfig;
use crate::application::{
    BuyShareUseCase, CancelOrderUseCase, ListOrdersUseCase, ListShareUseCase, MyOrdersUseCase,
    SellShareUseCase,
};
use crate::domain::repository::{MarketRepository, OrderFilter};
use crate::domain::value_object::order_status::OrderStatus;
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    CancelOrderRequest, ListShareRequest, OrderQuery, OrderResponse, TradeRequest,
};

/// Shared state for marketplace handlers
pub struct MarketAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<MarketConfig>,
}

impl<R> Clone for MarketAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /marketplace/list
pub async fn list_share<R>(
    State(state): State<MarketAppState<R>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ListShareRequest>,
) -> MarketResult<(StatusCode, Json<OrderResponse>)>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let order = ListShareUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&auth, req.share_mint.trim(), req.price)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// POST /marketplace/buy
pub async fn buy_share<R>(
    State(state): State<MarketAppState<R>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TradeRequest>,
) -> MarketResult<(StatusCode, Json<OrderResponse>)>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let order = BuyShareUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&auth, req.share_mint.trim(), req.price)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// POST /marketplace/sell
pub async fn sell_share<R>(
    State(state): State<MarketAppState<R>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TradeRequest>,
) -> MarketResult<(StatusCode, Json<OrderResponse>)>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let order = SellShareUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&auth, req.share_mint.trim(), req.price)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// POST /marketplace/cancel
pub async fn cancel_order<R>(
    State(state): State<MarketAppState<R>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CancelOrderRequest>,
) -> MarketResult<Json<OrderResponse>>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let order = CancelOrderUseCase::new(state.repo.clone())
        .execute(&auth, req.order_id)
        .await?;
    Ok(Json(order.into()))
}

/// GET /marketplace/orders
pub async fn list_orders<R>(
    State(state): State<MarketAppState<R>>,
    _auth: AuthUser,
    QueryParams(page): QueryParams<Page>,
    QueryParams(query): QueryParams<OrderQuery>,
) -> MarketResult<Json<Paginated<OrderResponse>>>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let status = query
        .status
        .map(|code| {
            OrderStatus::from_code(&code).ok_or(MarketError::UnknownCode {
                field: "status",
                value: code,
            })
        })
        .transpose()?;
    let filter = OrderFilter {
        share_mint: query.share_mint.filter(|m| !m.trim().is_empty()),
        status,
    };
    let orders = ListOrdersUseCase::new(state.repo.clone())
        .execute(filter, page)
        .await?;
    Ok(Json(orders.map(OrderResponse::from)))
}

/// GET /marketplace/orders/mine
pub async fn my_orders<R>(
    State(state): State<MarketAppState<R>>,
    auth: AuthUser,
    QueryParams(page): QueryParams<Page>,
) -> MarketResult<Json<Paginated<OrderResponse>>>
where
    R: MarketRepository + Send + Sync + 'static,
{
    let orders = MyOrdersUseCase::new(state.repo.clone())
        .execute(&auth, page)
        .await?;
    Ok(Json(orders.map(OrderResponse::from)))
}
