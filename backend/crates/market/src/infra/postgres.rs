//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::AppError;
use kernel::id::{ListingId, OrderId, UserId};
use kernel::page::Page;
use listing::ListingStatus;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{order::Order, share::TradableShare};
use crate::domain::repository::{MarketRepository, OrderFilter};
use crate::domain::value_object::{order_status::OrderStatus, order_type::OrderType};
use crate::error::{MarketError, MarketResult};

const ORDER_COLUMNS: &str = r#"
    id,
    order_type,
    share_mint,
    seller_id,
    buyer_id,
    price,
    status,
    matched_order_id,
    payment_reference,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed order book
#[derive(Clone)]
pub struct PgMarketRepository {
    pool: PgPool,
}

impl PgMarketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Write every mutable column of an order
async fn update_order(tx: &mut Transaction<'_, Postgres>, order: &Order) -> MarketResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE orders SET
            seller_id = $2,
            buyer_id = $3,
            status = $4,
            matched_order_id = $5,
            payment_reference = $6,
            updated_at = $7
        WHERE id = $1
        "#,
    )
    .bind(order.id.as_uuid())
    .bind(order.seller_id.as_uuid())
    .bind(order.buyer_id.map(UserId::into_uuid))
    .bind(order.status.code())
    .bind(order.matched_order_id.map(OrderId::into_uuid))
    .bind(order.payment_reference.as_deref())
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

impl MarketRepository for PgMarketRepository {
    async fn find_share(&self, mint_address: &str) -> MarketResult<Option<TradableShare>> {
        let row = sqlx::query_as::<_, ShareRow>(
            r#"
            SELECT
                s.mint_address,
                s.listing_id,
                s.owner_id,
                l.status AS listing_status
            FROM share_tokens s
            JOIN listings l ON l.id = s.listing_id
            WHERE s.mint_address = $1
            "#,
        )
        .bind(mint_address)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShareRow::into_share).transpose()
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> MarketResult<bool> {
        let verified = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND kyc_status = 'VERIFIED')",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(verified)
    }

    async fn create_order(&self, order: &Order) -> MarketResult<()> {
        insert_order(&self.pool, order).await
    }

    async fn find_order(&self, id: OrderId) -> MarketResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn cancel_order(&self, order: &Order) -> MarketResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 AND status = 'OPEN'",
        )
        .bind(order.id.as_uuid())
        .bind(order.status.code())
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(MarketError::OrderNotOpen(OrderStatus::Pending));
        }
        Ok(())
    }

    async fn open_list(&self, share_mint: &str) -> MarketResult<Option<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE share_mint = $1 AND order_type = 'LIST' AND status = 'OPEN' ORDER BY created_at LIMIT 1"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(share_mint)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn best_bid(
        &self,
        share_mint: &str,
        min_price: Option<i64>,
        exclude: UserId,
    ) -> MarketResult<Option<Order>> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE share_mint = $1
              AND order_type = 'BUY'
              AND status = 'OPEN'
              AND matched_order_id IS NULL
              AND ($2::bigint IS NULL OR price >= $2)
              AND buyer_id <> $3
            ORDER BY price DESC, created_at
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(share_mint)
            .bind(min_price)
            .bind(exclude.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list_orders(&self, filter: &OrderFilter, page: Page) -> MarketResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE ($3::text IS NULL OR share_mint = $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .bind(filter.share_mint.as_deref())
            .bind(filter.status.map(|s| s.code()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn orders_of(&self, user_id: UserId, page: Page) -> MarketResult<Vec<Order>> {
        // 出品・売り注文は seller、買い注文は buyer が発注者
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE (order_type IN ('LIST', 'SELL') AND seller_id = $3)
               OR (order_type = 'BUY' AND buyer_id = $3)
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn save_match(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;

        // 先に取られていないことを確認しつつ maker を PENDING にする
        let taken = sqlx::query(
            r#"
            UPDATE orders SET
                seller_id = $2,
                buyer_id = $3,
                status = $4,
                matched_order_id = $5,
                updated_at = $6
            WHERE id = $1 AND status = 'OPEN'
            "#,
        )
        .bind(maker.id.as_uuid())
        .bind(maker.seller_id.as_uuid())
        .bind(maker.buyer_id.map(UserId::into_uuid))
        .bind(maker.status.code())
        .bind(maker.matched_order_id.map(OrderId::into_uuid))
        .bind(maker.updated_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if taken == 0 {
            tx.rollback().await?;
            return Err(MarketError::OrderNotOpen(OrderStatus::Pending));
        }

        insert_order(&mut *tx, taker).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn save_settlement(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let buyer = taker.buyer_id.ok_or(MarketError::NotMatched)?;
        let mut tx = self.pool.begin().await?;

        update_order(&mut tx, taker).await?;
        update_order(&mut tx, maker).await?;

        let moved = sqlx::query(
            r#"
            UPDATE share_tokens
            SET owner_id = $2, updated_at = now()
            WHERE mint_address = $1 AND owner_id = $3
            "#,
        )
        .bind(&taker.share_mint)
        .bind(buyer.as_uuid())
        .bind(taker.seller_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if moved == 0 {
            tx.rollback().await?;
            return Err(MarketError::SellerChanged);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn save_release(&self, taker: &Order, maker: &Order) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;
        update_order(&mut tx, taker).await?;
        update_order(&mut tx, maker).await?;
        tx.commit().await?;
        Ok(())
    }
}

async fn insert_order<'e, E>(executor: E, order: &Order) -> MarketResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO orders (
            id,
            order_type,
            share_mint,
            seller_id,
            buyer_id,
            price,
            status,
            matched_order_id,
            payment_reference,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(order.id.as_uuid())
    .bind(order.order_type.code())
    .bind(&order.share_mint)
    .bind(order.seller_id.as_uuid())
    .bind(order.buyer_id.map(UserId::into_uuid))
    .bind(order.price)
    .bind(order.status.code())
    .bind(order.matched_order_id.map(OrderId::into_uuid))
    .bind(order.payment_reference.as_deref())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ShareRow {
    mint_address: String,
    listing_id: Uuid,
    owner_id: Option<Uuid>,
    listing_status: String,
}

impl ShareRow {
    fn into_share(self) -> MarketResult<TradableShare> {
        let listing_status = ListingStatus::from_code(&self.listing_status).ok_or_else(|| {
            AppError::internal(format!("Invalid listing status: {}", self.listing_status))
        })?;

        Ok(TradableShare {
            mint_address: self.mint_address,
            listing_id: ListingId::from_uuid(self.listing_id),
            owner_id: self.owner_id.map(UserId::from_uuid),
            listing_status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_type: String,
    share_mint: String,
    seller_id: Uuid,
    buyer_id: Option<Uuid>,
    price: i64,
    status: String,
    matched_order_id: Option<Uuid>,
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> MarketResult<Order> {
        let order_type = OrderType::from_code(&self.order_type).ok_or_else(|| {
            AppError::internal(format!("Invalid order type: {}", self.order_type))
        })?;
        let status = OrderStatus::from_code(&self.status)
            .ok_or_else(|| AppError::internal(format!("Invalid order status: {}", self.status)))?;

        Ok(Order {
            id: OrderId::from_uuid(self.id),
            order_type,
            share_mint: self.share_mint,
            seller_id: UserId::from_uuid(self.seller_id),
            buyer_id: self.buyer_id.map(UserId::from_uuid),
            price: self.price,
            status,
            matched_order_id: self.matched_order_id.map(OrderId::from_uuid),
            payment_reference: self.payment_reference,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
