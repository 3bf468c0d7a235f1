//! PostgreSQL chain event log

use sqlx::PgPool;

use crate::domain::event::{ChainEvent, ShareTransfer};
use crate::domain::repository::ChainEventRepository;
use crate::error::WebhookResult;

#[derive(Clone)]
pub struct PgChainEventRepository {
    pool: PgPool,
}

impl PgChainEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChainEventRepository for PgChainEventRepository {
    async fn apply_chain_event(
        &self,
        event: &ChainEvent,
        transfers: &[ShareTransfer],
    ) -> WebhookResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO chain_events (signature, kind, payload)
            VALUES ($1, $2, $3)
            ON CONFLICT (signature) DO NOTHING
            "#,
        )
        .bind(&event.signature)
        .bind(&event.kind)
        .bind(&event.payload)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let mut moved = 0;
        for transfer in transfers {
            // 未登録のミントやウォレットは 0 行更新で終わる
            moved += sqlx::query(
                r#"
                UPDATE share_tokens
                SET owner_id = u.id, updated_at = NOW()
                FROM users u
                WHERE share_tokens.mint_address = $1
                  AND u.wallet_address = $2
                  AND share_tokens.owner_id IS DISTINCT FROM u.id
                "#,
            )
            .bind(&transfer.mint)
            .bind(&transfer.to_wallet)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(Some(moved))
    }
}
