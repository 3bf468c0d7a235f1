//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::AppError;
use kernel::id::{ListingId, PayoutId, ProposalId, UserId};
use kernel::page::Page;
use listing::ListingStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    governed_listing::GovernedListing,
    payout::{Entitlement, HolderPayout, Payout},
    proposal::Proposal,
    vote::{Tally, Vote},
};
use crate::domain::repository::GovernanceRepository;
use crate::domain::value_object::{
    payout_reason::PayoutReason, proposal_status::ProposalStatus,
};
use crate::error::{GovernanceError, GovernanceResult};

const PROPOSAL_COLUMNS: &str =
    "id, listing_id, author_id, title, description, status, closes_at, created_at";

const PAYOUT_COLUMNS: &str =
    "id, listing_id, amount, reason, created_by, undistributed, created_at";

/// PostgreSQL-backed proposals, votes and payouts
#[derive(Clone)]
pub struct PgGovernanceRepository {
    pool: PgPool,
}

impl PgGovernanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GovernanceRepository for PgGovernanceRepository {
    async fn find_listing(&self, id: ListingId) -> GovernanceResult<Option<GovernedListing>> {
        let row = sqlx::query_as::<_, ListingRow>(
            "SELECT id, owner_id, status, total_shares FROM listings WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ListingRow::into_listing).transpose()
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> GovernanceResult<bool> {
        let verified = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND kyc_status = 'VERIFIED')",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(verified)
    }

    async fn shares_held(&self, listing_id: ListingId, user_id: UserId) -> GovernanceResult<i64> {
        let held = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM share_tokens WHERE listing_id = $1 AND owner_id = $2",
        )
        .bind(listing_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(held)
    }

    async fn holdings(&self, listing_id: ListingId) -> GovernanceResult<Vec<(UserId, i64)>> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT owner_id, COUNT(*)
            FROM share_tokens
            WHERE listing_id = $1 AND owner_id IS NOT NULL
            GROUP BY owner_id
            ORDER BY owner_id
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(owner, held)| (UserId::from_uuid(owner), held))
            .collect())
    }

    async fn create_proposal(&self, proposal: &Proposal) -> GovernanceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO proposals (
                id,
                listing_id,
                author_id,
                title,
                description,
                status,
                closes_at,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(proposal.id.as_uuid())
        .bind(proposal.listing_id.as_uuid())
        .bind(proposal.author_id.as_uuid())
        .bind(&proposal.title)
        .bind(&proposal.description)
        .bind(proposal.status.code())
        .bind(proposal.closes_at)
        .bind(proposal.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_proposal(&self, id: ProposalId) -> GovernanceResult<Option<Proposal>> {
        let sql = format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = $1");
        let row = sqlx::query_as::<_, ProposalRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProposalRow::into_proposal).transpose()
    }

    async fn list_proposals(
        &self,
        listing_id: ListingId,
        page: Page,
    ) -> GovernanceResult<Vec<Proposal>> {
        let sql = format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE listing_id = $1 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ProposalRow>(&sql)
            .bind(listing_id.as_uuid())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ProposalRow::into_proposal).collect()
    }

    async fn update_proposal_status(&self, proposal: &Proposal) -> GovernanceResult<()> {
        // OPEN のものだけ閉じる（同時クローズ対策）
        let result = sqlx::query("UPDATE proposals SET status = $2 WHERE id = $1 AND status = 'OPEN'")
            .bind(proposal.id.as_uuid())
            .bind(proposal.status.code())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GovernanceError::AlreadyClosed(proposal.status));
        }
        Ok(())
    }

    async fn create_vote(&self, vote: &Vote) -> GovernanceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO votes (id, proposal_id, voter_id, choice, weight, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(vote.id.as_uuid())
        .bind(vote.proposal_id.as_uuid())
        .bind(vote.voter_id.as_uuid())
        .bind(vote.choice.code())
        .bind(vote.weight)
        .bind(vote.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                GovernanceError::AlreadyVoted
            } else {
                GovernanceError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn tally(&self, proposal_id: ProposalId) -> GovernanceResult<Tally> {
        let (for_weight, against_weight, abstain_weight, voters) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COALESCE(SUM(weight) FILTER (WHERE choice = 'FOR'), 0)::bigint,
                    COALESCE(SUM(weight) FILTER (WHERE choice = 'AGAINST'), 0)::bigint,
                    COALESCE(SUM(weight) FILTER (WHERE choice = 'ABSTAIN'), 0)::bigint,
                    COUNT(*)
                FROM votes
                WHERE proposal_id = $1
                "#,
            )
            .bind(proposal_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(Tally {
            for_weight,
            against_weight,
            abstain_weight,
            voters,
        })
    }

    async fn create_payout(
        &self,
        payout: &Payout,
        entitlements: &[Entitlement],
        close_listing: bool,
    ) -> GovernanceResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO payouts (
                id,
                listing_id,
                amount,
                reason,
                created_by,
                undistributed,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payout.id.as_uuid())
        .bind(payout.listing_id.as_uuid())
        .bind(payout.amount)
        .bind(payout.reason.code())
        .bind(payout.created_by.as_uuid())
        .bind(payout.undistributed)
        .bind(payout.created_at)
        .execute(&mut *tx)
        .await?;

        for entitlement in entitlements {
            sqlx::query(
                r#"
                INSERT INTO payout_entitlements (payout_id, user_id, shares_held, amount)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(entitlement.payout_id.as_uuid())
            .bind(entitlement.user_id.as_uuid())
            .bind(entitlement.shares_held)
            .bind(entitlement.amount)
            .execute(&mut *tx)
            .await?;
        }

        if close_listing {
            let closed = sqlx::query(
                "UPDATE listings SET status = 'CLOSED', updated_at = now() WHERE id = $1 AND status <> 'CLOSED'",
            )
            .bind(payout.listing_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if closed == 0 {
                tx.rollback().await?;
                return Err(GovernanceError::ListingClosed);
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_payouts(&self, listing_id: ListingId, page: Page) -> GovernanceResult<Vec<Payout>> {
        let sql = format!(
            "SELECT {PAYOUT_COLUMNS} FROM payouts WHERE listing_id = $1 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PayoutRow>(&sql)
            .bind(listing_id.as_uuid())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PayoutRow::into_payout).collect()
    }

    async fn payouts_of(&self, user_id: UserId, page: Page) -> GovernanceResult<Vec<HolderPayout>> {
        let rows = sqlx::query_as::<_, HolderPayoutRow>(
            r#"
            SELECT
                p.id AS payout_id,
                p.listing_id,
                p.reason,
                e.shares_held,
                e.amount,
                p.created_at
            FROM payout_entitlements e
            JOIN payouts p ON p.id = e.payout_id
            WHERE e.user_id = $1
            ORDER BY p.created_at DESC, p.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HolderPayoutRow::into_holder_payout).collect()
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn invalid_code(what: &str, code: &str) -> GovernanceError {
    AppError::internal(format!("Invalid {what}: {code}")).into()
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    owner_id: Uuid,
    status: String,
    total_shares: i32,
}

impl ListingRow {
    fn into_listing(self) -> GovernanceResult<GovernedListing> {
        let status = ListingStatus::from_code(&self.status)
            .ok_or_else(|| invalid_code("listing status", &self.status))?;

        Ok(GovernedListing {
            id: ListingId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            status,
            total_shares: self.total_shares,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProposalRow {
    id: Uuid,
    listing_id: Uuid,
    author_id: Uuid,
    title: String,
    description: String,
    status: String,
    closes_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ProposalRow {
    fn into_proposal(self) -> GovernanceResult<Proposal> {
        let status = ProposalStatus::from_code(&self.status)
            .ok_or_else(|| invalid_code("proposal status", &self.status))?;

        Ok(Proposal {
            id: ProposalId::from_uuid(self.id),
            listing_id: ListingId::from_uuid(self.listing_id),
            author_id: UserId::from_uuid(self.author_id),
            title: self.title,
            description: self.description,
            status,
            closes_at: self.closes_at,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PayoutRow {
    id: Uuid,
    listing_id: Uuid,
    amount: i64,
    reason: String,
    created_by: Uuid,
    undistributed: i64,
    created_at: DateTime<Utc>,
}

impl PayoutRow {
    fn into_payout(self) -> GovernanceResult<Payout> {
        let reason = PayoutReason::from_code(&self.reason)
            .ok_or_else(|| invalid_code("payout reason", &self.reason))?;

        Ok(Payout {
            id: PayoutId::from_uuid(self.id),
            listing_id: ListingId::from_uuid(self.listing_id),
            amount: self.amount,
            reason,
            created_by: UserId::from_uuid(self.created_by),
            undistributed: self.undistributed,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HolderPayoutRow {
    payout_id: Uuid,
    listing_id: Uuid,
    reason: String,
    shares_held: i64,
    amount: i64,
    created_at: DateTime<Utc>,
}

impl HolderPayoutRow {
    fn into_holder_payout(self) -> GovernanceResult<HolderPayout> {
        let reason = PayoutReason::from_code(&self.reason)
            .ok_or_else(|| invalid_code("payout reason", &self.reason))?;

        Ok(HolderPayout {
            payout_id: PayoutId::from_uuid(self.payout_id),
            listing_id: ListingId::from_uuid(self.listing_id),
            reason,
            shares_held: self.shares_held,
            amount: self.amount,
            created_at: self.created_at,
        })
    }
}
