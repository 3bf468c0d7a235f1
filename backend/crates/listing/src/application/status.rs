//! Listing Status Use Case
//!
//! Approval (PENDING -> LIVE) is the only transition with a side effect: it
//! enqueues the share minting job. The job is queued before the new status is
//! stored, so a failed enqueue leaves the listing PENDING and approvable.

use std::sync::Arc;

use auth::AuthUser;
use jobs::JobQueue;
use kernel::id::ListingId;

use crate::application::config::{ListingConfig, MINT_LISTING_SHARES};
use crate::application::load_visible;
use crate::application::mint_shares::MintSharesPayload;
use crate::domain::entity::listing::Listing;
use crate::domain::repository::ListingRepository;
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::ListingResult;

pub struct ChangeStatusUseCase<R, Q>
where
    R: ListingRepository,
    Q: JobQueue,
{
    repo: Arc<R>,
    queue: Arc<Q>,
    config: Arc<ListingConfig>,
}

impl<R, Q> ChangeStatusUseCase<R, Q>
where
    R: ListingRepository + Sync,
    Q: JobQueue + Sync,
{
    pub fn new(repo: Arc<R>, queue: Arc<Q>, config: Arc<ListingConfig>) -> Self {
        Self {
            repo,
            queue,
            config,
        }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        id: ListingId,
        to: ListingStatus,
    ) -> ListingResult<Listing> {
        let mut listing = load_visible(self.repo.as_ref(), id, actor).await?;
        listing.ensure_manageable(actor)?;

        let from = listing.status;
        listing.transition(to, actor)?;

        // 先にジョブを積む。状態更新が失敗してもジョブは PENDING を見て再試行する
        if from == ListingStatus::Pending && to == ListingStatus::Live {
            let payload = serde_json::to_value(MintSharesPayload {
                listing_id: listing.id,
            })
            .map_err(kernel::error::AppError::from)?;
            let job_id = self
                .queue
                .enqueue(MINT_LISTING_SHARES, payload, self.config.mint_max_attempts)
                .await?;
            tracing::info!(listing_id = %listing.id, job_id = %job_id, "Share minting queued");
        }

        self.repo.update(&listing).await?;

        tracing::info!(
            listing_id = %listing.id,
            actor_id = %actor.user_id,
            from = %from,
            to = %to,
            "Listing status changed"
        );

        Ok(listing)
    }
}
