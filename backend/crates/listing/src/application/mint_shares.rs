//! Share Minting
//!
//! Runs in the job worker after a listing is approved. Every index in
//! `0..total_shares` without a share token is minted and stored, owned by
//! the listing owner. Indexes already stored are skipped, so a retried job
//! picks up where the previous attempt stopped.

use std::collections::HashSet;
use std::sync::Arc;

use chain::{MintRequest, ShareMinter};
use jobs::domain::HandlerFuture;
use jobs::{JobError, JobHandler, parse_payload};
use kernel::id::ListingId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::config::{ListingConfig, MINT_LISTING_SHARES};
use crate::domain::entity::share_token::ShareToken;
use crate::domain::repository::{ListingRepository, ShareRepository};
use crate::domain::value_object::listing_status::ListingStatus;
use crate::error::{ListingError, ListingResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintSharesPayload {
    pub listing_id: ListingId,
}

pub struct MintSharesUseCase<R, M> {
    repo: Arc<R>,
    minter: Arc<M>,
    config: Arc<ListingConfig>,
}

impl<R, M> MintSharesUseCase<R, M>
where
    R: ListingRepository + ShareRepository + Sync,
    M: ShareMinter + Sync,
{
    pub fn new(repo: Arc<R>, minter: Arc<M>, config: Arc<ListingConfig>) -> Self {
        Self {
            repo,
            minter,
            config,
        }
    }

    /// Returns the number of share tokens created by this run
    pub async fn execute(&self, listing_id: ListingId) -> ListingResult<u64> {
        let listing = self
            .repo
            .find_by_id(listing_id)
            .await?
            .ok_or(ListingError::ListingNotFound)?;

        if listing.status == ListingStatus::Pending {
            return Err(ListingError::NotApproved);
        }
        if listing.status == ListingStatus::Closed {
            tracing::info!(listing_id = %listing_id, "Listing closed, skipping share minting");
            return Ok(0);
        }

        let minted: HashSet<i32> = self
            .repo
            .minted_indexes(listing_id)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<i32> = (0..listing.total_shares)
            .filter(|index| !minted.contains(index))
            .collect();

        let mut inserted = 0;
        for chunk in missing.chunks(self.config.mint_batch_size.max(1)) {
            let mut batch = Vec::with_capacity(chunk.len());
            for &index in chunk {
                let request = MintRequest {
                    listing_id: *listing_id.as_uuid(),
                    index: index as u32,
                };
                match self.minter.mint_share(&request).await {
                    Ok(receipt) => {
                        batch.push(ShareToken::minted(
                            listing_id,
                            index,
                            listing.owner_id,
                            receipt,
                        ));
                    }
                    Err(e) => {
                        // ここまでに発行した分は保存してから失敗させる
                        inserted += self.repo.insert_shares(&batch).await?;
                        tracing::warn!(
                            listing_id = %listing_id,
                            index,
                            inserted,
                            error = %e,
                            "Share minting interrupted"
                        );
                        return Err(e.into());
                    }
                }
            }
            inserted += self.repo.insert_shares(&batch).await?;
        }

        tracing::info!(
            listing_id = %listing_id,
            total_shares = listing.total_shares,
            inserted,
            "Share minting finished"
        );

        Ok(inserted)
    }
}

/// `mint_listing_shares` job handler
pub struct MintListingSharesJob<R, M> {
    use_case: MintSharesUseCase<R, M>,
}

impl<R, M> MintListingSharesJob<R, M>
where
    R: ListingRepository + ShareRepository + Sync,
    M: ShareMinter + Sync,
{
    pub fn new(repo: Arc<R>, minter: Arc<M>, config: Arc<ListingConfig>) -> Self {
        Self {
            use_case: MintSharesUseCase::new(repo, minter, config),
        }
    }
}

fn into_job_error(err: ListingError) -> JobError {
    match err {
        ListingError::ListingNotFound => JobError::Permanent(err.to_string()),
        ListingError::Chain(e) if !e.is_retryable() => JobError::Permanent(e.to_string()),
        other => JobError::Failed(other.to_string()),
    }
}

impl<R, M> JobHandler for MintListingSharesJob<R, M>
where
    R: ListingRepository + ShareRepository + Send + Sync,
    M: ShareMinter + Send + Sync,
{
    fn kind(&self) -> &'static str {
        MINT_LISTING_SHARES
    }

    fn run<'a>(&'a self, payload: &'a Value) -> HandlerFuture<'a> {
        Box::pin(async move {
            let payload: MintSharesPayload = parse_payload(payload)?;
            self.use_case
                .execute(payload.listing_id)
                .await
                .map(|_| ())
                .map_err(into_job_error)
        })
    }
}
