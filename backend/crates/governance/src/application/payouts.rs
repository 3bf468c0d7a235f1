//! Payout Use Cases

use std::sync::Arc;

use auth::AuthUser;
use kernel::id::ListingId;
use kernel::page::{Page, Paginated};
use listing::ListingStatus;

use crate::application::load_listing;
use crate::domain::entity::payout::{Entitlement, HolderPayout, Payout};
use crate::domain::repository::GovernanceRepository;
use crate::domain::value_object::payout_reason::PayoutReason;
use crate::error::{GovernanceError, GovernanceResult};

#[derive(Debug, Clone)]
pub struct PayoutOutcome {
    pub payout: Payout,
    pub entitlements: Vec<Entitlement>,
}

pub struct CreatePayoutUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> CreatePayoutUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Admin only. A BUYOUT also closes the listing.
    pub async fn execute(
        &self,
        actor: &AuthUser,
        listing_id: ListingId,
        amount: i64,
        reason: PayoutReason,
    ) -> GovernanceResult<PayoutOutcome> {
        if !actor.is_admin() {
            return Err(GovernanceError::AdminRequired);
        }
        let listing = load_listing(self.repo.as_ref(), listing_id, actor).await?;
        if listing.status == ListingStatus::Closed {
            return Err(GovernanceError::ListingClosed);
        }

        let holdings = self.repo.holdings(listing.id).await?;
        let (payout, entitlements) = Payout::distribute(
            listing.id,
            amount,
            reason,
            actor.user_id,
            &holdings,
            i64::from(listing.total_shares),
        );
        self.repo
            .create_payout(&payout, &entitlements, reason.closes_listing())
            .await?;

        tracing::info!(
            payout_id = %payout.id,
            listing_id = %listing.id,
            reason = %reason,
            amount,
            holders = entitlements.len(),
            undistributed = payout.undistributed,
            "Payout recorded"
        );
        if reason.closes_listing() {
            tracing::info!(listing_id = %listing.id, "Listing closed by buyout");
        }

        Ok(PayoutOutcome {
            payout,
            entitlements,
        })
    }
}

pub struct ListPayoutsUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> ListPayoutsUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        listing_id: ListingId,
        page: Page,
    ) -> GovernanceResult<Paginated<Payout>> {
        let listing = load_listing(self.repo.as_ref(), listing_id, actor).await?;
        let page = page.clamped();
        let payouts = self.repo.list_payouts(listing.id, page).await?;
        Ok(Paginated::new(payouts, page))
    }
}

pub struct MyPayoutsUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> MyPayoutsUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        page: Page,
    ) -> GovernanceResult<Paginated<HolderPayout>> {
        let page = page.clamped();
        let payouts = self.repo.payouts_of(actor.user_id, page).await?;
        Ok(Paginated::new(payouts, page))
    }
}
