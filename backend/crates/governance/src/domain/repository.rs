//! Repository Traits

use kernel::id::{ListingId, ProposalId, UserId};
use kernel::page::Page;

use crate::domain::entity::{
    governed_listing::GovernedListing,
    payout::{Entitlement, HolderPayout, Payout},
    proposal::Proposal,
    vote::{Tally, Vote},
};
use crate::error::GovernanceResult;

#[trait_variant::make(GovernanceRepository: Send)]
pub trait LocalGovernanceRepository {
    async fn find_listing(&self, id: ListingId) -> GovernanceResult<Option<GovernedListing>>;

    async fn is_kyc_verified(&self, user_id: UserId) -> GovernanceResult<bool>;

    /// Share tokens of the listing currently owned by the user
    async fn shares_held(&self, listing_id: ListingId, user_id: UserId) -> GovernanceResult<i64>;

    /// (holder, shares held) for every holder of the listing
    async fn holdings(&self, listing_id: ListingId) -> GovernanceResult<Vec<(UserId, i64)>>;

    async fn create_proposal(&self, proposal: &Proposal) -> GovernanceResult<()>;

    async fn find_proposal(&self, id: ProposalId) -> GovernanceResult<Option<Proposal>>;

    /// Newest first
    async fn list_proposals(
        &self,
        listing_id: ListingId,
        page: Page,
    ) -> GovernanceResult<Vec<Proposal>>;

    async fn update_proposal_status(&self, proposal: &Proposal) -> GovernanceResult<()>;

    /// `AlreadyVoted` when the voter has a ballot on this proposal
    async fn create_vote(&self, vote: &Vote) -> GovernanceResult<()>;

    async fn tally(&self, proposal_id: ProposalId) -> GovernanceResult<Tally>;

    /// Payout, entitlements and (for a buyout) the listing closure in one
    /// transaction
    async fn create_payout(
        &self,
        payout: &Payout,
        entitlements: &[Entitlement],
        close_listing: bool,
    ) -> GovernanceResult<()>;

    /// Newest first
    async fn list_payouts(&self, listing_id: ListingId, page: Page) -> GovernanceResult<Vec<Payout>>;

    /// Newest first
    async fn payouts_of(&self, user_id: UserId, page: Page) -> GovernanceResult<Vec<HolderPayout>>;
}
