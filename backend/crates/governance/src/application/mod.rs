//! Application Layer

pub mod config;
pub mod payouts;
pub mod proposals;
pub mod votes;

pub use config::GovernanceConfig;
pub use payouts::{CreatePayoutUseCase, ListPayoutsUseCase, MyPayoutsUseCase, PayoutOutcome};
pub use proposals::{
    CloseProposalUseCase, CreateProposalUseCase, GetProposalUseCase, ListProposalsUseCase,
    NewProposal, ProposalWithTally,
};
pub use votes::CastVoteUseCase;

use auth::AuthUser;
use kernel::id::ListingId;

use crate::domain::entity::governed_listing::GovernedListing;
use crate::domain::repository::GovernanceRepository;
use crate::error::{GovernanceError, GovernanceResult};

/// Same visibility as the listing itself: hidden listings answer 404
pub(crate) async fn load_listing<R>(
    repo: &R,
    id: ListingId,
    actor: &AuthUser,
) -> GovernanceResult<GovernedListing>
where
    R: GovernanceRepository + Sync,
{
    repo.find_listing(id)
        .await?
        .filter(|listing| listing.is_visible_to(actor))
        .ok_or(GovernanceError::ListingNotFound)
}
