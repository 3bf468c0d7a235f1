//! Cast Vote Use Case

use std::sync::Arc;

use auth::AuthUser;
use chrono::Utc;
use kernel::id::ProposalId;

use crate::application::load_listing;
use crate::domain::entity::vote::Vote;
use crate::domain::repository::GovernanceRepository;
use crate::domain::value_object::vote_choice::VoteChoice;
use crate::error::{GovernanceError, GovernanceResult};

pub struct CastVoteUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> CastVoteUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Weight is the number of the listing's shares the voter holds right now
    pub async fn execute(
        &self,
        actor: &AuthUser,
        proposal_id: ProposalId,
        choice: VoteChoice,
    ) -> GovernanceResult<Vote> {
        let proposal = self
            .repo
            .find_proposal(proposal_id)
            .await?
            .ok_or(GovernanceError::ProposalNotFound)?;
        load_listing(self.repo.as_ref(), proposal.listing_id, actor)
            .await
            .map_err(|_| GovernanceError::ProposalNotFound)?;

        proposal.ensure_accepting_votes(Utc::now())?;

        if !self.repo.is_kyc_verified(actor.user_id).await? {
            return Err(GovernanceError::KycRequired);
        }
        let weight = self
            .repo
            .shares_held(proposal.listing_id, actor.user_id)
            .await?;
        if weight < 1 {
            return Err(GovernanceError::NoShares);
        }

        let vote = Vote::new(proposal.id, actor.user_id, choice, weight);
        self.repo.create_vote(&vote).await?;

        tracing::info!(
            proposal_id = %proposal.id,
            voter_id = %actor.user_id,
            choice = %choice,
            weight,
            "Vote cast"
        );

        Ok(vote)
    }
}
