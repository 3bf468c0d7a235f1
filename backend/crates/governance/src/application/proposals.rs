//! Proposal Use Cases

use std::sync::Arc;

use auth::AuthUser;
use chrono::{DateTime, Utc};
use kernel::id::{ListingId, ProposalId};
use kernel::page::{Page, Paginated};
use listing::ListingStatus;

use crate::application::config::GovernanceConfig;
use crate::application::load_listing;
use crate::domain::entity::{proposal::Proposal, vote::Tally};
use crate::domain::repository::GovernanceRepository;
use crate::error::{GovernanceError, GovernanceResult};

#[derive(Debug, Clone)]
pub struct NewProposal {
    pub title: String,
    pub description: String,
    pub closes_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProposalWithTally {
    pub proposal: Proposal,
    pub tally: Tally,
}

pub struct CreateProposalUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
    config: Arc<GovernanceConfig>,
}

impl<R> CreateProposalUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<GovernanceConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        actor: &AuthUser,
        listing_id: ListingId,
        input: NewProposal,
    ) -> GovernanceResult<Proposal> {
        let listing = load_listing(self.repo.as_ref(), listing_id, actor).await?;
        if !listing.can_manage(actor) {
            return Err(GovernanceError::NotOwner);
        }
        if listing.status == ListingStatus::Closed {
            return Err(GovernanceError::ListingClosed);
        }

        let now = Utc::now();
        if input.closes_at <= now {
            return Err(GovernanceError::ClosesAtInPast);
        }
        if input.closes_at > now + self.config.max_voting_period {
            return Err(GovernanceError::ClosesAtTooFar {
                max_days: self.config.max_voting_period.num_days(),
            });
        }

        let proposal = Proposal::new(
            listing.id,
            actor.user_id,
            input.title,
            input.description,
            input.closes_at,
        );
        self.repo.create_proposal(&proposal).await?;

        tracing::info!(
            proposal_id = %proposal.id,
            listing_id = %listing.id,
            author_id = %actor.user_id,
            closes_at = %proposal.closes_at,
            "Proposal opened"
        );

        Ok(proposal)
    }
}

pub struct ListProposalsUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> ListProposalsUseCase<R>
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
    ) -> GovernanceResult<Paginated<Proposal>> {
        let listing = load_listing(self.repo.as_ref(), listing_id, actor).await?;
        let page = page.clamped();
        let proposals = self.repo.list_proposals(listing.id, page).await?;
        Ok(Paginated::new(proposals, page))
    }
}

/// Load a proposal whose listing the actor can see
async fn load_proposal<R>(repo: &R, id: ProposalId, actor: &AuthUser) -> GovernanceResult<Proposal>
where
    R: GovernanceRepository + Sync,
{
    let proposal = repo
        .find_proposal(id)
        .await?
        .ok_or(GovernanceError::ProposalNotFound)?;
    load_listing(repo, proposal.listing_id, actor)
        .await
        .map_err(|_| GovernanceError::ProposalNotFound)?;
    Ok(proposal)
}

pub struct GetProposalUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> GetProposalUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &AuthUser, id: ProposalId) -> GovernanceResult<ProposalWithTally> {
        let proposal = load_proposal(self.repo.as_ref(), id, actor).await?;
        let tally = self.repo.tally(proposal.id).await?;
        Ok(ProposalWithTally { proposal, tally })
    }
}

pub struct CloseProposalUseCase<R>
where
    R: GovernanceRepository,
{
    repo: Arc<R>,
}

impl<R> CloseProposalUseCase<R>
where
    R: GovernanceRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Author or admin
    pub async fn execute(&self, actor: &AuthUser, id: ProposalId) -> GovernanceResult<ProposalWithTally> {
        let mut proposal = load_proposal(self.repo.as_ref(), id, actor).await?;
        if !actor.is_admin() && proposal.author_id != actor.user_id {
            return Err(GovernanceError::NotAuthor);
        }

        let tally = self.repo.tally(proposal.id).await?;
        let outcome = proposal.close(&tally)?;
        self.repo.update_proposal_status(&proposal).await?;

        tracing::info!(
            proposal_id = %proposal.id,
            outcome = %outcome,
            for_weight = tally.for_weight,
            against_weight = tally.against_weight,
            "Proposal closed"
        );

        Ok(ProposalWithTally { proposal, tally })
    }
}
