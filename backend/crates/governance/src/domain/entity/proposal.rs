//! Governance proposal

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, ProposalId, UserId};

use crate::domain::entity::vote::Tally;
use crate::domain::value_object::proposal_status::ProposalStatus;
use crate::error::{GovernanceError, GovernanceResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub id: ProposalId,
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub closes_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(
        listing_id: ListingId,
        author_id: UserId,
        title: String,
        description: String,
        closes_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            listing_id,
            author_id,
            title,
            description,
            status: ProposalStatus::Open,
            closes_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_accepting_votes(&self, now: DateTime<Utc>) -> bool {
        self.status == ProposalStatus::Open && now < self.closes_at
    }

    pub fn ensure_accepting_votes(&self, now: DateTime<Utc>) -> GovernanceResult<()> {
        if self.is_accepting_votes(now) {
            Ok(())
        } else {
            Err(GovernanceError::VotingClosed)
        }
    }

    /// PASSED when FOR outweighs AGAINST; abstentions do not count
    pub fn close(&mut self, tally: &Tally) -> GovernanceResult<ProposalStatus> {
        if self.status != ProposalStatus::Open {
            return Err(GovernanceError::AlreadyClosed(self.status));
        }
        self.status = if tally.for_weight > tally.against_weight {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Rejected
        };
        Ok(self.status)
    }
}
