//! Share-weighted vote

use chrono::{DateTime, Utc};
use kernel::id::{ProposalId, UserId, VoteId};
use serde::Serialize;

use crate::domain::value_object::vote_choice::VoteChoice;

#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub id: VoteId,
    pub proposal_id: ProposalId,
    pub voter_id: UserId,
    pub choice: VoteChoice,
    /// Shares held when the vote was cast
    pub weight: i64,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(proposal_id: ProposalId, voter_id: UserId, choice: VoteChoice, weight: i64) -> Self {
        Self {
            id: VoteId::new(),
            proposal_id,
            voter_id,
            choice,
            weight,
            created_at: Utc::now(),
        }
    }
}

/// Weight per choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    #[serde(rename = "for")]
    pub for_weight: i64,
    #[serde(rename = "against")]
    pub against_weight: i64,
    #[serde(rename = "abstain")]
    pub abstain_weight: i64,
    pub voters: i64,
}

impl Tally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        votes.into_iter().fold(Tally::default(), |mut tally, vote| {
            match vote.choice {
                VoteChoice::For => tally.for_weight += vote.weight,
                VoteChoice::Against => tally.against_weight += vote.weight,
                VoteChoice::Abstain => tally.abstain_weight += vote.weight,
            }
            tally.voters += 1;
            tally
        })
    }
}
