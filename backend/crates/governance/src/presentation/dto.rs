//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, PayoutId, ProposalId, UserId, VoteId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::{NewProposal, PayoutOutcome, ProposalWithTally};
use crate::domain::{
    Entitlement, HolderPayout, Payout, PayoutReason, Proposal, ProposalStatus, Tally, Vote,
    VoteChoice,
};

// ============================================================================
// Proposals
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    #[validate(length(min = 3, max = 200, message = "title must be 3 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "description must be 1 to 10000 characters"))]
    pub description: String,
    pub closes_at: DateTime<Utc>,
}

impl CreateProposalRequest {
    pub fn into_new_proposal(self) -> NewProposal {
        NewProposal {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            closes_at: self.closes_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub id: ProposalId,
    pub listing_id: ListingId,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub closes_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<Tally>,
}

impl From<Proposal> for ProposalResponse {
    fn from(proposal: Proposal) -> Self {
        Self {
            id: proposal.id,
            listing_id: proposal.listing_id,
            author_id: proposal.author_id,
            title: proposal.title,
            description: proposal.description,
            status: proposal.status,
            closes_at: proposal.closes_at,
            created_at: proposal.created_at,
            tally: None,
        }
    }
}

impl From<ProposalWithTally> for ProposalResponse {
    fn from(value: ProposalWithTally) -> Self {
        Self {
            tally: Some(value.tally),
            ..value.proposal.into()
        }
    }
}

// ============================================================================
// Votes
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[validate(length(min = 1, message = "choice is required"))]
    pub choice: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: VoteId,
    pub proposal_id: ProposalId,
    pub voter_id: UserId,
    pub choice: VoteChoice,
    pub weight: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Vote> for VoteResponse {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id,
            proposal_id: vote.proposal_id,
            voter_id: vote.voter_id,
            choice: vote.choice,
            weight: vote.weight,
            created_at: vote.created_at,
        }
    }
}

// ============================================================================
// Payouts
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayoutRequest {
    /// Cents
    #[validate(range(min = 1, message = "amount must be a positive amount of cents"))]
    pub amount: i64,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    pub user_id: UserId,
    pub shares_held: i64,
    pub amount: i64,
}

impl From<Entitlement> for EntitlementResponse {
    fn from(entitlement: Entitlement) -> Self {
        Self {
            user_id: entitlement.user_id,
            shares_held: entitlement.shares_held,
            amount: entitlement.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutResponse {
    pub id: PayoutId,
    pub listing_id: ListingId,
    pub amount: i64,
    pub reason: PayoutReason,
    pub created_by: UserId,
    pub undistributed: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<EntitlementResponse>>,
}

impl From<Payout> for PayoutResponse {
    fn from(payout: Payout) -> Self {
        Self {
            id: payout.id,
            listing_id: payout.listing_id,
            amount: payout.amount,
            reason: payout.reason,
            created_by: payout.created_by,
            undistributed: payout.undistributed,
            created_at: payout.created_at,
            distribution: None,
        }
    }
}

impl From<PayoutOutcome> for PayoutResponse {
    fn from(outcome: PayoutOutcome) -> Self {
        Self {
            distribution: Some(outcome.entitlements.into_iter().map(Into::into).collect()),
            ..outcome.payout.into()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderPayoutResponse {
    pub payout_id: PayoutId,
    pub listing_id: ListingId,
    pub reason: PayoutReason,
    pub shares_held: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl From<HolderPayout> for HolderPayoutResponse {
    fn from(payout: HolderPayout) -> Self {
        Self {
            payout_id: payout.payout_id,
            listing_id: payout.listing_id,
            reason: payout.reason,
            shares_held: payout.shares_held,
            amount: payout.amount,
            created_at: payout.created_at,
        }
    }
}
