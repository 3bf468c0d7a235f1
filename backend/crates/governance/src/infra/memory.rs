//! In-memory governance repository for tests and tooling

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use kernel::id::{ListingId, ProposalId, UserId};
use kernel::page::Page;
use listing::ListingStatus;

use crate::domain::entity::{
    governed_listing::GovernedListing,
    payout::{Entitlement, HolderPayout, Payout},
    proposal::Proposal,
    vote::{Tally, Vote},
};
use crate::domain::repository::GovernanceRepository;
use crate::domain::value_object::proposal_status::ProposalStatus;
use crate::error::{GovernanceError, GovernanceResult};

#[derive(Default)]
struct Tables {
    listings: Vec<GovernedListing>,
    /// One entry per held share token
    shares: Vec<(ListingId, UserId)>,
    verified_users: HashSet<UserId>,
    proposals: Vec<Proposal>,
    votes: Vec<Vote>,
    payouts: Vec<Payout>,
    entitlements: Vec<Entitlement>,
}

#[derive(Default)]
pub struct InMemoryGovernanceRepository {
    tables: Mutex<Tables>,
}

impl InMemoryGovernanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listing(&self, listing: GovernedListing) {
        self.lock().listings.push(listing);
    }

    pub fn grant_shares(&self, listing_id: ListingId, holder: UserId, count: usize) {
        let mut tables = self.lock();
        for _ in 0..count {
            tables.shares.push((listing_id, holder));
        }
    }

    pub fn verify_kyc(&self, user_id: UserId) {
        self.lock().verified_users.insert(user_id);
    }

    pub fn listing_status(&self, id: ListingId) -> Option<ListingStatus> {
        self.lock()
            .listings
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.status)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl GovernanceRepository for InMemoryGovernanceRepository {
    async fn find_listing(&self, id: ListingId) -> GovernanceResult<Option<GovernedListing>> {
        Ok(self.lock().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn is_kyc_verified(&self, user_id: UserId) -> GovernanceResult<bool> {
        Ok(self.lock().verified_users.contains(&user_id))
    }

    async fn shares_held(&self, listing_id: ListingId, user_id: UserId) -> GovernanceResult<i64> {
        Ok(self
            .lock()
            .shares
            .iter()
            .filter(|&&(l, u)| l == listing_id && u == user_id)
            .count() as i64)
    }

    async fn holdings(&self, listing_id: ListingId) -> GovernanceResult<Vec<(UserId, i64)>> {
        let mut counts: HashMap<UserId, i64> = HashMap::new();
        for &(l, holder) in self.lock().shares.iter() {
            if l == listing_id {
                *counts.entry(holder).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn create_proposal(&self, proposal: &Proposal) -> GovernanceResult<()> {
        self.lock().proposals.push(proposal.clone());
        Ok(())
    }

    async fn find_proposal(&self, id: ProposalId) -> GovernanceResult<Option<Proposal>> {
        Ok(self.lock().proposals.iter().find(|p| p.id == id).cloned())
    }

    async fn list_proposals(
        &self,
        listing_id: ListingId,
        page: Page,
    ) -> GovernanceResult<Vec<Proposal>> {
        let mut proposals: Vec<Proposal> = self
            .lock()
            .proposals
            .iter()
            .filter(|p| p.listing_id == listing_id)
            .cloned()
            .collect();
        proposals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&proposals))
    }

    async fn update_proposal_status(&self, proposal: &Proposal) -> GovernanceResult<()> {
        let mut tables = self.lock();
        let slot = tables
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal.id)
            .ok_or(GovernanceError::ProposalNotFound)?;
        if slot.status != ProposalStatus::Open {
            return Err(GovernanceError::AlreadyClosed(slot.status));
        }
        slot.status = proposal.status;
        Ok(())
    }

    async fn create_vote(&self, vote: &Vote) -> GovernanceResult<()> {
        let mut tables = self.lock();
        if tables
            .votes
            .iter()
            .any(|v| v.proposal_id == vote.proposal_id && v.voter_id == vote.voter_id)
        {
            return Err(GovernanceError::AlreadyVoted);
        }
        tables.votes.push(vote.clone());
        Ok(())
    }

    async fn tally(&self, proposal_id: ProposalId) -> GovernanceResult<Tally> {
        let tables = self.lock();
        Ok(Tally::from_votes(
            tables.votes.iter().filter(|v| v.proposal_id == proposal_id),
        ))
    }

    async fn create_payout(
        &self,
        payout: &Payout,
        entitlements: &[Entitlement],
        close_listing: bool,
    ) -> GovernanceResult<()> {
        let mut tables = self.lock();
        if close_listing {
            let listing = tables
                .listings
                .iter_mut()
                .find(|l| l.id == payout.listing_id)
                .ok_or(GovernanceError::ListingNotFound)?;
            if listing.status == ListingStatus::Closed {
                return Err(GovernanceError::ListingClosed);
            }
            listing.status = ListingStatus::Closed;
        }
        tables.payouts.push(payout.clone());
        tables.entitlements.extend_from_slice(entitlements);
        Ok(())
    }

    async fn list_payouts(&self, listing_id: ListingId, page: Page) -> GovernanceResult<Vec<Payout>> {
        let mut payouts: Vec<Payout> = self
            .lock()
            .payouts
            .iter()
            .filter(|p| p.listing_id == listing_id)
            .cloned()
            .collect();
        payouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&payouts))
    }

    async fn payouts_of(&self, user_id: UserId, page: Page) -> GovernanceResult<Vec<HolderPayout>> {
        let tables = self.lock();
        let mut mine: Vec<HolderPayout> = tables
            .entitlements
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter_map(|e| {
                let payout = tables.payouts.iter().find(|p| p.id == e.payout_id)?;
                Some(HolderPayout {
                    payout_id: payout.id,
                    listing_id: payout.listing_id,
                    reason: payout.reason,
                    shares_held: e.shares_held,
                    amount: e.amount,
                    created_at: payout.created_at,
                })
            })
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&mine))
    }
}
