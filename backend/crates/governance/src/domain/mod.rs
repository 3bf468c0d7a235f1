//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{
    governed_listing::GovernedListing,
    payout::{Entitlement, HolderPayout, Payout},
    proposal::Proposal,
    vote::{Tally, Vote},
};
pub use repository::GovernanceRepository;
pub use value_object::{
    payout_reason::PayoutReason, proposal_status::ProposalStatus, vote_choice::VoteChoice,
};
