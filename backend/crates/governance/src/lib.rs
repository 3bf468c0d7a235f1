//! Governance Backend Module
//!
//! Holder voting and payouts per listing.
//! - `domain/` - `Proposal`, `Vote`/`Tally`, `Payout` distribution, repository trait
//! - `application/` - proposal, vote and payout use cases
//! - `infra/` - Postgres and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Votes weigh as many as the shares the voter holds when casting. Payouts
//! are split by shares held over the listing's total shares.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::GovernanceConfig;
pub use domain::{GovernanceRepository, Payout, PayoutReason, Proposal, ProposalStatus, VoteChoice};
pub use error::{GovernanceError, GovernanceResult};
pub use infra::{InMemoryGovernanceRepository, PgGovernanceRepository};
pub use presentation::{governance_router, governance_router_generic};
