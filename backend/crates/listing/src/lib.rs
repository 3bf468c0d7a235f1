//! Listing Backend Module
//!
//! Land parcels offered as fractional shares.
//! - `domain/` - `Listing`, `ShareToken`, `Document`, status rules, repository traits
//! - `application/` - use cases and the `mint_listing_shares` job handler
//! - `infra/` - Postgres and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Lifecycle
//! PENDING -(admin approves)-> LIVE <-> PAUSED, and CLOSED from anywhere but
//! CLOSED. Approval queues share minting; each share is one NFT whose mint
//! address is a PDA of the share program.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::{ListingConfig, MINT_LISTING_SHARES, MintListingSharesJob};
pub use domain::{Listing, ListingStatus, ShareToken};
pub use error::{ListingError, ListingResult};
pub use infra::{InMemoryListingRepository, PgListingRepository};
pub use presentation::router::{listing_router, listing_router_generic};
