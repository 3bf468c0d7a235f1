//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::GovernanceAppState;
pub use router::{governance_router, governance_router_generic};
