//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryGovernanceRepository;
pub use postgres::PgGovernanceRepository;
