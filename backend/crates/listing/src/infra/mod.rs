//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryListingRepository;
pub use postgres::PgListingRepository;
