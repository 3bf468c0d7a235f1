//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMarketRepository;
pub use postgres::PgMarketRepository;
