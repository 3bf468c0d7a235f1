//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryChainEventRepository;
pub use postgres::PgChainEventRepository;
