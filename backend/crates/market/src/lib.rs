//! Market Backend Module
//!
//! Secondary market for share tokens.
//! - `domain/` - `Order`, order type/status, the share view, repository trait
//! - `application/` - list/buy/sell/cancel, queries, settlement
//! - `infra/` - Postgres and in-memory order books
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Matching
//! A LIST or BUY bid rests on the book as the maker. A BUY against the LIST,
//! or a SELL into the best bid, is the taker; both sides wait in PENDING
//! until the payment webhook calls [`SettleOrderUseCase`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::{MarketConfig, MatchedPair, SettleOrderUseCase};
pub use domain::{MarketRepository, Order, OrderStatus, OrderType};
pub use error::{MarketError, MarketResult};
pub use infra::{InMemoryMarketRepository, PgMarketRepository};
pub use presentation::{market_router, market_router_generic};
