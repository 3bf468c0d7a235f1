//! Domain Layer

pub mod event;
pub mod repository;
pub mod signature;

pub use event::{
    ChainEvent, EnhancedTransaction, KycEvent, ShareTransfer, StripeAction, StripeEvent,
};
pub use repository::ChainEventRepository;
