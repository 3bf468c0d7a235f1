//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{order::Order, share::TradableShare};
pub use repository::{MarketRepository, OrderFilter};
pub use value_object::{order_status::OrderStatus, order_type::OrderType};
