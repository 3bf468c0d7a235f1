//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use repository::UserRepository;
pub use value_object::{
    email::Email, kyc_status::KycStatus, user_role::UserRole, wallet_address::WalletAddress,
};
