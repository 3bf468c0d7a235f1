//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use kernel::page::Page;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, wallet_address::WalletAddress};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Email / wallet collisions surface as
    /// `AuthError::EmailTaken` / `AuthError::WalletTaken`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_wallet(&self, wallet: &WalletAddress) -> AuthResult<Option<User>>;

    async fn find_by_kyc_reference(&self, reference: &str) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Persist profile, role and KYC fields
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Newest first
    async fn list(&self, page: Page) -> AuthResult<Vec<User>>;
}
