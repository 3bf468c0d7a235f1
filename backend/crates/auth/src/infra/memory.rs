//! In-memory user repository
//!
//! Mirrors the unique constraints of the `users` table. Used by the HTTP
//! contract tests and by other contexts' tests that need real users.

use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::UserId;
use kernel::page::Page;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, wallet_address::WalletAddress};
use crate::error::{AuthError, AuthResult};

/// Clones share the same table
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.lock().iter().find(|u| pred(u)).cloned()
    }

    fn check_unique(users: &[User], user: &User) -> AuthResult<()> {
        for other in users.iter().filter(|u| u.id != user.id) {
            if other.email == user.email {
                return Err(AuthError::EmailTaken);
            }
            if user.wallet_address.is_some() && other.wallet_address == user.wallet_address {
                return Err(AuthError::WalletTaken);
            }
        }
        Ok(())
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.lock();
        Self::check_unique(&users, user)?;
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.find(|u| &u.email == email))
    }

    async fn find_by_wallet(&self, wallet: &WalletAddress) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.wallet_address.as_ref() == Some(wallet)))
    }

    async fn find_by_kyc_reference(&self, reference: &str) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.kyc_reference.as_deref() == Some(reference)))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.lock().iter().any(|u| &u.email == email))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.lock();
        Self::check_unique(&users, user)?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AuthError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn list(&self, page: Page) -> AuthResult<Vec<User>> {
        let mut users = self.lock().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(&users))
    }
}
