//! Profile Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult};

/// Current user's profile
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Profile update input; `None` leaves the field untouched
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
}

pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(name) = input.display_name {
            let name = name.trim();
            user.set_display_name((!name.is_empty()).then(|| name.to_string()));
        }

        if let Some(raw) = input.wallet_address {
            let wallet = WalletAddress::new(raw)?;
            if let Some(holder) = self.user_repo.find_by_wallet(&wallet).await?
                && holder.id != user.id
            {
                return Err(AuthError::WalletTaken);
            }
            user.set_wallet(wallet);
        }

        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }
}
