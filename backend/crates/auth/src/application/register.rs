//! Register Use Case
//!
//! Creates a new account and signs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{AuthOutput, issue_token};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{NewPassword, UserPassword},
    user_role::UserRole,
    wallet_address::WalletAddress,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub wallet_address: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutput> {
        let role = input.role.unwrap_or_default();
        if !role.is_self_assignable() {
            return Err(AuthError::RoleNotAllowed);
        }

        let email = Email::new(input.email)?;
        let wallet = input.wallet_address.map(WalletAddress::new).transpose()?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if let Some(wallet) = &wallet
            && self.user_repo.find_by_wallet(wallet).await?.is_some()
        {
            return Err(AuthError::WalletTaken);
        }

        let password = NewPassword::new(input.password)?;
        let password = UserPassword::from_new(&password, self.config.pepper())?;

        let display_name = input
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let user = User::new(email, password, role, display_name, wallet);

        // 並行登録の取りこぼしは create 側の一意制約で 409 になる
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User registered"
        );

        issue_token(&self.config, user)
    }
}
