//! Administrative Use Cases
//!
//! User listing plus the manual KYC and role overrides. `UpdateKycUseCase`
//! is shared with the KYC provider webhook.

use std::sync::Arc;

use kernel::id::UserId;
use kernel::page::{Page, Paginated};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{kyc_status::KycStatus, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, page: Page) -> AuthResult<Paginated<User>> {
        let page = page.clamped();
        let users = self.user_repo.list(page).await?;
        Ok(Paginated::new(users, page))
    }
}

/// How a KYC update identifies its user
#[derive(Debug, Clone)]
pub enum KycTarget {
    User(UserId),
    /// Provider-side applicant id stored in `kyc_reference`
    Reference(String),
}

pub struct UpdateKycUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateKycUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        target: KycTarget,
        status: KycStatus,
        reference: Option<String>,
    ) -> AuthResult<User> {
        let user = match &target {
            KycTarget::User(id) => self.user_repo.find_by_id(*id).await?,
            KycTarget::Reference(reference) => {
                self.user_repo.find_by_kyc_reference(reference).await?
            }
        };
        let mut user = user.ok_or(AuthError::UserNotFound)?;

        let previous = user.kyc_status;
        user.set_kyc(status, reference);
        self.user_repo.update(&user).await?;

        tracing::info!(
            user_id = %user.id,
            from = %previous,
            to = %status,
            "KYC status updated"
        );

        Ok(user)
    }
}

pub struct SetRoleUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> SetRoleUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, role: UserRole) -> AuthResult<User> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.set_role(role);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, role = %role, "User role changed");

        Ok(user)
    }
}
