//! KYC provider callbacks

use std::str::FromStr;
use std::sync::Arc;

use auth::application::{KycTarget, UpdateKycUseCase};
use auth::{AuthError, KycStatus, User, UserRepository};
use kernel::id::UserId;

use crate::domain::event::KycEvent;
use crate::error::{WebhookError, WebhookResult};

pub struct ProcessKycUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> ProcessKycUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// `userId` wins over `reference`; the reference is stored either way
    pub async fn execute(&self, event: KycEvent) -> WebhookResult<User> {
        let status = KycStatus::from_provider(&event.status)
            .ok_or_else(|| WebhookError::UnknownStatus(event.status.clone()))?;

        let reference = event
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let target = match event.user_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let id = UserId::from_str(raw).map_err(|_| WebhookError::InvalidId {
                    field: "userId",
                    value: raw.to_string(),
                })?;
                KycTarget::User(id)
            }
            _ => KycTarget::Reference(reference.clone().ok_or(WebhookError::MissingTarget)?),
        };

        UpdateKycUseCase::new(self.users.clone())
            .execute(target, status, reference)
            .await
            .map_err(|e| match e {
                AuthError::UserNotFound => WebhookError::UnknownUser,
                other => WebhookError::Auth(other),
            })
    }
}
