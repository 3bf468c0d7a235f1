//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod config;
pub mod login;
pub mod profile;
pub mod register;

// Re-exports
pub use admin::{KycTarget, ListUsersUseCase, SetRoleUseCase, UpdateKycUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use profile::{GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase};
pub use register::{RegisterInput, RegisterUseCase};

use crate::domain::entity::user::User;
use crate::error::AuthResult;

/// Issued token plus the user it was issued for
pub struct AuthOutput {
    pub access_token: String,
    pub user: User,
}

pub(crate) fn issue_token(config: &AuthConfig, user: User) -> AuthResult<AuthOutput> {
    let access_token =
        config
            .tokens
            .issue(&user.id.to_string(), user.role.code(), user.email.as_str())?;
    Ok(AuthOutput { access_token, user })
}
