//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::AuthOutput;
use crate::domain::entity::user::User;
use crate::domain::value_object::{kyc_status::KycStatus, user_role::UserRole};

// ============================================================================
// Register / Login
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8 to 128 characters"))]
    pub password: String,
    #[validate(length(max = 80, message = "displayName must be at most 80 characters"))]
    pub display_name: Option<String>,
    /// INVESTOR or LISTER
    pub role: Option<String>,
    #[validate(length(min = 32, max = 44, message = "walletAddress must be 32 to 44 characters"))]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

impl From<AuthOutput> for AuthResponse {
    fn from(output: AuthOutput) -> Self {
        Self {
            access_token: output.access_token,
            user: output.user.into(),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub wallet_address: Option<String>,
    pub kyc_status: KycStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            display_name: user.display_name,
            role: user.role,
            wallet_address: user.wallet_address.map(|w| w.as_str().to_string()),
            kyc_status: user.kyc_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 80, message = "displayName must be at most 80 characters"))]
    pub display_name: Option<String>,
    #[validate(length(min = 32, max = 44, message = "walletAddress must be 32 to 44 characters"))]
    pub wallet_address: Option<String>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKycRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
}
