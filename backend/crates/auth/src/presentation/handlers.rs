//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::id::markers;
use kernel::page::{Page, Paginated};
use kernel::validation::{PathId, QueryParams, ValidatedJson};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    GetProfileUseCase, KycTarget, ListUsersUseCase, LoginInput, LoginUseCase, RegisterInput,
    RegisterUseCase, SetRoleUseCase, UpdateKycUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{kyc_status::KycStatus, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateKycRequest, UpdateProfileRequest,
    UpdateRoleRequest, UserResponse,
};
use crate::presentation::middleware::AuthUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// derive(Clone) だと R: Clone を要求してしまう
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + Send + Sync + 'static,
{
    let role = req
        .role
        .map(|code| {
            UserRole::from_code(&code).ok_or(AuthError::UnknownCode {
                field: "role",
                value: code,
            })
        })
        .transpose()?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role,
            wallet_address: req.wallet_address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(output.into())))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(output.into()))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /auth/profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(auth.user_id)
        .await?;
    Ok(Json(user.into()))
}

/// POST /auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = UpdateProfileUseCase::new(state.repo.clone())
        .execute(
            auth.user_id,
            UpdateProfileInput {
                display_name: req.display_name,
                wallet_address: req.wallet_address,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /auth/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    QueryParams(page): QueryParams<Page>,
) -> AuthResult<Json<Paginated<UserResponse>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    auth.ensure_role(&[UserRole::Admin])?;

    let users = ListUsersUseCase::new(state.repo.clone())
        .execute(page)
        .await?;
    Ok(Json(users.map(UserResponse::from)))
}

/// POST /auth/users/{id}/kyc
pub async fn update_kyc<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    PathId(user_id): PathId<markers::User>,
    ValidatedJson(req): ValidatedJson<UpdateKycRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    auth.ensure_role(&[UserRole::Admin])?;

    let status = KycStatus::from_code(&req.status).ok_or(AuthError::UnknownCode {
        field: "status",
        value: req.status,
    })?;

    let user = UpdateKycUseCase::new(state.repo.clone())
        .execute(KycTarget::User(user_id), status, req.reference)
        .await?;

    tracing::info!(admin_id = %auth.user_id, user_id = %user.id, "Manual KYC override");

    Ok(Json(user.into()))
}

/// POST /auth/users/{id}/role
pub async fn update_role<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    PathId(user_id): PathId<markers::User>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    auth.ensure_role(&[UserRole::Admin])?;

    let role = UserRole::from_code(&req.role).ok_or(AuthError::UnknownCode {
        field: "role",
        value: req.role,
    })?;

    let user = SetRoleUseCase::new(state.repo.clone())
        .execute(user_id, role)
        .await?;
    Ok(Json(user.into()))
}
