//! Auth Middleware
//!
//! Bearer-token guard for protected routes and the [`AuthUser`] extractor
//! the other contexts use to read the caller.
//!
//! Tokens live for days, so when the guard has a [`RoleSource`] the role in
//! the claims is replaced by the stored one on every request. A role change
//! or a deleted account takes effect without waiting for the token to expire.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::jwt::{Claims, TokenCodec, bearer_token};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

pub type RoleFuture<'a> = Pin<Box<dyn Future<Output = AuthResult<Option<UserRole>>> + Send + 'a>>;

/// Current role of a user; `None` when the account no longer exists
pub trait RoleSource: Send + Sync {
    fn current_role(&self, user_id: UserId) -> RoleFuture<'_>;
}

impl<R> RoleSource for R
where
    R: UserRepository + Sync,
{
    fn current_role(&self, user_id: UserId) -> RoleFuture<'_> {
        Box::pin(async move { Ok(self.find_by_id(user_id).await?.map(|u| u.role)) })
    }
}

/// State for [`require_bearer`]
#[derive(Clone)]
pub struct AuthGuard {
    tokens: TokenCodec,
    roles: Option<Arc<dyn RoleSource>>,
}

impl AuthGuard {
    pub fn new(tokens: TokenCodec, roles: Arc<dyn RoleSource>) -> Self {
        Self {
            tokens,
            roles: Some(roles),
        }
    }

    /// Trusts the role in the claims
    pub fn token_only(tokens: TokenCodec) -> Self {
        Self {
            tokens,
            roles: None,
        }
    }

    pub async fn authenticate(&self, token: &str) -> AuthResult<AuthUser> {
        let claims = self.tokens.verify(token)?;
        let mut user = AuthUser::from_claims(claims)?;

        if let Some(roles) = &self.roles {
            let role = roles
                .current_role(user.user_id)
                .await?
                .ok_or(AuthError::InvalidToken)?;
            if role != user.role {
                tracing::debug!(
                    user_id = %user.user_id,
                    token_role = %user.role,
                    role = %role,
                    "Role changed since token was issued"
                );
                user.role = role;
            }
        }

        Ok(user)
    }
}

impl From<TokenCodec> for AuthGuard {
    fn from(tokens: TokenCodec) -> Self {
        Self::token_only(tokens)
    }
}

/// Authenticated caller, decoded from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub email: String,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> AuthResult<Self> {
        let user_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role = UserRole::from_code(&claims.role).ok_or(AuthError::InvalidToken)?;
        Ok(Self {
            user_id,
            role,
            email: claims.email,
        })
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 403 unless the caller has one of `allowed`
    pub fn ensure_role(&self, allowed: &[UserRole]) -> AuthResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Middleware that requires a valid bearer token
///
/// Install with `axum::middleware::from_fn_with_state(guard, require_bearer)`.
pub async fn require_bearer(
    State(guard): State<AuthGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
    let user = guard.authenticate(token).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
