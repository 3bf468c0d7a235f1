//! Webhook Error Types

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::error::{AppError, ErrorKind};
use market::MarketError;
use thiserror::Error;

pub type WebhookResult<T> = Result<T, WebhookError>;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// No secret configured for this source
    #[error("{0} webhook is not configured")]
    NotConfigured(&'static str),

    #[error("Invalid webhook credentials")]
    InvalidSignature,

    #[error("Webhook timestamp is outside the tolerance window")]
    StaleTimestamp,

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("Either userId or reference is required")]
    MissingTarget,

    #[error("Unknown user")]
    UnknownUser,

    #[error("Unknown KYC status {0:?}")]
    UnknownStatus(String),

    #[error("Invalid {field}: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WebhookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebhookError::NotConfigured(_)
            | WebhookError::InvalidSignature
            | WebhookError::StaleTimestamp => ErrorKind::Unauthorized,
            WebhookError::MalformedPayload(_)
            | WebhookError::MissingTarget
            | WebhookError::UnknownUser
            | WebhookError::UnknownStatus(_)
            | WebhookError::InvalidId { .. } => ErrorKind::BadRequest,
            WebhookError::Market(e) => e.kind(),
            WebhookError::Auth(e) => e.kind(),
            WebhookError::App(e) => e.kind(),
            WebhookError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            WebhookError::Market(e) => e.into_app_error(),
            WebhookError::Auth(e) => e.into_app_error(),
            WebhookError::App(e) => e,
            WebhookError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            WebhookError::Database(e) => {
                tracing::error!(error = %e, "Webhook database error");
            }
            WebhookError::NotConfigured(source) => {
                tracing::error!(source = %source, "Webhook secret missing, rejecting delivery");
            }
            WebhookError::InvalidSignature | WebhookError::StaleTimestamp => {
                tracing::warn!(error = %self, "Webhook authentication failed");
            }
            WebhookError::Market(e) => e.log(),
            WebhookError::Auth(e) => e.log(),
            WebhookError::App(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Webhook error");
            }
            _ => {
                tracing::debug!(error = %self, "Webhook rejected");
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
