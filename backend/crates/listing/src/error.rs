//! Listing Error Types

use axum::response::{IntoResponse, Response};
use chain::ChainError;
use jobs::JobError;
use kernel::error::{AppError, ErrorKind};
use thiserror::Error;

use crate::domain::value_object::listing_status::ListingStatus;

pub type ListingResult<T> = Result<T, ListingError>;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("Document not found")]
    DocumentNotFound,

    #[error("Only the listing owner or an admin may do this")]
    NotOwner,

    #[error("Only listers and admins may create listings")]
    ListerRequired,

    #[error("Identity verification (KYC) is required")]
    KycRequired,

    #[error("Cannot change listing status from {from} to {to}")]
    IllegalTransition { from: ListingStatus, to: ListingStatus },

    #[error("Listing can only be edited while PENDING or PAUSED (currently {0})")]
    NotEditable(ListingStatus),

    #[error("totalShares can only change before shares are minted")]
    SharesLocked,

    #[error("Listing has minted shares and cannot be deleted by its owner")]
    HasMintedShares,

    #[error("Listing has not been approved yet")]
    NotApproved,

    #[error("Unknown {field} value {value:?}")]
    UnknownCode { field: &'static str, value: String },

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Job(#[from] JobError),
}

impl ListingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ListingError::ListingNotFound | ListingError::DocumentNotFound => ErrorKind::NotFound,
            ListingError::NotOwner | ListingError::ListerRequired | ListingError::KycRequired => {
                ErrorKind::Forbidden
            }
            ListingError::IllegalTransition { .. }
            | ListingError::NotEditable(_)
            | ListingError::SharesLocked
            | ListingError::HasMintedShares
            | ListingError::NotApproved => ErrorKind::Conflict,
            ListingError::UnknownCode { .. } => ErrorKind::BadRequest,
            ListingError::App(e) => e.kind(),
            ListingError::Chain(e) => e.kind(),
            ListingError::Job(e) => e.kind(),
            ListingError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            ListingError::App(e) => e,
            ListingError::Database(e) => AppError::from(e),
            ListingError::Chain(e) => AppError::from(e),
            ListingError::Job(e) => AppError::from(e),
            ListingError::KycRequired => AppError::forbidden(self.to_string())
                .with_action("Complete identity verification and try again"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            ListingError::Database(e) => {
                tracing::error!(error = %e, "Listing database error");
            }
            ListingError::Chain(e) => e.log(),
            ListingError::Job(e) => e.log(),
            ListingError::App(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Listing error");
            }
            ListingError::NotOwner => {
                tracing::warn!("Listing ownership check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Listing error");
            }
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
