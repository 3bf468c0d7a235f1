//! Governance Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{AppError, ErrorKind, FieldViolation};
use thiserror::Error;

use crate::domain::value_object::proposal_status::ProposalStatus;

pub type GovernanceResult<T> = Result<T, GovernanceError>;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("Listing not found")]
    ListingNotFound,

    #[error("Proposal not found")]
    ProposalNotFound,

    #[error("Only the listing owner or an admin may do this")]
    NotOwner,

    #[error("Only the proposal author or an admin may close it")]
    NotAuthor,

    #[error("Only admins may record payouts")]
    AdminRequired,

    #[error("Identity verification (KYC) is required")]
    KycRequired,

    #[error("Only holders of this listing's shares may vote")]
    NoShares,

    #[error("Voting on this proposal has closed")]
    VotingClosed,

    #[error("You have already voted on this proposal")]
    AlreadyVoted,

    #[error("Proposal is already {0}")]
    AlreadyClosed(ProposalStatus),

    #[error("Listing is closed")]
    ListingClosed,

    #[error("closesAt must be in the future")]
    ClosesAtInPast,

    #[error("closesAt must be within {max_days} days")]
    ClosesAtTooFar { max_days: i64 },

    #[error("Unknown {field} value {value:?}")]
    UnknownCode { field: &'static str, value: String },

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernanceError::ListingNotFound | GovernanceError::ProposalNotFound => {
                ErrorKind::NotFound
            }
            GovernanceError::NotOwner
            | GovernanceError::NotAuthor
            | GovernanceError::AdminRequired
            | GovernanceError::KycRequired
            | GovernanceError::NoShares => ErrorKind::Forbidden,
            GovernanceError::VotingClosed
            | GovernanceError::AlreadyVoted
            | GovernanceError::AlreadyClosed(_)
            | GovernanceError::ListingClosed => ErrorKind::Conflict,
            GovernanceError::ClosesAtInPast
            | GovernanceError::ClosesAtTooFar { .. }
            | GovernanceError::UnknownCode { .. } => ErrorKind::BadRequest,
            GovernanceError::App(e) => e.kind(),
            GovernanceError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            GovernanceError::App(e) => e,
            GovernanceError::Database(e) => AppError::from(e),
            GovernanceError::KycRequired => AppError::forbidden(self.to_string())
                .with_action("Complete identity verification and try again"),
            GovernanceError::ClosesAtInPast | GovernanceError::ClosesAtTooFar { .. } => {
                AppError::validation(vec![FieldViolation::new("closesAt", self.to_string())])
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            GovernanceError::Database(e) => {
                tracing::error!(error = %e, "Governance database error");
            }
            GovernanceError::App(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Governance error");
            }
            GovernanceError::NotOwner
            | GovernanceError::NotAuthor
            | GovernanceError::AdminRequired => {
                tracing::warn!(error = %self, "Governance permission check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Governance error");
            }
        }
    }
}

impl IntoResponse for GovernanceError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
