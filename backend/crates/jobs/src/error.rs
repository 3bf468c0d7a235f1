//! Job Error Types

use kernel::error::{AppError, ErrorKind};
use thiserror::Error;

pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    /// Transient failure; the worker reschedules with backoff
    #[error("{0}")]
    Failed(String),

    /// Never succeeds on retry (bad payload, unknown kind)
    #[error("{0}")]
    Permanent(String),

    #[error("No handler registered for job kind {0:?}")]
    UnknownKind(String),

    #[error("Job not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl JobError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, JobError::Permanent(_) | JobError::UnknownKind(_))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::NotFound => ErrorKind::NotFound,
            JobError::Database(_) => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::InternalServerError,
        }
    }

    pub fn log(&self) {
        match self {
            JobError::Database(e) => tracing::error!(error = %e, "Job queue database error"),
            JobError::UnknownKind(kind) => tracing::error!(kind = %kind, "Unknown job kind"),
            _ => tracing::warn!(error = %self, "Job failed"),
        }
    }
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        err.log();
        match err {
            JobError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
