//! Job entity and ports

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::JobId;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{JobError, JobResult};

pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn code(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Done => "DONE",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "QUEUED" => Some(JobStatus::Queued),
            "RUNNING" => Some(JobStatus::Running),
            "DONE" => Some(JobStatus::Done),
            "FAILED" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub kind: String,
    pub payload: Value,
    pub status: JobStatus,
    /// Attempts started so far, including the current one while RUNNING
    pub attempts: i32,
    pub max_attempts: i32,
    pub run_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(kind: &str, payload: Value, max_attempts: i32) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            kind: kind.to_string(),
            payload,
            status: JobStatus::Queued,
            attempts: 0,
            max_attempts: max_attempts.max(1),
            run_at: now,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_attempts_left(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// `2^attempts` seconds after the failed attempt
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(2u64.saturating_pow(self.attempts.max(0) as u32))
    }
}

/// Persistent queue
#[trait_variant::make(JobQueue: Send)]
pub trait LocalJobQueue {
    async fn enqueue(&self, kind: &str, payload: Value, max_attempts: i32) -> JobResult<JobId>;

    /// Atomically take the oldest due QUEUED job, mark it RUNNING and bump
    /// its attempt counter
    async fn claim_next(&self) -> JobResult<Option<Job>>;

    async fn complete(&self, id: JobId) -> JobResult<()>;

    /// `retry_at = Some(_)` puts the job back in the queue, `None` marks it FAILED
    async fn fail(&self, id: JobId, error: &str, retry_at: Option<DateTime<Utc>>) -> JobResult<()>;

    /// RUNNING jobs untouched for longer than `older_than` go back to QUEUED
    async fn requeue_stuck(&self, older_than: Duration) -> JobResult<u64>;

    async fn find(&self, id: JobId) -> JobResult<Option<Job>>;
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = JobResult<()>> + Send + 'a>>;

/// Handler for one job kind. Boxed future so the worker can hold handlers of
/// different types.
pub trait JobHandler: Send + Sync {
    fn kind(&self) -> &'static str;

    fn run<'a>(&'a self, payload: &'a Value) -> HandlerFuture<'a>;
}

/// Decode a payload; a payload that does not decode never will
pub fn parse_payload<T: DeserializeOwned>(payload: &Value) -> JobResult<T> {
    serde_json::from_value(payload.clone())
        .map_err(|e| JobError::Permanent(format!("invalid payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_status_codes() {
        for status in [JobStatus::Queued, JobStatus::Running, JobStatus::Done, JobStatus::Failed] {
            assert_eq!(JobStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(JobStatus::from_code("queued"), None);
    }

    #[test]
    fn test_backoff_doubles() {
        let mut job = Job::new("noop", Value::Null, 5);
        job.attempts = 1;
        assert_eq!(job.backoff(), Duration::from_secs(2));
        job.attempts = 3;
        assert_eq!(job.backoff(), Duration::from_secs(8));
        assert!(job.has_attempts_left());
        job.attempts = 5;
        assert!(!job.has_attempts_left());
    }

    #[test]
    fn test_parse_payload_is_permanent_on_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Payload {
            #[allow(dead_code)]
            listing_id: uuid::Uuid,
        }
        let err = parse_payload::<Payload>(&serde_json::json!({"listing_id": 7})).unwrap_err();
        assert!(err.is_permanent());
    }
}
