//! In-memory job queue
//!
//! Same semantics as the Postgres queue, for tests and tooling that run
//! without a database.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::JobId;
use serde_json::Value;

use crate::domain::{Job, JobQueue, JobStatus};
use crate::error::{JobError, JobResult};

#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Job> {
        self.lock().clone()
    }

    pub fn jobs_of_kind(&self, kind: &str) -> Vec<Job> {
        self.lock().iter().filter(|j| j.kind == kind).cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Job>> {
        // a poisoned lock only means another test thread panicked
        self.jobs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update(&self, id: JobId, f: impl FnOnce(&mut Job)) -> JobResult<()> {
        let mut jobs = self.lock();
        let job = jobs.iter_mut().find(|j| j.id == id).ok_or(JobError::NotFound)?;
        f(job);
        job.updated_at = Utc::now();
        Ok(())
    }
}

impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, kind: &str, payload: Value, max_attempts: i32) -> JobResult<JobId> {
        let job = Job::new(kind, payload, max_attempts);
        let id = job.id;
        self.lock().push(job);
        Ok(id)
    }

    async fn claim_next(&self) -> JobResult<Option<Job>> {
        let now = Utc::now();
        let mut jobs = self.lock();
        let next = jobs
            .iter_mut()
            .filter(|j| j.status == JobStatus::Queued && j.run_at <= now)
            .min_by_key(|j| (j.run_at, j.created_at));
        Ok(next.map(|job| {
            job.status = JobStatus::Running;
            job.attempts += 1;
            job.updated_at = now;
            job.clone()
        }))
    }

    async fn complete(&self, id: JobId) -> JobResult<()> {
        self.update(id, |job| {
            job.status = JobStatus::Done;
            job.last_error = None;
        })
    }

    async fn fail(&self, id: JobId, error: &str, retry_at: Option<DateTime<Utc>>) -> JobResult<()> {
        self.update(id, |job| {
            job.last_error = Some(error.to_string());
            match retry_at {
                Some(at) => {
                    job.status = JobStatus::Queued;
                    job.run_at = at;
                }
                None => job.status = JobStatus::Failed,
            }
        })
    }

    async fn requeue_stuck(&self, older_than: Duration) -> JobResult<u64> {
        let cutoff = chrono::Duration::from_std(older_than)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age));
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };
        let mut count = 0;
        for job in self.lock().iter_mut() {
            if job.status == JobStatus::Running && job.updated_at <= cutoff {
                job.status = JobStatus::Queued;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find(&self, id: JobId) -> JobResult<Option<Job>> {
        Ok(self.lock().iter().find(|j| j.id == id).cloned())
    }
}
