//! PostgreSQL job queue

use std::time::Duration;

use chrono::{DateTime, Utc};
use kernel::id::JobId;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Job, JobQueue, JobStatus};
use crate::error::{JobError, JobResult};

const JOB_COLUMNS: &str = "id, kind, payload, status, attempts, max_attempts, run_at, last_error, created_at, updated_at";

#[derive(Clone)]
pub struct PgJobQueue {
    pool: PgPool,
}

impl PgJobQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl JobQueue for PgJobQueue {
    async fn enqueue(&self, kind: &str, payload: Value, max_attempts: i32) -> JobResult<JobId> {
        let job = Job::new(kind, payload, max_attempts);
        sqlx::query(
            r#"
            INSERT INTO jobs (id, kind, payload, status, attempts, max_attempts, run_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, $5, $6, $6, $6)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(&job.kind)
        .bind(&job.payload)
        .bind(job.status.code())
        .bind(job.max_attempts)
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(job_id = %job.id, kind = %job.kind, "Job enqueued");
        Ok(job.id)
    }

    async fn claim_next(&self) -> JobResult<Option<Job>> {
        let sql = format!(
            r#"
            UPDATE jobs
            SET status = 'RUNNING', attempts = attempts + 1, updated_at = now()
            WHERE id = (
                SELECT id FROM jobs
                WHERE status = 'QUEUED' AND run_at <= now()
                ORDER BY run_at, created_at
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        row.map(JobRow::into_job).transpose()
    }

    async fn complete(&self, id: JobId) -> JobResult<()> {
        let done = sqlx::query(
            "UPDATE jobs SET status = 'DONE', last_error = NULL, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();
        if done == 0 {
            return Err(JobError::NotFound);
        }
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str, retry_at: Option<DateTime<Utc>>) -> JobResult<()> {
        let status = match retry_at {
            Some(_) => JobStatus::Queued,
            None => JobStatus::Failed,
        };
        let updated = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $2, last_error = $3, run_at = COALESCE($4, run_at), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.code())
        .bind(error)
        .bind(retry_at)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(JobError::NotFound);
        }
        Ok(())
    }

    async fn requeue_stuck(&self, older_than: Duration) -> JobResult<u64> {
        let requeued = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'QUEUED', updated_at = now()
            WHERE status = 'RUNNING' AND updated_at < now() - make_interval(secs => $1)
            "#,
        )
        .bind(older_than.as_secs_f64())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if requeued > 0 {
            tracing::warn!(jobs_requeued = requeued, "Requeued stuck jobs");
        }
        Ok(requeued)
    }

    async fn find(&self, id: JobId) -> JobResult<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(JobRow::into_job).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    kind: String,
    payload: Value,
    status: String,
    attempts: i32,
    max_attempts: i32,
    run_at: DateTime<Utc>,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_job(self) -> JobResult<Job> {
        let status = JobStatus::from_code(&self.status)
            .ok_or_else(|| JobError::Permanent(format!("unknown job status {}", self.status)))?;
        Ok(Job {
            id: JobId::from_uuid(self.id),
            kind: self.kind,
            payload: self.payload,
            status,
            attempts: self.attempts,
            max_attempts: self.max_attempts,
            run_at: self.run_at,
            last_error: self.last_error,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
