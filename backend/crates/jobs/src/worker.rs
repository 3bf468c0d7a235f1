//! Job worker
//!
//! Polls the queue, runs each claimed job through its handler and records
//! the outcome. Failed jobs are retried after `2^attempts` seconds until
//! `max_attempts` is reached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use crate::domain::{Job, JobHandler, JobQueue};
use crate::error::{JobError, JobResult};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub poll_interval: Duration,
    /// RUNNING jobs older than this are considered abandoned at startup
    pub stuck_after: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            stuck_after: Duration::from_secs(10 * 60),
        }
    }
}

pub struct Worker<Q> {
    queue: Arc<Q>,
    handlers: HashMap<&'static str, Arc<dyn JobHandler>>,
    config: WorkerConfig,
}

impl<Q> Worker<Q>
where
    Q: JobQueue + Sync + 'static,
{
    pub fn new(queue: Arc<Q>, config: WorkerConfig) -> Self {
        Self {
            queue,
            handlers: HashMap::new(),
            config,
        }
    }

    pub fn register(mut self, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.insert(handler.kind(), handler);
        self
    }

    /// Put jobs abandoned by a previous process back in the queue
    pub async fn recover(&self) -> JobResult<u64> {
        self.queue.requeue_stuck(self.config.stuck_after).await
    }

    /// Claim and process a single job. `Ok(false)` when nothing is due.
    pub async fn run_once(&self) -> JobResult<bool> {
        let Some(job) = self.queue.claim_next().await? else {
            return Ok(false);
        };
        self.process(job).await?;
        Ok(true)
    }

    async fn process(&self, job: Job) -> JobResult<()> {
        let outcome = match self.handlers.get(job.kind.as_str()) {
            Some(handler) => handler.run(&job.payload).await,
            None => Err(JobError::UnknownKind(job.kind.clone())),
        };

        match outcome {
            Ok(()) => {
                self.queue.complete(job.id).await?;
                tracing::info!(job_id = %job.id, kind = %job.kind, attempts = job.attempts, "Job done");
            }
            Err(err) => {
                err.log();
                let retry_at = if !err.is_permanent() && job.has_attempts_left() {
                    chrono::Duration::from_std(job.backoff())
                        .ok()
                        .and_then(|delay| Utc::now().checked_add_signed(delay))
                } else {
                    None
                };
                self.queue.fail(job.id, &err.to_string(), retry_at).await?;
                match retry_at {
                    Some(at) => tracing::warn!(
                        job_id = %job.id,
                        kind = %job.kind,
                        attempts = job.attempts,
                        retry_at = %at,
                        "Job rescheduled"
                    ),
                    None => tracing::error!(
                        job_id = %job.id,
                        kind = %job.kind,
                        attempts = job.attempts,
                        error = %err,
                        "Job failed permanently"
                    ),
                }
            }
        }
        Ok(())
    }

    /// Poll until `shutdown` flips to `true` (or its sender is dropped)
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            handlers = ?self.handlers.keys().collect::<Vec<_>>(),
            poll_ms = self.config.poll_interval.as_millis() as u64,
            "Job worker started"
        );

        'outer: loop {
            loop {
                if *shutdown.borrow() {
                    break 'outer;
                }
                match self.run_once().await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(err) => {
                        err.log();
                        break;
                    }
                }
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        tracing::info!("Job worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HandlerFuture, JobStatus};
    use crate::infra::memory::InMemoryJobQueue;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingHandler {
        calls: AtomicU32,
        fail_first: u32,
        permanent: bool,
    }

    impl CountingHandler {
        fn new(fail_first: u32, permanent: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail_first,
                permanent,
            })
        }
    }

    impl JobHandler for CountingHandler {
        fn kind(&self) -> &'static str {
            "count"
        }

        fn run<'a>(&'a self, _payload: &'a Value) -> HandlerFuture<'a> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n < self.fail_first {
                    if self.permanent {
                        return Err(JobError::Permanent("bad payload".into()));
                    }
                    return Err(JobError::Failed("rpc down".into()));
                }
                Ok(())
            })
        }
    }

    fn worker(queue: &Arc<InMemoryJobQueue>, handler: Arc<CountingHandler>) -> Worker<InMemoryJobQueue> {
        Worker::new(queue.clone(), WorkerConfig::default()).register(handler)
    }

    #[tokio::test]
    async fn test_successful_job_is_done() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let id = queue.enqueue("count", json!({}), 3).await.unwrap();
        let worker = worker(&queue, CountingHandler::new(0, false));

        assert!(worker.run_once().await.unwrap());
        assert!(!worker.run_once().await.unwrap());

        let job = queue.find(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.attempts, 1);
    }

    #[tokio::test]
    async fn test_failure_is_rescheduled_with_backoff() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let id = queue.enqueue("count", json!({}), 3).await.unwrap();
        let worker = worker(&queue, CountingHandler::new(1, false));

        let before = Utc::now();
        assert!(worker.run_once().await.unwrap());

        let job = queue.find(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.last_error.as_deref(), Some("rpc down"));
        // 2^1 seconds
        assert!(job.run_at >= before + chrono::Duration::milliseconds(1900));
        // not due yet
        assert!(!worker.run_once().await.unwrap());
    }

    #[tokio::test]
    async fn test_exhausted_attempts_fail() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let id = queue.enqueue("count", json!({}), 1).await.unwrap();
        let worker = worker(&queue, CountingHandler::new(5, false));

        worker.run_once().await.unwrap();
        let job = queue.find(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_permanent_and_unknown_fail_immediately() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let bad = queue.enqueue("count", json!({}), 5).await.unwrap();
        let unknown = queue.enqueue("reindex", json!({}), 5).await.unwrap();
        let worker = worker(&queue, CountingHandler::new(1, true));

        worker.run_once().await.unwrap();
        worker.run_once().await.unwrap();

        assert_eq!(queue.find(bad).await.unwrap().unwrap().status, JobStatus::Failed);
        let unknown = queue.find(unknown).await.unwrap().unwrap();
        assert_eq!(unknown.status, JobStatus::Failed);
        assert!(unknown.last_error.unwrap().contains("reindex"));
    }

    #[tokio::test]
    async fn test_requeue_stuck() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let id = queue.enqueue("count", json!({}), 3).await.unwrap();
        queue.claim_next().await.unwrap();

        assert_eq!(queue.requeue_stuck(Duration::from_secs(600)).await.unwrap(), 0);
        assert_eq!(queue.requeue_stuck(Duration::ZERO).await.unwrap(), 1);
        assert_eq!(queue.find(id).await.unwrap().unwrap().status, JobStatus::Queued);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let queue = Arc::new(InMemoryJobQueue::new());
        queue.enqueue("count", json!({}), 3).await.unwrap();
        let handler = CountingHandler::new(0, false);
        let worker = worker(&queue, handler.clone());

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(worker.run(rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }
}
