//! Jobs Crate - Postgres-backed background work
//!
//! - `domain` - `Job`, `JobStatus`, the `JobQueue` port and `JobHandler`
//! - `infra` - Postgres queue (`FOR UPDATE SKIP LOCKED`) and an in-memory queue
//! - `worker` - polling loop that dispatches claimed jobs to handlers

pub mod domain;
pub mod error;
pub mod infra;
pub mod worker;

pub use domain::{Job, JobHandler, JobQueue, JobStatus, parse_payload};
pub use error::{JobError, JobResult};
pub use infra::memory::InMemoryJobQueue;
pub use infra::postgres::PgJobQueue;
pub use worker::{Worker, WorkerConfig};
