//! CP Store: durable, transactional state for sessions, jobs, results, and
//! approvals.
//!
//! `CpStore` is a trait so the orchestration logic in `worker`/`gateway` is
//! storage-agnostic; `SqliteStore` is the one production implementation.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Approval, Job, JobResult, JobType, Session};

/// Outcome of a completed job, as reported by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

#[async_trait]
pub trait CpStore: Send + Sync {
    async fn create_session(&self) -> Result<Session, StoreError>;

    async fn authenticate(&self, session_id: Uuid, token: &str) -> Result<bool, StoreError>;

    /// Returns `(job_id, created)`. `created = false` means an existing
    /// non-terminal job with the same `dedupe_key` was returned instead.
    async fn submit_job(
        &self,
        dedupe_key: &str,
        job_type: JobType,
        allowed_roots: Vec<String>,
        params: serde_json::Value,
        approval_token: Option<String>,
    ) -> Result<(Uuid, bool), StoreError>;

    async fn claim_next_job(
        &self,
        worker_id: &str,
        now_ms: i64,
        lease_ms: i64,
    ) -> Result<Option<Job>, StoreError>;

    async fn renew_lease(
        &self,
        job_id: Uuid,
        worker_id: &str,
        now_ms: i64,
        lease_ms: i64,
    ) -> Result<(), StoreError>;

    async fn complete_job(
        &self,
        job_id: Uuid,
        worker_id: &str,
        outcome: Outcome,
        result: Option<(Vec<u8>, String)>,
        error_message: Option<String>,
    ) -> Result<(), StoreError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Job, StoreError>;

    async fn get_result(&self, job_id: Uuid) -> Result<JobResult, StoreError>;

    async fn list_jobs(&self, limit: i64) -> Result<Vec<Job>, StoreError>;

    /// Mint an approval bound to `plan_job_id`'s current result. `expected_hash`
    /// is recomputed from the stored result and must match, or `HashMismatch`
    /// is returned; this is the Gateway committing to the plan bytes it just
    /// read, not trusting a caller-supplied hash blindly.
    async fn mint_approval(
        &self,
        plan_job_id: Uuid,
        expected_hash: [u8; 32],
        ttl_ms: i64,
        now_ms: i64,
    ) -> Result<Approval, StoreError>;

    async fn consume_approval(
        &self,
        token: &str,
        expected_plan_job_id: Uuid,
        now_ms: i64,
    ) -> Result<Approval, StoreError>;
}
