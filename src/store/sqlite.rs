//! SQLite-backed `CpStore` implementation.
//!
//! A single connection (`max_connections(1)`) is used deliberately: SQLite
//! only ever has one writer anyway, and a single shared connection gives us
//! writer serialization for free, without a separate application-level lock
//! duplicating what the database already guarantees.

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use super::{CpStore, Outcome};
use crate::error::StoreError;
use crate::model::{Approval, Job, JobResult, JobStatus, JobType, Session, hex_encode, now_ms};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    session_id   TEXT PRIMARY KEY,
    token        TEXT NOT NULL,
    created_at_ms INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    job_id              TEXT PRIMARY KEY,
    dedupe_key          TEXT NOT NULL,
    job_type            TEXT NOT NULL,
    status              INTEGER NOT NULL,
    created_at_ms       INTEGER NOT NULL,
    started_at_ms       INTEGER,
    finished_at_ms      INTEGER,
    params              TEXT NOT NULL,
    allowed_roots       TEXT NOT NULL,
    lease_owner         TEXT,
    lease_expires_at_ms INTEGER,
    approval_token      TEXT,
    error_message       TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_dedupe ON jobs (dedupe_key, status);
CREATE INDEX IF NOT EXISTS idx_jobs_claimable ON jobs (status, created_at_ms, job_id);

CREATE TABLE IF NOT EXISTS results (
    job_id       TEXT PRIMARY KEY,
    bytes        BLOB NOT NULL,
    content_type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS approvals (
    token         TEXT PRIMARY KEY,
    plan_job_id   TEXT NOT NULL,
    plan_hash     BLOB NOT NULL,
    expires_at_ms INTEGER NOT NULL
);
"#;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// In-memory store for tests: no file on disk, fresh schema every time.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> Result<Job, StoreError> {
        let job_type_str: String = row.try_get("job_type")?;
        let job_type = JobType::from_str_id(&job_type_str)
            .ok_or_else(|| StoreError::BadState(format!("unknown job_type in store: {job_type_str}")))?;
        let status_i: i64 = row.try_get("status")?;
        let status = JobStatus::from_i64(status_i)
            .ok_or_else(|| StoreError::BadState(format!("unknown status in store: {status_i}")))?;
        let params_str: String = row.try_get("params")?;
        let params: serde_json::Value = serde_json::from_str(&params_str)?;
        let roots_str: String = row.try_get("allowed_roots")?;
        let allowed_roots: Vec<String> = serde_json::from_str(&roots_str)?;
        let job_id_str: String = row.try_get("job_id")?;

        Ok(Job {
            job_id: Uuid::parse_str(&job_id_str)
                .map_err(|e| StoreError::BadState(e.to_string()))?,
            dedupe_key: row.try_get("dedupe_key")?,
            job_type,
            status,
            created_at_ms: row.try_get("created_at_ms")?,
            started_at_ms: row.try_get("started_at_ms")?,
            finished_at_ms: row.try_get("finished_at_ms")?,
            params,
            allowed_roots,
            lease_owner: row.try_get("lease_owner")?,
            lease_expires_at_ms: row.try_get("lease_expires_at_ms")?,
            approval_token: row.try_get("approval_token")?,
            error_message: row.try_get("error_message")?,
        })
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex_encode(&bytes)
}

#[async_trait]
impl CpStore for SqliteStore {
    async fn create_session(&self) -> Result<Session, StoreError> {
        let session = Session {
            session_id: Uuid::new_v4(),
            token: generate_secret(),
            created_at_ms: now_ms(),
        };
        sqlx::query("INSERT INTO sessions (session_id, token, created_at_ms) VALUES (?, ?, ?)")
            .bind(session.session_id.to_string())
            .bind(&session.token)
            .bind(session.created_at_ms)
            .execute(&self.pool)
            .await?;
        Ok(session)
    }

    async fn authenticate(&self, session_id: Uuid, token: &str) -> Result<bool, StoreError> {
        if token.is_empty() {
            return Ok(false);
        }
        let row = sqlx::query("SELECT token FROM sessions WHERE session_id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(false);
        };
        let stored: String = row.try_get("token")?;
        use subtle::ConstantTimeEq;
        Ok(bool::from(stored.as_bytes().ct_eq(token.as_bytes())))
    }

    async fn submit_job(
        &self,
        dedupe_key: &str,
        job_type: JobType,
        allowed_roots: Vec<String>,
        params: serde_json::Value,
        approval_token: Option<String>,
    ) -> Result<(Uuid, bool), StoreError> {
        if job_type.is_mutating() && approval_token.is_none() {
            return Err(StoreError::InvalidArgument(
                "mutating job type requires an approval_token".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(
            "SELECT job_id FROM jobs WHERE dedupe_key = ? AND status IN (1, 2) LIMIT 1",
        )
        .bind(dedupe_key)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = existing {
            let job_id_str: String = row.try_get("job_id")?;
            tx.commit().await?;
            let job_id = Uuid::parse_str(&job_id_str).map_err(|e| StoreError::BadState(e.to_string()))?;
            return Ok((job_id, false));
        }

        let job_id = Uuid::new_v4();
        let params_str = serde_json::to_string(&params)?;
        let roots_str = serde_json::to_string(&allowed_roots)?;

        sqlx::query(
            "INSERT INTO jobs (job_id, dedupe_key, job_type, status, created_at_ms, params, allowed_roots, approval_token)
             VALUES (?, ?, ?, 1, ?, ?, ?, ?)",
        )
        .bind(job_id.to_string())
        .bind(dedupe_key)
        .bind(job_type.as_str())
        .bind(now_ms())
        .bind(params_str)
        .bind(roots_str)
        .bind(approval_token)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((job_id, true))
    }

    async fn claim_next_job(
        &self,
        worker_id: &str,
        now_ms_val: i64,
        lease_ms: i64,
    ) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query(
            "SELECT job_id FROM jobs
             WHERE status = 1 OR (status = 2 AND lease_expires_at_ms < ?)
             ORDER BY created_at_ms ASC, job_id ASC
             LIMIT 1",
        )
        .bind(now_ms_val)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = candidate else {
            tx.commit().await?;
            return Ok(None);
        };
        let job_id_str: String = row.try_get("job_id")?;

        let new_lease_expiry = now_ms_val + lease_ms;
        let changed = sqlx::query(
            "UPDATE jobs SET
                status = 2,
                lease_owner = ?,
                lease_expires_at_ms = ?,
                started_at_ms = COALESCE(started_at_ms, ?)
             WHERE job_id = ? AND (status = 1 OR (status = 2 AND lease_expires_at_ms < ?))",
        )
        .bind(worker_id)
        .bind(new_lease_expiry)
        .bind(now_ms_val)
        .bind(&job_id_str)
        .bind(now_ms_val)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if changed == 0 {
            // Another writer raced us (can't happen with a single-connection
            // pool, but stays correct if the pool is ever widened).
            tx.commit().await?;
            return Ok(None);
        }

        let row = sqlx::query("SELECT * FROM jobs WHERE job_id = ?")
            .bind(&job_id_str)
            .fetch_one(&mut *tx)
            .await?;
        let job = Self::row_to_job(&row)?;
        tx.commit().await?;
        Ok(Some(job))
    }

    async fn renew_lease(
        &self,
        job_id: Uuid,
        worker_id: &str,
        now_ms_val: i64,
        lease_ms: i64,
    ) -> Result<(), StoreError> {
        let changed = sqlx::query(
            "UPDATE jobs SET lease_expires_at_ms = ?
             WHERE job_id = ? AND lease_owner = ? AND status = 2",
        )
        .bind(now_ms_val + lease_ms)
        .bind(job_id.to_string())
        .bind(worker_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if changed == 0 {
            Err(StoreError::Preempted)
        } else {
            Ok(())
        }
    }

    async fn complete_job(
        &self,
        job_id: Uuid,
        worker_id: &str,
        outcome: Outcome,
        result: Option<(Vec<u8>, String)>,
        error_message: Option<String>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT lease_owner, status FROM jobs WHERE job_id = ?")
            .bind(job_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let lease_owner: Option<String> = row.try_get("lease_owner")?;
        let status_i: i64 = row.try_get("status")?;

        if status_i != JobStatus::Running as i64 || lease_owner.as_deref() != Some(worker_id) {
            return Err(StoreError::Preempted);
        }

        let status = match outcome {
            Outcome::Succeeded => JobStatus::Succeeded as i64,
            Outcome::Failed => JobStatus::Failed as i64,
        };

        sqlx::query(
            "UPDATE jobs SET
                status = ?,
                finished_at_ms = ?,
                lease_owner = NULL,
                lease_expires_at_ms = NULL,
                error_message = ?
             WHERE job_id = ?",
        )
        .bind(status)
        .bind(now_ms())
        .bind(error_message)
        .bind(job_id.to_string())
        .execute(&mut *tx)
        .await?;

        if let (Outcome::Succeeded, Some((bytes, content_type))) = (outcome, result) {
            sqlx::query(
                "INSERT INTO results (job_id, bytes, content_type) VALUES (?, ?, ?)
                 ON CONFLICT(job_id) DO UPDATE SET bytes = excluded.bytes, content_type = excluded.content_type",
            )
            .bind(job_id.to_string())
            .bind(bytes)
            .bind(content_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Job, StoreError> {
        let row = sqlx::query("SELECT * FROM jobs WHERE job_id = ?")
            .bind(job_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Self::row_to_job(&row)
    }

    async fn get_result(&self, job_id: Uuid) -> Result<JobResult, StoreError> {
        let row = sqlx::query("SELECT bytes, content_type FROM results WHERE job_id = ?")
            .bind(job_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(JobResult {
            job_id,
            bytes: row.try_get("bytes")?,
            content_type: row.try_get("content_type")?,
        })
    }

    async fn list_jobs(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query("SELECT * FROM jobs ORDER BY created_at_ms DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_job).collect()
    }

    async fn mint_approval(
        &self,
        plan_job_id: Uuid,
        caller_hash: [u8; 32],
        ttl_ms: i64,
        now_ms_val: i64,
    ) -> Result<Approval, StoreError> {
        let mut tx = self.pool.begin().await?;

        let job_row = sqlx::query("SELECT status FROM jobs WHERE job_id = ?")
            .bind(plan_job_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;
        let status_i: i64 = job_row.try_get("status")?;
        if status_i != JobStatus::Succeeded as i64 {
            return Err(StoreError::BadState("plan job is not SUCCEEDED".to_string()));
        }

        let result_row = sqlx::query("SELECT bytes FROM results WHERE job_id = ?")
            .bind(plan_job_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;
        let bytes: Vec<u8> = result_row.try_get("bytes")?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let real_hash: [u8; 32] = hasher.finalize().into();

        if real_hash != caller_hash {
            return Err(StoreError::HashMismatch);
        }

        let token = generate_secret();
        let expires_at_ms = now_ms_val + ttl_ms;

        sqlx::query(
            "INSERT INTO approvals (token, plan_job_id, plan_hash, expires_at_ms) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(plan_job_id.to_string())
        .bind(real_hash.to_vec())
        .bind(expires_at_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Approval {
            token,
            plan_job_id,
            plan_hash: real_hash,
            expires_at_ms,
        })
    }

    async fn consume_approval(
        &self,
        token: &str,
        expected_plan_job_id: Uuid,
        now_ms_val: i64,
    ) -> Result<Approval, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT plan_job_id, plan_hash, expires_at_ms FROM approvals WHERE token = ?")
            .bind(token)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::Unknown)?;

        let plan_job_id_str: String = row.try_get("plan_job_id")?;
        let plan_job_id = Uuid::parse_str(&plan_job_id_str).map_err(|e| StoreError::BadState(e.to_string()))?;
        let plan_hash_vec: Vec<u8> = row.try_get("plan_hash")?;
        let expires_at_ms: i64 = row.try_get("expires_at_ms")?;

        if expires_at_ms <= now_ms_val {
            return Err(StoreError::Expired);
        }
        if plan_job_id != expected_plan_job_id {
            return Err(StoreError::Mismatch);
        }

        sqlx::query("DELETE FROM approvals WHERE token = ?")
            .bind(token)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut plan_hash = [0u8; 32];
        if plan_hash_vec.len() == 32 {
            plan_hash.copy_from_slice(&plan_hash_vec);
        }

        Ok(Approval {
            token: token.to_string(),
            plan_job_id,
            plan_hash,
            expires_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> SqliteStore {
        SqliteStore::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn session_round_trips() {
        let store = store().await;
        let session = store.create_session().await.unwrap();
        assert!(store.authenticate(session.session_id, &session.token).await.unwrap());
        assert!(!store.authenticate(session.session_id, "wrong").await.unwrap());
        assert!(!store.authenticate(Uuid::new_v4(), &session.token).await.unwrap());
        assert!(!store.authenticate(session.session_id, "").await.unwrap());
    }

    #[tokio::test]
    async fn idempotent_submit_returns_same_job_id() {
        let store = store().await;
        let (id1, created1) = store
            .submit_job("k1", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        assert!(created1);

        let (id2, created2) = store
            .submit_job("k1", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        assert!(!created2);
        assert_eq!(id1, id2);
    }

    #[tokio::test]
    async fn mutating_submit_without_approval_is_rejected() {
        let store = store().await;
        let result = store
            .submit_job("k1", JobType::ExecutePlan, vec!["/W".into()], json!({}), None)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn claim_next_job_is_fifo_and_single_winner() {
        let store = store().await;
        let (a, _) = store
            .submit_job("a", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let (_b, _) = store
            .submit_job("b", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();

        let claimed = store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap().unwrap();
        assert_eq!(claimed.job_id, a);
        assert_eq!(claimed.status, JobStatus::Running);

        let second_winner = store.claim_next_job("worker-2", now_ms(), 30_000).await.unwrap().unwrap();
        assert_ne!(second_winner.job_id, a);
    }

    #[tokio::test]
    async fn lease_reclaim_after_expiry() {
        let store = store().await;
        let (job_id, _) = store
            .submit_job("a", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();

        let t0 = now_ms();
        let claimed = store.claim_next_job("worker-1", t0, 10).await.unwrap().unwrap();
        assert_eq!(claimed.job_id, job_id);

        // Not yet expired: worker-2 gets nothing.
        assert!(store.claim_next_job("worker-2", t0 + 5, 10).await.unwrap().is_none());

        // Expired: worker-2 reclaims the same job, never re-entering QUEUED.
        let reclaimed = store.claim_next_job("worker-2", t0 + 50, 10).await.unwrap().unwrap();
        assert_eq!(reclaimed.job_id, job_id);
        assert_eq!(reclaimed.lease_owner.as_deref(), Some("worker-2"));

        // The original worker can no longer renew or complete.
        assert!(matches!(
            store.renew_lease(job_id, "worker-1", t0 + 60, 10).await,
            Err(StoreError::Preempted)
        ));
        assert!(matches!(
            store
                .complete_job(job_id, "worker-1", Outcome::Succeeded, None, None)
                .await,
            Err(StoreError::Preempted)
        ));
    }

    #[tokio::test]
    async fn complete_job_requires_owning_lease() {
        let store = store().await;
        let (job_id, _) = store
            .submit_job("a", JobType::DirectoryScan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap();

        store
            .complete_job(
                job_id,
                "worker-1",
                Outcome::Succeeded,
                Some((b"{}".to_vec(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();

        let job = store.get_job(job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);
        let result = store.get_result(job_id).await.unwrap();
        assert_eq!(result.content_type, "application/json");
    }

    #[tokio::test]
    async fn approval_lifecycle_mint_consume_single_use() {
        let store = store().await;
        let (plan_id, _) = store
            .submit_job("plan", JobType::OrganizePlan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap();
        let plan_bytes = b"{\"moves\":[]}".to_vec();
        store
            .complete_job(
                plan_id,
                "worker-1",
                Outcome::Succeeded,
                Some((plan_bytes.clone(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();

        let mut hasher = Sha256::new();
        hasher.update(&plan_bytes);
        let hash: [u8; 32] = hasher.finalize().into();

        let approval = store.mint_approval(plan_id, hash, 120_000, now_ms()).await.unwrap();
        assert_eq!(approval.plan_hash, hash);

        let consumed = store.consume_approval(&approval.token, plan_id, now_ms()).await.unwrap();
        assert_eq!(consumed.plan_job_id, plan_id);

        // Single-use: consuming again fails.
        assert!(matches!(
            store.consume_approval(&approval.token, plan_id, now_ms()).await,
            Err(StoreError::Unknown)
        ));
    }

    #[tokio::test]
    async fn mint_approval_detects_hash_mismatch() {
        let store = store().await;
        let (plan_id, _) = store
            .submit_job("plan", JobType::OrganizePlan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap();
        store
            .complete_job(
                plan_id,
                "worker-1",
                Outcome::Succeeded,
                Some((b"real-bytes".to_vec(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();

        let wrong_hash = [7u8; 32];
        assert!(matches!(
            store.mint_approval(plan_id, wrong_hash, 120_000, now_ms()).await,
            Err(StoreError::HashMismatch)
        ));
    }

    #[tokio::test]
    async fn approval_mismatch_when_bound_to_different_plan() {
        let store = store().await;
        let (plan_id, _) = store
            .submit_job("plan", JobType::OrganizePlan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap();
        let bytes = b"plan-bytes".to_vec();
        store
            .complete_job(
                plan_id,
                "worker-1",
                Outcome::Succeeded,
                Some((bytes.clone(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash: [u8; 32] = hasher.finalize().into();
        let approval = store.mint_approval(plan_id, hash, 120_000, now_ms()).await.unwrap();

        let other_job = Uuid::new_v4();
        assert!(matches!(
            store.consume_approval(&approval.token, other_job, now_ms()).await,
            Err(StoreError::Mismatch)
        ));
    }

    #[tokio::test]
    async fn approval_expires() {
        let store = store().await;
        let (plan_id, _) = store
            .submit_job("plan", JobType::OrganizePlan, vec!["/W".into()], json!({"root": "/W"}), None)
            .await
            .unwrap();
        store.claim_next_job("worker-1", now_ms(), 30_000).await.unwrap();
        let bytes = b"plan-bytes".to_vec();
        store
            .complete_job(
                plan_id,
                "worker-1",
                Outcome::Succeeded,
                Some((bytes.clone(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash: [u8; 32] = hasher.finalize().into();
        let t0 = now_ms();
        let approval = store.mint_approval(plan_id, hash, 10, t0).await.unwrap();

        assert!(matches!(
            store.consume_approval(&approval.token, plan_id, t0 + 1000).await,
            Err(StoreError::Expired)
        ));
    }
}
