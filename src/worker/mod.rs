//! Worker Pool: N concurrent executors leasing queued jobs.
//!
//! Each worker has a stable id, polls with jittered backoff, and renews its
//! lease from a side task while the job runs. A fixed pool of
//! `tokio::spawn`ed loops shares one store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;

use crate::audit::AuditLog;
use crate::model::{Job, now_ms};
use crate::registry::ToolRegistry;
use crate::store::{CpStore, Outcome};
use crate::tools::{self, ToolContext};
use crate::workspace::Allowlist;

const MIN_BACKOFF_MS: u64 = 50;
const MAX_BACKOFF_MS: u64 = 200;

/// Spawn `count` workers sharing `store`/`audit`, each leasing jobs for up to
/// `lease_ms` and heartbeating at `lease_ms / 3`.
pub fn spawn_pool(
    count: usize,
    store: Arc<dyn CpStore>,
    audit: AuditLog,
    lease_ms: i64,
) -> Vec<tokio::task::JoinHandle<()>> {
    (0..count)
        .map(|i| {
            let worker_id = format!("worker-{i}");
            let store = store.clone();
            let audit = audit.clone();
            tokio::spawn(run_worker(worker_id, store, audit, lease_ms))
        })
        .collect()
}

async fn run_worker(worker_id: String, store: Arc<dyn CpStore>, audit: AuditLog, lease_ms: i64) {
    loop {
        match store.claim_next_job(&worker_id, now_ms(), lease_ms).await {
            Ok(Some(job)) => {
                let job_id = job.job_id;
                process_job(&worker_id, job, store.clone(), audit.clone(), lease_ms).await;
                tracing::debug!(%job_id, worker = %worker_id, "job processed");
            }
            Ok(None) => {
                let jitter = rand::thread_rng().gen_range(MIN_BACKOFF_MS..=MAX_BACKOFF_MS);
                tokio::time::sleep(Duration::from_millis(jitter)).await;
            }
            Err(e) => {
                tracing::error!(error = %e, worker = %worker_id, "claim_next_job failed");
                tokio::time::sleep(Duration::from_millis(MAX_BACKOFF_MS)).await;
            }
        }
    }
}

async fn process_job(worker_id: &str, job: Job, store: Arc<dyn CpStore>, audit: AuditLog, lease_ms: i64) {
    let job_id = job.job_id;

    let allowlist = match Allowlist::new(&job.allowed_roots) {
        Ok(a) => a,
        Err(e) => {
            let _ = store
                .complete_job(job_id, worker_id, Outcome::Failed, None, Some(e.to_string()))
                .await;
            return;
        }
    };

    let approval = if ToolRegistry::is_mutating(job.job_type) {
        let token = job.approval_token.clone().unwrap_or_default();
        match store.consume_approval(&token, job_id, now_ms()).await {
            Ok(approval) => Some(approval),
            Err(e) => {
                let _ = store
                    .complete_job(job_id, worker_id, Outcome::Failed, None, Some(e.to_string()))
                    .await;
                return;
            }
        }
    } else {
        None
    };

    let preempted = Arc::new(AtomicBool::new(false));
    let heartbeat = {
        let store = store.clone();
        let worker_id = worker_id.to_string();
        let preempted = preempted.clone();
        let interval = Duration::from_millis(((lease_ms / 3).max(50)) as u64);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if store
                    .renew_lease(job_id, &worker_id, now_ms(), lease_ms)
                    .await
                    .is_err()
                {
                    preempted.store(true, Ordering::SeqCst);
                    return;
                }
            }
        })
    };

    let ctx = ToolContext {
        job_id,
        params: job.params.clone(),
        allowlist,
        store: store.clone(),
        audit,
        approval,
    };
    let tool = tools::dispatch(job.job_type);
    let outcome = tool.execute(&ctx).await;
    heartbeat.abort();

    if preempted.load(Ordering::SeqCst) {
        // Lease was reclaimed mid-execution; discard the result rather
        // than racing the new owner.
        tracing::warn!(%job_id, worker = %worker_id, "lease preempted, discarding result");
        return;
    }

    let complete_result = match outcome {
        Ok(output) => {
            store
                .complete_job(
                    job_id,
                    worker_id,
                    Outcome::Succeeded,
                    Some((output.bytes, output.content_type)),
                    None,
                )
                .await
        }
        Err(e) => {
            store
                .complete_job(job_id, worker_id, Outcome::Failed, None, Some(e.to_string()))
                .await
        }
    };

    if let Err(e) = complete_result {
        tracing::warn!(%job_id, worker = %worker_id, error = %e, "complete_job failed (lease likely preempted)");
    }
}
