//! Append-only audit log, one file per workspace root.
//!
//! Each append is serialized through a `tokio::sync::Mutex<File>` guarding
//! an `O_APPEND` file handle, so concurrent writers never interleave lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::model::AuditEntry;

const AUDIT_FILENAME: &str = ".coworker_audit.jsonl";

struct RootHandle {
    file: Mutex<File>,
}

/// Append-only audit log keyed by workspace root.
#[derive(Clone, Default)]
pub struct AuditLog {
    handles: Arc<Mutex<HashMap<PathBuf, Arc<RootHandle>>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn path_for(root: &Path) -> PathBuf {
        root.join(AUDIT_FILENAME)
    }

    async fn handle_for(&self, root: &Path) -> std::io::Result<Arc<RootHandle>> {
        let mut handles = self.handles.lock().await;
        if let Some(existing) = handles.get(root) {
            return Ok(Arc::clone(existing));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Self::path_for(root))
            .await?;

        let handle = Arc::new(RootHandle {
            file: Mutex::new(file),
        });
        handles.insert(root.to_path_buf(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Append one record under `root`. Flushes before returning, per the
    /// contract that an audit write is durable by the time the caller
    /// observes success.
    pub async fn append(&self, root: &Path, entry: &AuditEntry) -> std::io::Result<()> {
        let handle = self.handle_for(root).await?;
        let mut line = serde_json::to_vec(entry).expect("AuditEntry always serializes");
        line.push(b'\n');

        let mut file = handle.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    pub fn entry(job_id: Uuid, action: impl Into<String>, path: Option<String>, extra: Option<serde_json::Value>) -> AuditEntry {
        AuditEntry {
            ts_ms: crate::model::now_ms(),
            job_id,
            action: action.into(),
            path,
            extra,
        }
    }
}
