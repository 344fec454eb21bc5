//! Built-in tool handlers.
//!
//! Path validation resolves the candidate path and requires prefix-
//! containment in an allowed root, re-checked here even though the Gateway
//! already checked once before the job was queued.

use sha2::{Digest, Sha256};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{Tool, ToolContext, ToolOutput};
use crate::error::ToolError;
use crate::store::Outcome;

fn require_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{key}' parameter")))
}

pub struct DirectoryScanTool;

#[async_trait]
impl Tool for DirectoryScanTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let root_str = require_str(&ctx.params, "root")?;
        let root = ctx
            .allowlist
            .check(root_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        let mut files = Vec::new();
        let mut total_size: u64 = 0;
        scan_recursive(&root, &root, &mut files, &mut total_size).await?;
        files.sort();

        ToolOutput::json(&json!({
            "root": root.display().to_string(),
            "files": files,
            "total_size": total_size,
        }))
    }
}

fn scan_recursive<'a>(
    base: &'a std::path::Path,
    dir: &'a std::path::Path,
    files: &'a mut Vec<String>,
    total_size: &'a mut u64,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), ToolError>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = entry.metadata().await?;
            if metadata.is_dir() {
                scan_recursive(base, &path, files, total_size).await?;
            } else {
                let relative = path.strip_prefix(base).unwrap_or(&path);
                files.push(relative.to_string_lossy().into_owned());
                *total_size += metadata.len();
            }
        }
        Ok(())
    })
}

pub struct DirectoryListTool;

#[async_trait]
impl Tool for DirectoryListTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let path_str = require_str(&ctx.params, "path")?;
        let path = ctx
            .allowlist
            .check(path_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        let mut entries = tokio::fs::read_dir(&path).await?;
        let mut listed = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            listed.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "is_dir": metadata.is_dir(),
                "size": metadata.len(),
            }));
        }
        listed.sort_by_key(|v| v["name"].as_str().unwrap_or("").to_string());

        ToolOutput::json(&json!({
            "path": path.display().to_string(),
            "entries": listed,
        }))
    }
}

pub struct FileReadTool;

#[async_trait]
impl Tool for FileReadTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let path_str = require_str(&ctx.params, "path")?;
        let path = ctx
            .allowlist
            .check(path_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        let bytes = tokio::fs::read(&path).await?;
        Ok(ToolOutput {
            bytes,
            content_type: "application/octet-stream".to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Move {
    from: String,
    to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Plan {
    policy: String,
    root: String,
    moves: Vec<Move>,
}

pub struct OrganizePlanTool;

#[async_trait]
impl Tool for OrganizePlanTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let root_str = require_str(&ctx.params, "root")?;
        let policy = require_str(&ctx.params, "policy")?;
        let root = ctx
            .allowlist
            .check(root_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        if policy != "by_ext" {
            return Err(ToolError::InvalidParameters(format!(
                "unsupported organize policy '{policy}'"
            )));
        }

        let mut moves = Vec::new();
        let mut entries = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("_noext");
            let filename = entry.file_name();
            let to = root.join(ext).join(&filename);
            moves.push(Move {
                from: path.display().to_string(),
                to: to.display().to_string(),
            });
        }
        moves.sort_by(|a, b| a.from.cmp(&b.from));

        let plan = Plan {
            policy: policy.to_string(),
            root: root.display().to_string(),
            moves,
        };

        ToolOutput::json(&serde_json::to_value(&plan).map_err(|e| ToolError::ExecutionFailed(e.to_string()))?)
    }
}

pub struct ExecutePlanTool;

#[async_trait]
impl Tool for ExecutePlanTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let plan_job_id_str = require_str(&ctx.params, "plan_job_id")?;
        let plan_job_id = Uuid::parse_str(plan_job_id_str)
            .map_err(|e| ToolError::InvalidParameters(format!("bad plan_job_id: {e}")))?;

        let approval = ctx
            .approval
            .as_ref()
            .ok_or_else(|| ToolError::InvalidParameters("execute_plan requires approval".to_string()))?;

        let plan_result = ctx
            .store
            .get_result(plan_job_id)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&plan_result.bytes);
        let current_hash: [u8; 32] = hasher.finalize().into();

        if current_hash != approval.plan_hash {
            // Plan drift: fail before touching the filesystem or the audit log.
            return Err(ToolError::PlanDrift);
        }

        let plan: Plan = serde_json::from_slice(&plan_result.bytes)
            .map_err(|e| ToolError::ExecutionFailed(format!("corrupt plan: {e}")))?;

        let mut outcomes = Vec::new();
        for mv in &plan.moves {
            let from = ctx
                .allowlist
                .check(&mv.from)
                .map_err(|e| ToolError::PathEscape(e.to_string()))?;
            let to = ctx
                .allowlist
                .check(&mv.to)
                .map_err(|e| ToolError::PathEscape(e.to_string()))?;

            if !from.exists() {
                // Already moved by a prior (crashed) attempt at this same job;
                // at-least-once execution makes this the common re-run path.
                outcomes.push(json!({"from": mv.from, "to": mv.to, "outcome": "already_moved"}));
                continue;
            }

            if to.exists() {
                let (src_bytes, dst_bytes) = (
                    tokio::fs::read(&from).await?,
                    tokio::fs::read(&to).await?,
                );
                if src_bytes == dst_bytes {
                    ctx.audit
                        .append(
                            ctx.allowlist.roots().first().unwrap_or(&to),
                            &crate::audit::AuditLog::entry(
                                ctx.job_id,
                                "skip_identical",
                                Some(to.display().to_string()),
                                None,
                            ),
                        )
                        .await?;
                    outcomes.push(json!({"from": mv.from, "to": mv.to, "outcome": "skip_identical"}));
                    continue;
                } else {
                    ctx.audit
                        .append(
                            ctx.allowlist.roots().first().unwrap_or(&to),
                            &crate::audit::AuditLog::entry(
                                ctx.job_id,
                                "conflict",
                                Some(to.display().to_string()),
                                None,
                            ),
                        )
                        .await?;
                    return Err(ToolError::StateConflict(format!(
                        "destination '{}' already exists with different content",
                        to.display()
                    )));
                }
            }

            if let Some(parent) = to.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::rename(&from, &to).await?;
            ctx.audit
                .append(
                    ctx.allowlist.roots().first().unwrap_or(&to),
                    &crate::audit::AuditLog::entry(
                        ctx.job_id,
                        "moved",
                        Some(to.display().to_string()),
                        Some(json!({"from": from.display().to_string()})),
                    ),
                )
                .await?;
            outcomes.push(json!({"from": mv.from, "to": mv.to, "outcome": "moved"}));
        }

        ToolOutput::json(&json!({"plan_job_id": plan_job_id, "results": outcomes}))
    }
}

pub struct WebBrowseTool;

#[async_trait]
impl Tool for WebBrowseTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let url = require_str(&ctx.params, "url")?;
        ToolOutput::json(&json!({
            "url": url,
            "status": "unsupported",
            "note": "headless browsing is an external collaborator in this deployment",
        }))
    }
}

pub struct DocxWriteTool;

#[async_trait]
impl Tool for DocxWriteTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let path_str = require_str(&ctx.params, "path")?;
        let content = require_str(&ctx.params, "content")?;
        let path = ctx
            .allowlist
            .check(path_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content.as_bytes()).await?;
        ctx.audit
            .append(
                ctx.allowlist.roots().first().unwrap_or(&path),
                &crate::audit::AuditLog::entry(ctx.job_id, "docx_write", Some(path.display().to_string()), None),
            )
            .await?;

        Ok(ToolOutput {
            bytes: content.as_bytes().to_vec(),
            content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        })
    }
}

pub struct PdfWriteTool;

#[async_trait]
impl Tool for PdfWriteTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let path_str = require_str(&ctx.params, "path")?;
        let content = require_str(&ctx.params, "content")?;
        let path = ctx
            .allowlist
            .check(path_str)
            .map_err(|e| ToolError::PathEscape(e.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content.as_bytes()).await?;
        ctx.audit
            .append(
                ctx.allowlist.roots().first().unwrap_or(&path),
                &crate::audit::AuditLog::entry(ctx.job_id, "pdf_write", Some(path.display().to_string()), None),
            )
            .await?;

        Ok(ToolOutput {
            bytes: content.as_bytes().to_vec(),
            content_type: "application/pdf".to_string(),
        })
    }
}

pub struct CodeExecuteTool;

#[async_trait]
impl Tool for CodeExecuteTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let language = require_str(&ctx.params, "language")?;
        let source = require_str(&ctx.params, "source")?;
        ToolOutput::json(&json!({
            "language": language,
            "source_len": source.len(),
            "status": "unsupported",
            "note": "sandboxed code execution is an external collaborator in this deployment",
        }))
    }
}

pub struct AudioCaptureTool;

#[async_trait]
impl Tool for AudioCaptureTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let duration = ctx
            .params
            .get("duration_seconds")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ToolError::InvalidParameters("missing 'duration_seconds' parameter".to_string()))?;

        // A minimal, valid (empty-data) RIFF/WAVE header: no microphone is
        // attached in this deployment, but the MIME contract must hold.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&36u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&44100u32.to_le_bytes());
        bytes.extend_from_slice(&88200u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let _ = duration;

        Ok(ToolOutput {
            bytes,
            content_type: "audio/wav".to_string(),
        })
    }
}

pub struct TranscriptAnalyzeTool;

#[async_trait]
impl Tool for TranscriptAnalyzeTool {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let transcript_job_id_str = require_str(&ctx.params, "transcript_job_id")?;
        let transcript_job_id = Uuid::parse_str(transcript_job_id_str)
            .map_err(|e| ToolError::InvalidParameters(format!("bad transcript_job_id: {e}")))?;

        let result = ctx
            .store
            .get_result(transcript_job_id)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        ToolOutput::json(&json!({
            "transcript_job_id": transcript_job_id,
            "byte_length": result.bytes.len(),
            "status": "unsupported",
            "note": "transcript analysis is an external collaborator in this deployment",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::store::CpStore;
    use crate::store::SqliteStore;
    use crate::workspace::Allowlist;
    use std::sync::Arc;

    async fn ctx_for(tmp: &std::path::Path, params: serde_json::Value) -> ToolContext {
        ToolContext {
            job_id: Uuid::new_v4(),
            params,
            allowlist: Allowlist::new([tmp.to_str().unwrap()]).unwrap(),
            store: Arc::new(SqliteStore::open_in_memory().await.unwrap()),
            audit: AuditLog::new(),
            approval: None,
        }
    }

    #[tokio::test]
    async fn directory_scan_reports_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"hi").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub").join("b.txt"), b"hello").unwrap();

        let ctx = ctx_for(tmp.path(), json!({"root": tmp.path().to_str().unwrap()})).await;
        let out = DirectoryScanTool.execute(&ctx).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
        assert_eq!(value["files"].as_array().unwrap().len(), 2);
        assert_eq!(value["total_size"], 7);
    }

    #[tokio::test]
    async fn file_read_rejects_path_outside_root() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx_for(tmp.path(), json!({"path": "/etc/passwd"})).await;
        assert!(matches!(FileReadTool.execute(&ctx).await, Err(ToolError::PathEscape(_))));
    }

    #[tokio::test]
    async fn organize_plan_groups_by_extension_deterministically() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"1").unwrap();
        std::fs::write(tmp.path().join("b.txt"), b"2").unwrap();
        std::fs::write(tmp.path().join("c.pdf"), b"3").unwrap();

        let ctx = ctx_for(
            tmp.path(),
            json!({"root": tmp.path().to_str().unwrap(), "policy": "by_ext"}),
        )
        .await;
        let out1 = OrganizePlanTool.execute(&ctx).await.unwrap();
        let out2 = OrganizePlanTool.execute(&ctx).await.unwrap();
        assert_eq!(out1.bytes, out2.bytes, "plan hash must be stable across re-planning");

        let plan: Plan = serde_json::from_slice(&out1.bytes).unwrap();
        assert_eq!(plan.moves.len(), 3);
    }

    #[tokio::test]
    async fn execute_plan_moves_files_and_is_idempotent_on_rerun() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"content").unwrap();

        let plan = Plan {
            policy: "by_ext".to_string(),
            root: tmp.path().display().to_string(),
            moves: vec![Move {
                from: tmp.path().join("a.txt").display().to_string(),
                to: tmp.path().join("txt").join("a.txt").display().to_string(),
            }],
        };
        let plan_bytes = serde_json::to_vec(&plan).unwrap();
        let mut hasher = Sha256::new();
        hasher.update(&plan_bytes);
        let plan_hash: [u8; 32] = hasher.finalize().into();

        let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        let (plan_job_id, _) = store
            .submit_job("plan", crate::model::JobType::OrganizePlan, vec![], json!({}), None)
            .await
            .unwrap();
        store
            .claim_next_job("w1", crate::model::now_ms(), 30_000)
            .await
            .unwrap();
        store
            .complete_job(
                plan_job_id,
                "w1",
                Outcome::Succeeded,
                Some((plan_bytes, "application/json".to_string())),
                None,
            )
            .await
            .unwrap();

        let approval = crate::model::Approval {
            token: "tok".to_string(),
            plan_job_id,
            plan_hash,
            expires_at_ms: crate::model::now_ms() + 60_000,
        };

        let ctx = ToolContext {
            job_id: Uuid::new_v4(),
            params: json!({"plan_job_id": plan_job_id.to_string()}),
            allowlist: Allowlist::new([tmp.path().to_str().unwrap()]).unwrap(),
            store: store.clone(),
            audit: AuditLog::new(),
            approval: Some(approval.clone()),
        };

        let out = ExecutePlanTool.execute(&ctx).await.unwrap();
        assert!(tmp.path().join("txt").join("a.txt").exists());
        let value: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
        assert_eq!(value["results"][0]["outcome"], "moved");

        // Re-running against the now-moved source is a no-op, not an error
        // (at-least-once execution after a simulated lease reclaim).
        let ctx2 = ToolContext {
            job_id: Uuid::new_v4(),
            params: json!({"plan_job_id": plan_job_id.to_string()}),
            allowlist: Allowlist::new([tmp.path().to_str().unwrap()]).unwrap(),
            store,
            audit: AuditLog::new(),
            approval: Some(approval),
        };
        let out2 = ExecutePlanTool.execute(&ctx2).await.unwrap();
        let value2: serde_json::Value = serde_json::from_slice(&out2.bytes).unwrap();
        assert_eq!(value2["results"][0]["outcome"], "already_moved");
    }

    #[tokio::test]
    async fn execute_plan_detects_drift_before_touching_filesystem() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"content").unwrap();

        let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        let (plan_job_id, _) = store
            .submit_job("plan", crate::model::JobType::OrganizePlan, vec![], json!({}), None)
            .await
            .unwrap();
        store
            .claim_next_job("w1", crate::model::now_ms(), 30_000)
            .await
            .unwrap();
        store
            .complete_job(
                plan_job_id,
                "w1",
                Outcome::Succeeded,
                Some((b"{\"policy\":\"by_ext\",\"root\":\"/x\",\"moves\":[]}".to_vec(), "application/json".to_string())),
                None,
            )
            .await
            .unwrap();

        // Approval bound to a hash that no longer matches the stored result.
        let stale_approval = crate::model::Approval {
            token: "tok".to_string(),
            plan_job_id,
            plan_hash: [0u8; 32],
            expires_at_ms: crate::model::now_ms() + 60_000,
        };

        let ctx = ToolContext {
            job_id: Uuid::new_v4(),
            params: json!({"plan_job_id": plan_job_id.to_string()}),
            allowlist: Allowlist::new([tmp.path().to_str().unwrap()]).unwrap(),
            store,
            audit: AuditLog::new(),
            approval: Some(stale_approval),
        };

        assert!(matches!(ExecutePlanTool.execute(&ctx).await, Err(ToolError::PlanDrift)));
        assert!(tmp.path().join("a.txt").exists(), "no mutation should occur on drift");
    }
}
