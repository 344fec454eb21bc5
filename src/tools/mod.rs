//! Tool dispatch: each `JobType` maps to one `Tool` implementation.
//!
//! Handlers are the external-collaborator surface the orchestrator itself
//! does not need to understand beyond input schema, output MIME, and
//! mutating-ness (already captured by `registry::ToolRegistry`).

pub mod handlers;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::error::ToolError;
use crate::model::{Approval, JobType};
use crate::store::CpStore;
use crate::workspace::Allowlist;

/// Everything a handler needs to execute one job, re-validated at the point
/// of use rather than trusted from the Gateway's earlier check (defense in
/// depth).
pub struct ToolContext {
    pub job_id: Uuid,
    pub params: serde_json::Value,
    pub allowlist: Allowlist,
    pub store: Arc<dyn CpStore>,
    pub audit: AuditLog,
    /// Present iff this job's type is mutating; already consumed by the
    /// worker before dispatch.
    pub approval: Option<Approval>,
}

pub struct ToolOutput {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ToolOutput {
    pub fn json(value: &serde_json::Value) -> Result<Self, ToolError> {
        Ok(Self {
            bytes: serde_json::to_vec(value)
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
            content_type: "application/json".to_string(),
        })
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

/// Resolve the handler registered for `job_type`. One instance per call is
/// cheap: handlers are zero-sized dispatch shims, not long-lived state.
pub fn dispatch(job_type: JobType) -> Box<dyn Tool> {
    match job_type {
        JobType::DirectoryScan => Box::new(handlers::DirectoryScanTool),
        JobType::DirectoryList => Box::new(handlers::DirectoryListTool),
        JobType::FileRead => Box::new(handlers::FileReadTool),
        JobType::OrganizePlan => Box::new(handlers::OrganizePlanTool),
        JobType::ExecutePlan => Box::new(handlers::ExecutePlanTool),
        JobType::WebBrowse => Box::new(handlers::WebBrowseTool),
        JobType::DocxWrite => Box::new(handlers::DocxWriteTool),
        JobType::PdfWrite => Box::new(handlers::PdfWriteTool),
        JobType::CodeExecute => Box::new(handlers::CodeExecuteTool),
        JobType::AudioCapture => Box::new(handlers::AudioCaptureTool),
        JobType::TranscriptAnalyze => Box::new(handlers::TranscriptAnalyzeTool),
    }
}
