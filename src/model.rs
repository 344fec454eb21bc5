//! Core data model: sessions, jobs, results, approvals, audit entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job lifecycle status. Numeric values are part of the wire contract, so
/// `JobStatus` serializes as a bare integer rather than serde's default
/// string-tag representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobStatus {
    Queued = 1,
    Running = 2,
    Succeeded = 3,
    Failed = 4,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            1 => Some(JobStatus::Queued),
            2 => Some(JobStatus::Running),
            3 => Some(JobStatus::Succeeded),
            4 => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

impl Serialize for JobStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = u8::deserialize(deserializer)?;
        JobStatus::from_i64(v as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid job status: {v}")))
    }
}

/// Job type registry IDs. Wire-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    DirectoryScan,
    DirectoryList,
    FileRead,
    OrganizePlan,
    ExecutePlan,
    WebBrowse,
    DocxWrite,
    PdfWrite,
    CodeExecute,
    AudioCapture,
    TranscriptAnalyze,
}

impl JobType {
    pub const ALL: &'static [JobType] = &[
        JobType::DirectoryScan,
        JobType::DirectoryList,
        JobType::FileRead,
        JobType::OrganizePlan,
        JobType::ExecutePlan,
        JobType::WebBrowse,
        JobType::DocxWrite,
        JobType::PdfWrite,
        JobType::CodeExecute,
        JobType::AudioCapture,
        JobType::TranscriptAnalyze,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::DirectoryScan => "directory_scan",
            JobType::DirectoryList => "directory_list",
            JobType::FileRead => "file_read",
            JobType::OrganizePlan => "organize_plan",
            JobType::ExecutePlan => "execute_plan",
            JobType::WebBrowse => "web_browse",
            JobType::DocxWrite => "docx_write",
            JobType::PdfWrite => "pdf_write",
            JobType::CodeExecute => "code_execute",
            JobType::AudioCapture => "audio_capture",
            JobType::TranscriptAnalyze => "transcript_analyze",
        }
    }

    pub fn from_str_id(s: &str) -> Option<Self> {
        JobType::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Whether this job type mutates the filesystem and therefore requires
    /// an approval token.
    pub fn is_mutating(self) -> bool {
        matches!(self, JobType::ExecutePlan | JobType::DocxWrite | JobType::PdfWrite)
    }
}

/// Static descriptor for a registered tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub type_id: JobType,
    pub name: &'static str,
    pub mutating: bool,
    pub content_type: &'static str,
    pub param_keys: &'static [&'static str],
    pub required_param_keys: &'static [&'static str],
}

/// A session minted at `/handshake`.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub token: String,
    pub created_at_ms: i64,
}

/// A queued/running/terminal job row.
#[derive(Debug, Clone)]
pub struct Job {
    pub job_id: Uuid,
    pub dedupe_key: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub created_at_ms: i64,
    pub started_at_ms: Option<i64>,
    pub finished_at_ms: Option<i64>,
    pub params: serde_json::Value,
    pub allowed_roots: Vec<String>,
    pub lease_owner: Option<String>,
    pub lease_expires_at_ms: Option<i64>,
    pub approval_token: Option<String>,
    pub error_message: Option<String>,
}

/// Wire projection of a `Job`, omitting internal lease/approval secrets.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub job_id: Uuid,
    pub dedupe_key: String,
    #[serde(rename = "type")]
    pub job_type: &'static str,
    pub status: JobStatus,
    pub created_at_ms: i64,
    pub started_at_ms: Option<i64>,
    pub finished_at_ms: Option<i64>,
    pub error_message: Option<String>,
}

impl From<&Job> for JobView {
    fn from(j: &Job) -> Self {
        JobView {
            job_id: j.job_id,
            dedupe_key: j.dedupe_key.clone(),
            job_type: j.job_type.as_str(),
            status: j.status,
            created_at_ms: j.created_at_ms,
            started_at_ms: j.started_at_ms,
            finished_at_ms: j.finished_at_ms,
            error_message: j.error_message.clone(),
        }
    }
}

/// A committed job result. 1:1 with a `Succeeded` job.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub job_id: Uuid,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A single-use approval token bound to a plan's content hash.
#[derive(Debug, Clone)]
pub struct Approval {
    pub token: String,
    pub plan_job_id: Uuid,
    pub plan_hash: [u8; 32],
    pub expires_at_ms: i64,
}

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub ts_ms: i64,
    pub job_id: Uuid,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
