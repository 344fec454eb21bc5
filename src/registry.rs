//! Static tool registry.
//!
//! The registry is the Gateway's and the worker's source of truth for
//! whether a job type requires an approval token, a param schema, and a
//! result MIME type. The CP Store keeps its own minimal copy of the
//! mutating bit (`JobType::is_mutating`) as a last-line invariant guard on
//! `submit_job`, independent of this layer; the two are asserted to agree
//! in `registry.rs`'s and `model.rs`'s tests.

use crate::model::{JobType, ToolDescriptor};

const DESCRIPTORS: &[ToolDescriptor] = &[
    ToolDescriptor {
        type_id: JobType::DirectoryScan,
        name: "directory_scan",
        mutating: false,
        content_type: "application/json",
        param_keys: &["root"],
        required_param_keys: &["root"],
    },
    ToolDescriptor {
        type_id: JobType::DirectoryList,
        name: "directory_list",
        mutating: false,
        content_type: "application/json",
        param_keys: &["path"],
        required_param_keys: &["path"],
    },
    ToolDescriptor {
        type_id: JobType::FileRead,
        name: "file_read",
        mutating: false,
        content_type: "application/octet-stream",
        param_keys: &["path"],
        required_param_keys: &["path"],
    },
    ToolDescriptor {
        type_id: JobType::OrganizePlan,
        name: "organize_plan",
        mutating: false,
        content_type: "application/json",
        param_keys: &["root", "policy"],
        required_param_keys: &["root", "policy"],
    },
    ToolDescriptor {
        type_id: JobType::ExecutePlan,
        name: "execute_plan",
        mutating: true,
        content_type: "application/json",
        param_keys: &["plan_job_id"],
        required_param_keys: &["plan_job_id"],
    },
    ToolDescriptor {
        type_id: JobType::WebBrowse,
        name: "web_browse",
        mutating: false,
        content_type: "application/json",
        param_keys: &["url"],
        required_param_keys: &["url"],
    },
    ToolDescriptor {
        type_id: JobType::DocxWrite,
        name: "docx_write",
        mutating: true,
        content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        param_keys: &["path", "content"],
        required_param_keys: &["path", "content"],
    },
    ToolDescriptor {
        type_id: JobType::PdfWrite,
        name: "pdf_write",
        mutating: true,
        content_type: "application/pdf",
        param_keys: &["path", "content"],
        required_param_keys: &["path", "content"],
    },
    ToolDescriptor {
        type_id: JobType::CodeExecute,
        name: "code_execute",
        mutating: false,
        content_type: "application/json",
        param_keys: &["language", "source"],
        required_param_keys: &["language", "source"],
    },
    ToolDescriptor {
        type_id: JobType::AudioCapture,
        name: "audio_capture",
        mutating: false,
        content_type: "audio/wav",
        param_keys: &["duration_seconds"],
        required_param_keys: &["duration_seconds"],
    },
    ToolDescriptor {
        type_id: JobType::TranscriptAnalyze,
        name: "transcript_analyze",
        mutating: false,
        content_type: "application/json",
        param_keys: &["transcript_job_id"],
        required_param_keys: &["transcript_job_id"],
    },
];

/// Read-only view over the static tool catalog.
pub struct ToolRegistry;

impl ToolRegistry {
    pub fn descriptor(job_type: JobType) -> &'static ToolDescriptor {
        DESCRIPTORS
            .iter()
            .find(|d| d.type_id == job_type)
            .expect("every JobType variant has a registered descriptor")
    }

    pub fn all() -> &'static [ToolDescriptor] {
        DESCRIPTORS
    }

    pub fn is_mutating(job_type: JobType) -> bool {
        Self::descriptor(job_type).mutating
    }

    /// Validate a `params` object against the descriptor's declared keys:
    /// every required key must be present, and no unknown keys are allowed.
    pub fn validate_params(job_type: JobType, params: &serde_json::Value) -> Result<(), String> {
        let descriptor = Self::descriptor(job_type);
        let obj = params
            .as_object()
            .ok_or_else(|| "params must be a JSON object".to_string())?;

        for required in descriptor.required_param_keys {
            if !obj.contains_key(*required) {
                return Err(format!("missing required param '{required}'"));
            }
        }

        for key in obj.keys() {
            if !descriptor.param_keys.contains(&key.as_str()) {
                return Err(format!("unknown param '{key}'"));
            }
        }

        Ok(())
    }
}
