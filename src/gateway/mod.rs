//! API Gateway: the loopback HTTP surface.
//!
//! State is extracted per-handler, a header-checking middleware is layered
//! over a protected sub-router, and `TraceLayer`/`CorsLayer` wrap the
//! outer router.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::error::GatewayError;
use crate::model::{JobStatus, JobType, JobView, hex_encode, now_ms};
use crate::registry::ToolRegistry;
use crate::store::CpStore;
use crate::workspace::Allowlist;

const SESSION_HEADER: &str = "x-coworker-session";
const TOKEN_HEADER: &str = "x-coworker-token";

/// Longest a `/jobs/{id}` long-poll will wait before returning the current
/// status, regardless of the requested `wait_ms`.
const MAX_WAIT_MS: u64 = 60_000;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CpStore>,
    pub audit: AuditLog,
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/tools", get(list_tools))
        .route("/jobs", get(list_jobs).post(submit_job))
        .route("/jobs/{id}", get(get_job))
        .route("/jobs/{id}/result", get(get_result))
        .route("/approve", post(approve))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/handshake", post(handshake))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(GatewayError::Unauthorized)?;
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(GatewayError::Unauthorized)?;

    if !state.store.authenticate(session_id, token).await? {
        return Err(GatewayError::Unauthorized);
    }

    Ok(next.run(request).await)
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Serialize)]
struct HandshakeResponse {
    session_id: Uuid,
    token: String,
}

async fn handshake(State(state): State<AppState>) -> Result<Json<HandshakeResponse>, GatewayError> {
    let session = state.store.create_session().await?;
    Ok(Json(HandshakeResponse {
        session_id: session.session_id,
        token: session.token,
    }))
}

async fn list_tools() -> Json<&'static [crate::model::ToolDescriptor]> {
    Json(ToolRegistry::all())
}

#[derive(Deserialize)]
struct SubmitJobRequest {
    dedupe_key: String,
    #[serde(rename = "type")]
    job_type: String,
    allowed_roots: Vec<String>,
    params: serde_json::Value,
    approval_token: Option<String>,
}

#[derive(Serialize)]
struct SubmitJobResponse {
    job_id: Uuid,
    created: bool,
}

/// Path-shaped parameter keys the Gateway knows to canonicalize and check
/// against `allowed_roots` before a job row is ever created.
const PATH_PARAM_KEYS: &[&str] = &["root", "path"];

async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitJobRequest>,
) -> Result<Json<SubmitJobResponse>, GatewayError> {
    let job_type = JobType::from_str_id(&req.job_type)
        .ok_or_else(|| GatewayError::InvalidArgument(format!("unknown job type '{}'", req.job_type)))?;

    ToolRegistry::validate_params(job_type, &req.params).map_err(GatewayError::InvalidArgument)?;

    if ToolRegistry::is_mutating(job_type) && req.approval_token.is_none() {
        return Err(GatewayError::ApprovalRequired);
    }

    let allowlist =
        Allowlist::new(&req.allowed_roots).map_err(|e| GatewayError::Forbidden(e.to_string()))?;

    if let Some(obj) = req.params.as_object() {
        for key in PATH_PARAM_KEYS {
            if let Some(value) = obj.get(*key).and_then(|v| v.as_str()) {
                allowlist
                    .check(value)
                    .map_err(|e| GatewayError::Forbidden(e.to_string()))?;
            }
        }
    }

    let (job_id, created) = state
        .store
        .submit_job(
            &req.dedupe_key,
            job_type,
            req.allowed_roots,
            req.params,
            req.approval_token,
        )
        .await?;

    Ok(Json(SubmitJobResponse { job_id, created }))
}

async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobView>>, GatewayError> {
    let jobs = state.store.list_jobs(200).await?;
    Ok(Json(jobs.iter().map(JobView::from).collect()))
}

#[derive(Deserialize)]
struct WaitQuery {
    wait_ms: Option<u64>,
}

fn parse_job_id(id: &str) -> Result<Uuid, GatewayError> {
    Uuid::parse_str(id).map_err(|_| GatewayError::NotFound)
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<WaitQuery>,
) -> Result<Json<JobView>, GatewayError> {
    let job_id = parse_job_id(&id)?;
    let wait_ms = query.wait_ms.map(|ms| ms.min(MAX_WAIT_MS));
    let deadline = wait_ms.map(|ms| tokio::time::Instant::now() + Duration::from_millis(ms));

    loop {
        let job = state.store.get_job(job_id).await?;
        let past_deadline = deadline.is_some_and(|d| tokio::time::Instant::now() >= d);
        if job.status.is_terminal() || deadline.is_none() || past_deadline {
            return Ok(Json(JobView::from(&job)));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[derive(Serialize)]
struct ResultResponse {
    bytes_base64: String,
    content_type: String,
}

async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResultResponse>, GatewayError> {
    let job_id = parse_job_id(&id)?;
    let job = state.store.get_job(job_id).await?;

    match job.status {
        JobStatus::Succeeded => {
            use base64::Engine as _;
            let result = state.store.get_result(job_id).await?;
            Ok(Json(ResultResponse {
                bytes_base64: base64::engine::general_purpose::STANDARD.encode(result.bytes),
                content_type: result.content_type,
            }))
        }
        JobStatus::Failed => Err(GatewayError::BadState(
            job.error_message.unwrap_or_else(|| "job failed".to_string()),
        )),
        JobStatus::Queued | JobStatus::Running => Err(GatewayError::NotReady),
    }
}

#[derive(Deserialize)]
struct ApproveRequest {
    plan_job_id: Uuid,
    ttl_seconds: i64,
}

#[derive(Serialize)]
struct ApproveResponse {
    approval_token: String,
    plan_hash: String,
    expires_at_ms: i64,
}

async fn approve(
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, GatewayError> {
    let job = state.store.get_job(req.plan_job_id).await?;
    if job.status != JobStatus::Succeeded {
        return Err(GatewayError::BadState("plan job is not SUCCEEDED".to_string()));
    }

    let result = state.store.get_result(req.plan_job_id).await?;
    let mut hasher = Sha256::new();
    hasher.update(&result.bytes);
    let hash: [u8; 32] = hasher.finalize().into();

    let ttl_ms = req.ttl_seconds.saturating_mul(1000);
    let approval = state
        .store
        .mint_approval(req.plan_job_id, hash, ttl_ms, now_ms())
        .await?;

    Ok(Json(ApproveResponse {
        approval_token: approval.token,
        plan_hash: hex_encode(&approval.plan_hash),
        expires_at_ms: approval.expires_at_ms,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        AppState {
            store: Arc::new(SqliteStore::open_in_memory().await.unwrap()),
            audit: AuditLog::new(),
        }
    }

    async fn handshake_creds(app: &Router) -> (String, String) {
        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/handshake")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (
            value["session_id"].as_str().unwrap().to_string(),
            value["token"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn missing_auth_headers_returns_401_but_handshake_does_not_require_them() {
        let app = router(test_state().await);

        let response = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/handshake")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn idempotent_submit_returns_same_job_id() {
        let app = router(test_state().await);
        let (session_id, token) = handshake_creds(&app).await;

        let body = json!({
            "dedupe_key": "k1",
            "type": "directory_scan",
            "allowed_roots": ["/tmp"],
            "params": {"root": "/tmp"},
        });

        let submit = |body: serde_json::Value| {
            let app = app.clone();
            let session_id = session_id.clone();
            let token = token.clone();
            async move {
                let response = app
                    .oneshot(
                        HttpRequest::builder()
                            .method("POST")
                            .uri("/jobs")
                            .header("content-type", "application/json")
                            .header(SESSION_HEADER, session_id)
                            .header(TOKEN_HEADER, token)
                            .body(Body::from(serde_json::to_vec(&body).unwrap()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
                serde_json::from_slice::<serde_json::Value>(&bytes).unwrap()
            }
        };

        let first = submit(body.clone()).await;
        let second = submit(body).await;
        assert_eq!(first["job_id"], second["job_id"]);
        assert_eq!(first["created"], true);
        assert_eq!(second["created"], false);
    }

    #[tokio::test]
    async fn path_escape_is_rejected_synchronously_with_no_job_row() {
        let app = router(test_state().await);
        let (session_id, token) = handshake_creds(&app).await;

        let body = json!({
            "dedupe_key": "k2",
            "type": "file_read",
            "allowed_roots": ["/tmp"],
            "params": {"path": "/tmp/../etc/passwd"},
        });

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/jobs")
                    .header("content-type", "application/json")
                    .header(SESSION_HEADER, session_id)
                    .header(TOKEN_HEADER, token)
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_job_type_is_rejected_with_typed_error_body() {
        let app = router(test_state().await);
        let (session_id, token) = handshake_creds(&app).await;

        let body = json!({
            "dedupe_key": "k3",
            "type": "summon_a_demon",
            "allowed_roots": ["/tmp"],
            "params": {},
        });

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/jobs")
                    .header("content-type", "application/json")
                    .header(SESSION_HEADER, session_id)
                    .header(TOKEN_HEADER, token)
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["code"], "InvalidArgument");
    }
}
