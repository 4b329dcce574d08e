//! Axum Handlers for the REST API
//!
//! `POST /analyses` turns a multipart upload into a [`Submission`] and runs it
//! through the shared [`Analyzer`](examsense_core::analyzer::Analyzer). The
//! other handlers are small read-only endpoints.

use axum::{
    extract::{ConnectInfo, Multipart, State, multipart::MultipartError},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use examsense_core::{
    analyzer::Submission, attachment::DocumentSource, error::AnalysisError,
    presentation::render, schema::response_schema,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};

use crate::{
    models::{AnalysisResponse, AnalyzeForm, ErrorResponse, HealthResponse},
    state::AppState,
};

/// Header that keys the single in-flight analysis per client.
pub const SESSION_HEADER: &str = "x-session-id";

/// The gate key for a request: the session header when present, otherwise
/// the peer's IP address.
pub fn session_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("peer:{}", peer.ip()))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    UnprocessableEntity(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::BadGateway(message) => {
                error!("Analysis generation failed: {}", message);
                (StatusCode::BAD_GATEWAY, message)
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let message = err.user_message();
        match err {
            AnalysisError::InputValidation => ApiError::BadRequest(message),
            AnalysisError::AnalysisInProgress(_) => ApiError::Conflict(message),
            AnalysisError::Encoding(_) => ApiError::UnprocessableEntity(message),
            AnalysisError::Remote(_) | AnalysisError::Decode(_) => ApiError::BadGateway(message),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::UnprocessableEntity(format!("Could not read upload: {}", err.body_text()))
    }
}

/// Collects the multipart parts into a submission, preserving file order.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "syllabusText" => submission.syllabus_text = field.text().await?,
            "questionsText" => submission.questions_text = field.text().await?,
            "syllabusFiles" | "questionFiles" => {
                let file_name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let media_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an unnamed empty part for a file input left blank.
                if bytes.is_empty() && file_name.is_none() {
                    continue;
                }
                let source = DocumentSource::Inline {
                    name: file_name.unwrap_or_else(|| "upload".to_string()),
                    media_type,
                    bytes: bytes.to_vec(),
                };
                if field_name == "syllabusFiles" {
                    submission.syllabus_files.push(source);
                } else {
                    submission.question_files.push(source);
                }
            }
            other => warn!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(submission)
}

/// Analyze a syllabus against past exam questions.
#[utoipa::path(
    post,
    path = "/analyses",
    request_body(content = AnalyzeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis generated", body = AnalysisResponse),
        (status = 400, description = "Syllabus or questions missing", body = ErrorResponse),
        (status = 409, description = "An analysis is already running for this session", body = ErrorResponse),
        (status = 422, description = "An uploaded document could not be read", body = ErrorResponse),
        (status = 502, description = "The reasoning backend failed or answered unusably", body = ErrorResponse)
    ),
    params(
        ("x-session-id" = Option<String>, Header, description = "Client session; defaults to the caller's IP address")
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let session = session_key(&headers, peer);

    let submission = read_submission(multipart).await?;
    info!(
        session = %session,
        syllabus_files = submission.syllabus_files.len(),
        question_files = submission.question_files.len(),
        "Received analysis request"
    );

    let analysis = state.analyzer.analyze(&session, &submission).await?;
    let view = render(&analysis);
    Ok(Json(AnalysisResponse { analysis, view }))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// The JSON schema every analysis must satisfy.
#[utoipa::path(
    get,
    path = "/schema",
    responses((status = 200, description = "Response schema descriptor", content_type = "application/json"))
)]
pub async fn schema() -> Json<serde_json::Value> {
    Json(response_schema().clone())
}
