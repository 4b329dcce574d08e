//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{AnalysisResponse, AnalyzeForm, ErrorResponse, HealthResponse},
    state::AppState,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::analyze, handlers::health, handlers::schema),
    components(schemas(AnalysisResponse, AnalyzeForm, ErrorResponse, HealthResponse)),
    tags(
        (name = "ExamSense API", description = "Syllabus and past-paper analysis for exam preparation")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let max_upload_bytes = app_state.config.max_upload_bytes;

    let api_router = Router::new()
        .route("/analyses", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .route("/schema", get(handlers::schema))
        // The configured limit replaces axum's 2 MB default for uploads.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
