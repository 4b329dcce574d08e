//! API Models
//!
//! Request and response bodies for the HTTP surface, annotated with `utoipa`
//! for the generated OpenAPI document. The analysis itself is defined in
//! `examsense-core` and documented here as an opaque object.

use examsense_core::{analysis::ExamAnalysis, presentation::AnalysisView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A validated analysis plus its rendered dashboard.
#[derive(Serialize, ToSchema, Debug)]
pub struct AnalysisResponse {
    /// The validated backend output, field for field.
    #[schema(value_type = Object)]
    pub analysis: ExamAnalysis,
    /// Units, insights and study-plan tiers grouped for display.
    #[schema(value_type = Object)]
    pub view: AnalysisView,
}

/// Multipart form accepted by `POST /analyses`. Documentation only; the
/// handler reads the parts as a stream.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct AnalyzeForm {
    #[schema(example = "Unit 1: Thermodynamics")]
    pub syllabus_text: Option<String>,
    #[schema(example = "Explain entropy (2019, 2021)")]
    pub questions_text: Option<String>,
    /// Syllabus documents (PDF or images), in order.
    pub syllabus_files: Option<Vec<String>>,
    /// Past question papers (PDF or images), in order.
    pub question_files: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}
