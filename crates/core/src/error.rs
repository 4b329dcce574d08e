//! Error taxonomy for the analysis pipeline.
//!
//! Each stage has its own error type so diagnostics can tell exactly where a
//! submission failed. [`AnalysisError::user_message`] collapses them into the
//! short set of messages an end user is shown.

use thiserror::Error;

/// Shown when a submission lacks either a syllabus or a question source.
pub const INPUT_REQUIRED_MESSAGE: &str =
    "Please provide both syllabus and past questions to continue.";

/// Shown for every failure to turn the backend's answer into an analysis.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Could not generate analysis. Please ensure your inputs are clear and try again.";

/// Shown when a session re-submits while its previous analysis is still running.
pub const IN_PROGRESS_MESSAGE: &str =
    "An analysis is already in progress. Please wait for it to finish.";

/// A user-supplied document could not be turned into an attachment.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("failed to read document '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("document '{name}' is empty")]
    Empty { name: String },
}

impl EncodingError {
    /// The display name of the document that failed.
    pub fn document_name(&self) -> &str {
        match self {
            EncodingError::Read { name, .. } | EncodingError::Empty { name } => name,
        }
    }
}

/// The reasoning backend could not be reached or rejected the request.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend error: {0}")]
    Api(String),
}

/// The backend answered, but not with a usable analysis document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("backend returned an empty response")]
    EmptyResponse,
    #[error("backend response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("schema violation at {path}: {reason}")]
    SchemaViolation { path: String, reason: String },
}

/// Every way a single analysis submission can fail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("submission is missing syllabus or question input")]
    InputValidation,
    #[error("an analysis is already in flight for session '{0}'")]
    AnalysisInProgress(String),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl AnalysisError {
    /// The message shown to the end user.
    ///
    /// The three decode failures share one message; none of them is
    /// actionable beyond retrying with clearer input.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InputValidation => INPUT_REQUIRED_MESSAGE.to_string(),
            AnalysisError::AnalysisInProgress(_) => IN_PROGRESS_MESSAGE.to_string(),
            AnalysisError::Encoding(err) => format!(
                "Could not read '{}'. Please check the file and upload it again.",
                err.document_name()
            ),
            AnalysisError::Remote(err) => format!("Analysis request failed: {}", err),
            AnalysisError::Decode(_) => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// A stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InputValidation => "input_validation",
            AnalysisError::AnalysisInProgress(_) => "analysis_in_progress",
            AnalysisError::Encoding(_) => "encoding",
            AnalysisError::Remote(_) => "remote",
            AnalysisError::Decode(DecodeError::EmptyResponse) => "empty_response",
            AnalysisError::Decode(DecodeError::MalformedJson(_)) => "malformed_json",
            AnalysisError::Decode(DecodeError::SchemaViolation { .. }) => "schema_violation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failures_collapse_to_one_user_message() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            AnalysisError::from(DecodeError::EmptyResponse),
            AnalysisError::from(DecodeError::MalformedJson(malformed)),
            AnalysisError::from(DecodeError::SchemaViolation {
                path: "$.syllabus".into(),
                reason: "missing required field".into(),
            }),
        ];

        for err in &errors {
            assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
        }
        let kinds: Vec<_> = errors.iter().map(AnalysisError::kind).collect();
        assert_eq!(kinds, ["empty_response", "malformed_json", "schema_violation"]);
    }

    #[test]
    fn test_remote_error_is_surfaced_verbatim() {
        let err = AnalysisError::from(RemoteError::Status {
            status: 429,
            body: "quota exceeded".into(),
        });
        assert_eq!(
            err.user_message(),
            "Analysis request failed: backend returned HTTP 429: quota exceeded"
        );
        assert_eq!(err.kind(), "remote");
    }

    #[test]
    fn test_encoding_error_names_the_document() {
        let err = AnalysisError::from(EncodingError::Empty {
            name: "syllabus.pdf".into(),
        });
        assert!(err.user_message().contains("'syllabus.pdf'"));
        assert_eq!(err.kind(), "encoding");
    }

    #[test]
    fn test_input_validation_message() {
        assert_eq!(
            AnalysisError::InputValidation.user_message(),
            "Please provide both syllabus and past questions to continue."
        );
    }
}
