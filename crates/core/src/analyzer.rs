//! Analysis Pipeline
//!
//! Wires the stages together for one submission:
//! input check -> gate -> encode (concurrent, all-or-nothing) -> compose ->
//! remote call -> decode. Every analysis is independent; the only state
//! shared between them is the in-flight gate.

use crate::{
    analysis::ExamAnalysis,
    attachment::{DocumentSource, encode_all},
    composer::compose,
    decoder::decode,
    error::AnalysisError,
    gate::SubmissionGate,
    reasoning::ReasoningClient,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Session key used by single-user front ends such as the CLI.
pub const LOCAL_SESSION: &str = "local";

/// Everything a user hands in for one analysis.
///
/// The analyzer only borrows a submission, so the caller still holds the
/// original text and files after a failure.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub syllabus_text: String,
    pub questions_text: String,
    pub syllabus_files: Vec<DocumentSource>,
    pub question_files: Vec<DocumentSource>,
}

impl Submission {
    pub fn has_syllabus(&self) -> bool {
        !self.syllabus_text.trim().is_empty() || !self.syllabus_files.is_empty()
    }

    pub fn has_questions(&self) -> bool {
        !self.questions_text.trim().is_empty() || !self.question_files.is_empty()
    }

    /// Rejects submissions missing either side before anything is read.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.has_syllabus() && self.has_questions() {
            Ok(())
        } else {
            Err(AnalysisError::InputValidation)
        }
    }
}

/// Runs submissions through the pipeline against one reasoning backend.
pub struct Analyzer {
    client: Arc<dyn ReasoningClient>,
    gate: SubmissionGate,
}

impl Analyzer {
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        Self {
            client,
            gate: SubmissionGate::new(),
        }
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    /// Analyzes one submission on behalf of `session`.
    ///
    /// No partial result is ever returned: any failure yields an error and
    /// leaves nothing behind but the released permit.
    #[instrument(
        name = "analysis",
        skip_all,
        fields(session = %session, provider = self.client.provider())
    )]
    pub async fn analyze(
        &self,
        session: &str,
        submission: &Submission,
    ) -> Result<ExamAnalysis, AnalysisError> {
        let result = self.run(session, submission).await;
        match &result {
            Ok(analysis) => info!(
                units = analysis.syllabus().len(),
                topics = analysis.topic_count(),
                "Analysis completed"
            ),
            Err(err) => warn!(kind = err.kind(), error = %err, "Analysis failed"),
        }
        result
    }

    async fn run(
        &self,
        session: &str,
        submission: &Submission,
    ) -> Result<ExamAnalysis, AnalysisError> {
        submission.validate()?;
        let _permit = self.gate.try_acquire(session)?;

        let (syllabus_attachments, question_attachments) = futures::try_join!(
            encode_all(&submission.syllabus_files),
            encode_all(&submission.question_files)
        )?;
        info!(
            syllabus_attachments = syllabus_attachments.len(),
            question_attachments = question_attachments.len(),
            "Attachments encoded"
        );

        let request = compose(
            &submission.syllabus_text,
            &submission.questions_text,
            syllabus_attachments,
            question_attachments,
        );

        let raw_text = self.client.generate(&request).await?;
        info!(response_len = raw_text.len(), "Reasoning backend responded");

        Ok(decode(&raw_text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::Priority,
        error::{DecodeError, GENERATION_FAILED_MESSAGE, RemoteError},
        reasoning::MockReasoningClient,
    };
    use mockall::predicate::function;

    const ENTROPY_PAYLOAD: &str = r#"{"syllabus":[{"title":"Unit 1","topics":[{"name":"Entropy","priority":"High","depth":"Conceptual","reasoning":"asked twice"}]}],"keyInsights":["Entropy recurs"],"studyPlan":{"masterNow":["Entropy"],"deepDive":[],"quickRevision":[]}}"#;

    fn mock_client() -> MockReasoningClient {
        let mut client = MockReasoningClient::new();
        client.expect_provider().return_const("mock");
        client
    }

    fn thermodynamics() -> Submission {
        Submission {
            syllabus_text: "Unit 1: Thermodynamics".into(),
            questions_text: "Explain entropy (2019, 2021)".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_entropy_scenario() {
        let mut client = mock_client();
        client
            .expect_generate()
            .with(function(|request: &crate::composer::ComposedRequest| {
                request.prompt.contains("Unit 1: Thermodynamics")
                    && request.prompt.contains("Explain entropy (2019, 2021)")
                    && request.attachments.is_empty()
            }))
            .times(1)
            .returning(|_| Ok(ENTROPY_PAYLOAD.to_string()));

        let analyzer = Analyzer::new(Arc::new(client));
        let analysis = analyzer
            .analyze(LOCAL_SESSION, &thermodynamics())
            .await
            .unwrap();

        assert_eq!(analysis.syllabus().len(), 1);
        assert_eq!(analysis.topic_count(), 1);
        assert_eq!(analysis.syllabus()[0].topics()[0].priority(), Priority::High);
        assert!(!analyzer.gate().is_busy(LOCAL_SESSION));
    }

    #[tokio::test]
    async fn test_empty_inputs_make_no_remote_call() {
        let mut client = mock_client();
        client.expect_generate().times(0);
        let analyzer = Analyzer::new(Arc::new(client));

        let blank = Submission {
            syllabus_text: "  ".into(),
            questions_text: String::new(),
            ..Default::default()
        };
        let err = analyzer.analyze(LOCAL_SESSION, &blank).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation));
    }

    #[tokio::test]
    async fn test_missing_questions_rejected_before_reading_files() {
        let mut client = mock_client();
        client.expect_generate().times(0);
        let analyzer = Analyzer::new(Arc::new(client));

        // The file does not exist; validation must fail first.
        let submission = Submission {
            syllabus_files: vec![DocumentSource::from_path("/nonexistent/syllabus.pdf")],
            ..Default::default()
        };
        let err = analyzer.analyze(LOCAL_SESSION, &submission).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation));
    }

    #[tokio::test]
    async fn test_unreadable_attachment_aborts_whole_submission() {
        let mut client = mock_client();
        client.expect_generate().times(0);
        let analyzer = Analyzer::new(Arc::new(client));

        let mut submission = thermodynamics();
        submission.question_files = vec![
            DocumentSource::Inline {
                name: "ok.png".into(),
                media_type: None,
                bytes: b"png".to_vec(),
            },
            DocumentSource::from_path("/nonexistent/paper.pdf"),
        ];
        let err = analyzer.analyze(LOCAL_SESSION, &submission).await.unwrap_err();
        assert_eq!(err.kind(), "encoding");
        assert!(!analyzer.gate().is_busy(LOCAL_SESSION));
    }

    #[tokio::test]
    async fn test_attachments_are_sent_syllabus_first() {
        let mut client = mock_client();
        client
            .expect_generate()
            .withf(|request| {
                let types: Vec<_> = request
                    .attachments
                    .iter()
                    .map(|a| a.media_type.as_str())
                    .collect();
                types == ["application/pdf", "image/png", "image/jpeg"]
            })
            .times(1)
            .returning(|_| Ok(ENTROPY_PAYLOAD.to_string()));
        let analyzer = Analyzer::new(Arc::new(client));

        let inline = |name: &str| DocumentSource::Inline {
            name: name.to_string(),
            media_type: None,
            bytes: vec![1, 2, 3],
        };
        let submission = Submission {
            syllabus_files: vec![inline("syllabus.pdf"), inline("page2.png")],
            question_files: vec![inline("paper.jpg")],
            ..Default::default()
        };
        assert!(analyzer.analyze(LOCAL_SESSION, &submission).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_backend_response_yields_generic_message() {
        let mut client = mock_client();
        client
            .expect_generate()
            .times(1)
            .returning(|_| Ok(String::new()));
        let analyzer = Analyzer::new(Arc::new(client));

        let submission = thermodynamics();
        let err = analyzer.analyze(LOCAL_SESSION, &submission).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Decode(DecodeError::EmptyResponse)));
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
        // Inputs are still available for the user to edit and resubmit.
        assert_eq!(submission.syllabus_text, "Unit 1: Thermodynamics");
        assert!(!analyzer.gate().is_busy(LOCAL_SESSION));
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_retried() {
        let mut client = mock_client();
        client.expect_generate().times(1).returning(|_| {
            Err(RemoteError::Status {
                status: 503,
                body: "overloaded".into(),
            })
        });
        let analyzer = Analyzer::new(Arc::new(client));

        let err = analyzer
            .analyze(LOCAL_SESSION, &thermodynamics())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "remote");
        assert!(!analyzer.gate().is_busy(LOCAL_SESSION));
    }

    #[tokio::test]
    async fn test_resubmission_while_in_flight_is_rejected() {
        let mut client = mock_client();
        client.expect_generate().times(0);
        let analyzer = Analyzer::new(Arc::new(client));

        let _held = analyzer.gate().try_acquire("student-1").unwrap();
        let err = analyzer
            .analyze("student-1", &thermodynamics())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisInProgress(_)));
    }

    #[test]
    fn test_submission_sources() {
        let mut submission = Submission::default();
        assert!(!submission.has_syllabus());
        submission.syllabus_files.push(DocumentSource::from_path("a.pdf"));
        assert!(submission.has_syllabus());
        assert!(!submission.has_questions());
        submission.questions_text = "Q1".into();
        assert!(submission.validate().is_ok());
    }
}
