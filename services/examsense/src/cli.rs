use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use examsense_core::{
    analysis::ExamAnalysis,
    analyzer::{Analyzer, LOCAL_SESSION, Submission},
    attachment::DocumentSource,
    presentation::render,
    reasoning::ReasoningClient,
    schema::response_schema,
    settings::Provider,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "examsense", version)]
#[command(about = "Turn a syllabus and past exam papers into a prioritized study plan")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a syllabus against past exam questions
    Analyze(AnalyzeArgs),

    /// Print the JSON schema every analysis must satisfy
    Schema,
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Syllabus text, pasted inline
    #[arg(long, conflicts_with = "syllabus_text_file")]
    pub syllabus_text: Option<String>,

    /// Read the syllabus text from a file
    #[arg(long)]
    pub syllabus_text_file: Option<PathBuf>,

    /// Syllabus document (PDF or image); repeat for several
    #[arg(long = "syllabus-file")]
    pub syllabus_files: Vec<PathBuf>,

    /// Past questions, pasted inline
    #[arg(long, conflicts_with = "questions_text_file")]
    pub questions_text: Option<String>,

    /// Read the past questions from a file
    #[arg(long)]
    pub questions_text_file: Option<PathBuf>,

    /// Past question paper (PDF or image); repeat for several
    #[arg(long = "question-file")]
    pub question_files: Vec<PathBuf>,

    /// Print the validated analysis as JSON instead of the dashboard
    #[arg(long)]
    pub json: bool,

    /// Reasoning backend (gemini or openai); overrides REASONING_PROVIDER
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Model id; overrides ANALYSIS_MODEL
    #[arg(long)]
    pub model: Option<String>,
}

fn read_text(inline: &Option<String>, file: &Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text from {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn documents(paths: &[PathBuf]) -> Vec<DocumentSource> {
    paths.iter().map(DocumentSource::from_path).collect()
}

impl AnalyzeArgs {
    /// Gathers text and document paths into a submission. Documents are only
    /// referenced here; the analyzer reads them.
    pub fn submission(&self) -> Result<Submission> {
        Ok(Submission {
            syllabus_text: read_text(&self.syllabus_text, &self.syllabus_text_file)?,
            questions_text: read_text(&self.questions_text, &self.questions_text_file)?,
            syllabus_files: documents(&self.syllabus_files),
            question_files: documents(&self.question_files),
        })
    }
}

/// Formats an analysis for stdout.
pub fn format_analysis(analysis: &ExamAnalysis, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(analysis)?)
    } else {
        Ok(render(analysis).to_string())
    }
}

pub fn format_schema() -> Result<String> {
    Ok(serde_json::to_string_pretty(response_schema())?)
}

/// Runs one analysis against `client` and returns what should be printed.
pub async fn analyze(
    client: Arc<dyn ReasoningClient>,
    submission: &Submission,
    json: bool,
) -> Result<String> {
    let analyzer = Analyzer::new(client);
    let analysis = analyzer.analyze(LOCAL_SESSION, submission).await?;
    format_analysis(&analysis, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use examsense_core::{
        composer::ComposedRequest,
        error::{AnalysisError, GENERATION_FAILED_MESSAGE, RemoteError},
    };
    use std::io::Write;

    const ENTROPY_PAYLOAD: &str = r#"{"syllabus":[{"title":"Unit 1: Thermodynamics","topics":[{"name":"Entropy","priority":"High","depth":"Conceptual","reasoning":"asked in 2019 and 2021"}]}],"keyInsights":["Entropy recurs"],"studyPlan":{"masterNow":["Entropy"],"deepDive":[],"quickRevision":[]}}"#;

    struct FixedClient(&'static str);

    #[async_trait]
    impl ReasoningClient for FixedClient {
        fn provider(&self) -> &'static str {
            "fixed"
        }

        async fn generate(&self, _request: &ComposedRequest) -> Result<String, RemoteError> {
            Ok(self.0.to_string())
        }
    }

    fn entropy_args() -> AnalyzeArgs {
        AnalyzeArgs {
            syllabus_text: Some("Unit 1: Thermodynamics".to_string()),
            questions_text: Some("Explain entropy (2019, 2021)".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from([
            "examsense",
            "analyze",
            "--syllabus-text",
            "Unit 1",
            "--question-file",
            "2019.pdf",
            "--question-file",
            "2021.png",
            "--provider",
            "openai",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.syllabus_text.as_deref(), Some("Unit 1"));
                assert_eq!(
                    args.question_files,
                    [PathBuf::from("2019.pdf"), PathBuf::from("2021.png")]
                );
                assert_eq!(args.provider, Some(Provider::OpenAI));
                assert!(args.json);
            }
            Commands::Schema => panic!("Expected analyze command"),
        }
    }

    #[test]
    fn test_inline_and_file_text_conflict() {
        let result = Cli::try_parse_from([
            "examsense",
            "analyze",
            "--syllabus-text",
            "Unit 1",
            "--syllabus-text-file",
            "syllabus.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = Cli::try_parse_from(["examsense", "analyze", "--provider", "claude"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_reads_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let questions_path = dir.path().join("questions.txt");
        std::fs::File::create(&questions_path)
            .unwrap()
            .write_all(b"Q1. Define entropy.")
            .unwrap();

        let args = AnalyzeArgs {
            syllabus_files: vec![dir.path().join("syllabus.pdf")],
            questions_text_file: Some(questions_path),
            ..Default::default()
        };
        let submission = args.submission().unwrap();

        assert!(submission.syllabus_text.is_empty());
        assert_eq!(submission.questions_text, "Q1. Define entropy.");
        assert_eq!(submission.syllabus_files.len(), 1);
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn test_missing_text_file_is_an_error() {
        let args = AnalyzeArgs {
            syllabus_text_file: Some(PathBuf::from("/nonexistent/syllabus.txt")),
            ..Default::default()
        };
        let err = args.submission().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/syllabus.txt"));
    }

    #[tokio::test]
    async fn test_analyze_prints_dashboard() {
        let submission = entropy_args().submission().unwrap();
        let output = analyze(Arc::new(FixedClient(ENTROPY_PAYLOAD)), &submission, false)
            .await
            .unwrap();

        assert!(output.contains("Syllabus & Weightage Breakdown"));
        assert!(output.contains("Key Exam Insights"));
        assert!(output.contains("High-ROI Study Plan"));
        assert!(output.contains("Entropy [Conceptual | High Priority]"));
    }

    #[tokio::test]
    async fn test_analyze_prints_json() {
        let submission = entropy_args().submission().unwrap();
        let output = analyze(Arc::new(FixedClient(ENTROPY_PAYLOAD)), &submission, true)
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["studyPlan"]["masterNow"][0], "Entropy");
    }

    #[tokio::test]
    async fn test_analyze_error_keeps_analysis_error() {
        let submission = entropy_args().submission().unwrap();
        let err = analyze(Arc::new(FixedClient("   ")), &submission, false)
            .await
            .unwrap_err();

        let analysis_err = err.downcast_ref::<AnalysisError>().unwrap();
        assert_eq!(analysis_err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_schema_output_is_json() {
        let json: serde_json::Value = serde_json::from_str(&format_schema().unwrap()).unwrap();
        assert_eq!(json["type"], "object");
    }
}
