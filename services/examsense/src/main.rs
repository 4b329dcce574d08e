mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use examsense_core::{error::AnalysisError, settings::ReasoningSettings};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => {
            let submission = args.submission()?;
            // Reject incomplete input before asking for credentials.
            submission.validate()?;

            let settings = ReasoningSettings::from_env_with(args.provider, args.model.clone())?;
            tracing::info!(provider = %settings.provider, model = %settings.model, "Starting analysis");
            let output = cli::analyze(settings.build_client(), &submission, args.json).await?;
            println!("{}", output);
        }
        Commands::Schema => {
            println!("{}", cli::format_schema()?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // stdout carries the result; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AnalysisError>() {
                Some(analysis_err) => eprintln!("{}", analysis_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
