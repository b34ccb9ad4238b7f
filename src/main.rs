mod analysis;
mod config;
mod issue;
mod report;
mod server;
mod summarize;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// Issue Summarizer — fetches a GitHub issue with its comments and summarizes
/// it with a hosted Hugging Face model.
#[derive(Parser, Debug)]
#[command(name = "issue-summarizer", version, about)]
struct Cli {
    /// Config file path (defaults to .issue-summarizer.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service exposing POST /analyze
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze a single issue and print the result
    Analyze {
        /// Repository URL (e.g., https://github.com/facebook/react)
        repo_url: String,

        /// Issue number within the repository
        issue_number: u64,

        /// Optional output file path for a markdown report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    debug!(
        github_api = %config.github.api_base,
        inference_api = %config.inference.api_base,
        model = %config.inference.model,
        "loaded configuration"
    );

    let issues = issue::GitHubClient::new(&config.github)?;
    let summarizer = summarize::HuggingFaceClient::new(&config.inference)?;
    if summarizer.is_configured() {
        info!(model = %config.inference.model, "Hugging Face API key loaded");
    } else {
        warn!("Hugging Face API key not found; set HUGGINGFACE_API_KEY. Analyses will fail until it is configured");
    }

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = server::AppState {
                issues: Arc::new(issues),
                summarizer: Arc::new(summarizer),
            };
            server::serve(&config.server.addr(), state).await?;
        }
        Command::Analyze {
            repo_url,
            issue_number,
            output,
        } => {
            let _main_span = info_span!("analyze", repo_url = %repo_url, issue = issue_number).entered();

            let request = analysis::AnalyzeRequest {
                repo_url,
                issue_number,
            };
            let result = analysis::run(&request, &issues, &summarizer).await?;

            info!("generating report");
            let built_report = report::build(&request.repo_url, request.issue_number, result);
            report::output(&built_report, output.as_deref())?;
            info!("done");
        }
    }

    Ok(())
}
