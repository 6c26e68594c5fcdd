#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod output;

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use finder::error::get_error_info;
use finder::inventory::build_inventory;
use finder::{
    list_repositories, resolve_provenance, resolve_report_links, scan_account, FinderError,
    GitHubClient, ProgressSink, RepoName, Result, TracingProgress,
};
use output::{emit_output, render_inventories, render_repositories, StderrProgress};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.name();
    if let Err(err) = run(cli).await {
        error!(command, code = err.code(), "{err}");
        eprintln!("Error: {err}");
        if let Some((_, fix)) = get_error_info(err.code()) {
            eprintln!("Hint: {fix}");
        }
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Validate arguments before any credential or network work.
    let target = match &cli.command {
        Commands::Links { repo } => Some(RepoName::parse(repo)?),
        Commands::Repos | Commands::Scan { .. } => None,
    };

    let config = config::load_config(cli.config, cli.token, cli.per_page).await?;
    info!(?config, "configuration loaded");
    let client = GitHubClient::new(&config.client_options())?;
    let settings = config.settings();
    let progress: &dyn ProgressSink = match cli.output {
        OutputFormat::Text => &StderrProgress,
        OutputFormat::Json => &TracingProgress,
    };

    match cli.command {
        Commands::Repos => {
            let listed = list_repositories(&client, &settings).await;
            if let Some(err) = listed.interrupted.as_ref().filter(|_| listed.failed_outright()) {
                return Err(FinderError::ApiError(err.to_string()));
            }
            match cli.output {
                OutputFormat::Text => print!("{}", render_repositories(&listed.items)),
                OutputFormat::Json => emit_output(
                    cli.output,
                    "repos",
                    json!({ "repos": listed.items, "complete": listed.interrupted.is_none() }),
                ),
            }
        }
        Commands::Scan { links } => {
            let mut report = scan_account(&client, &settings, progress).await;
            let mut summaries = Vec::new();
            if links {
                (report, summaries) =
                    resolve_report_links(&client, &settings, report, progress).await;
            }
            match cli.output {
                OutputFormat::Text => print!("{}", render_inventories(report.repos())),
                OutputFormat::Json => {
                    let summaries: Vec<_> = summaries
                        .into_iter()
                        .map(|(repo, summary)| json!({ "repo": repo, "summary": summary }))
                        .collect();
                    emit_output(
                        cli.output,
                        "scan",
                        json!({
                            "total_size_in_bytes": report.total_size_in_bytes(),
                            "artifact_count": report.artifact_count(),
                            "repos": serde_json::to_value(&report)?,
                            "resolutions": summaries,
                        }),
                    );
                }
            }
        }
        Commands::Links { .. } => {
            let repo = target.ok_or_else(|| {
                FinderError::Internal("repository argument was not parsed".to_string())
            })?;
            let inventory = build_inventory(&client, &settings, &repo, progress).await;
            let result = resolve_provenance(&client, &settings, inventory, progress).await;
            match cli.output {
                OutputFormat::Text => {
                    print!("{}", render_inventories(std::slice::from_ref(result.inventory())));
                }
                OutputFormat::Json => emit_output(
                    cli.output,
                    "links",
                    json!({
                        "repo": repo,
                        "summary": result.summary(),
                        "artifacts": serde_json::to_value(result.artifacts())?,
                    }),
                ),
            }
        }
    }

    Ok(())
}
