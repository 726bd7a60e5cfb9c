//! fuzz-triage - CI fuzz-failure triage
//!
//! Runs a fuzz campaign against a working tree. A clean exit ends the
//! run; a failure is triaged into a remote corpus branch and the tree is
//! restored to a clean state.

use anyhow::{Context, Result};
use clap::Parser;
use fuzz_triage::{FuzzCampaign, GithubClient, TokioCommandRunner};
use fuzz_triage_core::{CampaignOutcome, FuzzRunConfig};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "fuzz-triage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Triage CI fuzz failures into remote corpus branches", long_about = None)]
struct Cli {
    /// Repository slug (owner/name)
    #[arg(long)]
    repo: String,

    /// Bearer token for the GraphQL endpoint
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GraphQL endpoint URL
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = "https://api.github.com/graphql")]
    endpoint: String,

    /// Package selector pattern handed to the fuzz tool
    #[arg(long, default_value = "./...")]
    package: String,

    /// Working directory for the campaign
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Regular expression selecting fuzz targets
    #[arg(long = "fuzz")]
    fuzz_regexp: String,

    /// Fuzz campaign duration (e.g. 5m)
    #[arg(long, default_value = "5m")]
    fuzztime: String,

    /// Minimization duration (e.g. 1m)
    #[arg(long, default_value = "1m")]
    minimize_time: String,

    /// Prefix for published branch names
    #[arg(long, default_value = "fuzz")]
    branch_prefix: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    fuzz_triage::init_tracing(cli.json, level);

    let config = FuzzRunConfig {
        repo_slug: cli.repo,
        token: cli.token,
        endpoint: cli.endpoint,
        package_pattern: cli.package,
        workdir: cli.workdir,
        fuzz_regexp: cli.fuzz_regexp,
        fuzz_time: cli.fuzztime,
        fuzz_minimize_time: cli.minimize_time,
        branch_prefix: cli.branch_prefix,
    };
    config.validate().context("invalid configuration")?;

    let runner = TokioCommandRunner;
    let remote = GithubClient::new(&config.endpoint, &config.token);
    let outcome = FuzzCampaign::new(&config, &runner, &remote)
        .run()
        .await
        .context("fuzz triage failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        CampaignOutcome::Clean => println!("fuzz campaign clean"),
        CampaignOutcome::Failure(report) => match &report.finding {
            Some(finding) => {
                println!("fuzz failure published to branch {}", finding.branch);
                if let Some(error) = &report.publish_error {
                    println!("publication error: {error}");
                }
            }
            None => println!(
                "fuzz failure without an attributable corpus entry (exit code {})",
                report.exit_code
            ),
        },
    }

    Ok(())
}
