//! Fuzz campaign orchestration.

use crate::detector::detect_new_corpus;
use crate::git::GitWorkspace;
use crate::github::RemoteRepository;
use crate::gotool;
use crate::process::CommandRunner;
use fuzz_triage_core::{
    BranchRequest, CampaignOutcome, CorpusArtifact, CorpusFinding, FailureReport, FuzzRunConfig,
    RepositoryRef, Result,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Top-level coordinator for one triage run.
///
/// Runs the fuzz campaign, and on a non-zero exit drives
/// detect -> resolve -> publish -> cleanup in sequence. The campaign is
/// never re-run; a second attempt would consume additional fuzz budget.
pub struct FuzzCampaign<'a> {
    config: &'a FuzzRunConfig,
    runner: &'a dyn CommandRunner,
    remote: &'a dyn RemoteRepository,
}

impl<'a> FuzzCampaign<'a> {
    pub fn new(
        config: &'a FuzzRunConfig,
        runner: &'a dyn CommandRunner,
        remote: &'a dyn RemoteRepository,
    ) -> Self {
        FuzzCampaign {
            config,
            runner,
            remote,
        }
    }

    /// Execute the campaign and return its outcome.
    ///
    /// The fuzz subprocess exit code is data: zero short-circuits to
    /// `Clean` with no git operations and no network calls; non-zero
    /// triggers report generation, which always completes before this
    /// returns.
    pub async fn run(&self) -> Result<CampaignOutcome> {
        let start = Instant::now();
        info!(
            fuzz = %self.config.fuzz_regexp,
            fuzztime = %self.config.fuzz_time,
            "starting fuzz campaign"
        );

        let fuzz = self
            .runner
            .run(gotool::GO, &gotool::fuzz_command(self.config), &self.config.workdir)
            .await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if fuzz.success() {
            info!(duration_ms, "fuzz campaign clean");
            return Ok(CampaignOutcome::Clean);
        }
        info!(exit_code = fuzz.exit_code, duration_ms, "fuzz campaign failed; triaging");

        let mut report = FailureReport::new(fuzz.exit_code, fuzz.stdout, duration_ms);
        let git = GitWorkspace::new(self.runner, &self.config.workdir);

        // The branch must target pre-run state; read HEAD before staging.
        let head_oid = git.head_oid().await?;

        let Some(artifact) = detect_new_corpus(self.runner, &self.config.workdir).await? else {
            // Zero or multiple candidates. Unstage what detection staged
            // and leave the files alone: identity was never established.
            git.restore_index().await?;
            return Ok(CampaignOutcome::Failure(report));
        };

        let (owner, name) = self.config.split_slug()?;
        let repository_id = self.remote.resolve_repository_id(owner, name).await?;
        let repo = RepositoryRef {
            id: repository_id,
            head_oid,
        };

        let branch = artifact.branch_name(&self.config.branch_prefix);
        let request = BranchRequest::new(&repo, branch.clone());
        let publish_error = match self.remote.create_branch(&request).await {
            Ok(receipt) if receipt.created() => {
                info!(%branch, oid = %repo.head_oid, "published corpus branch");
                None
            }
            Ok(receipt) => {
                let detail = receipt
                    .error_summary()
                    .unwrap_or_else(|| "ref was not created".to_string());
                warn!(%branch, error = %detail, "branch publication rejected");
                Some(detail)
            }
            Err(e) => {
                warn!(%branch, error = %e, "branch publication failed");
                Some(e.to_string())
            }
        };

        // Cleanup runs even when publication failed; the runner
        // environment must not keep stray fuzz output.
        let import_path = self.resolve_import_path(&artifact).await;
        let repro = self
            .runner
            .run(gotool::GO, &gotool::repro_command(&artifact), &self.config.workdir)
            .await?;
        git.restore_index().await?;
        tokio::fs::remove_file(self.config.workdir.join(&artifact.path)).await?;

        report.repro_output = Some(repro.stdout);
        report.publish_error = publish_error;
        report.finding = Some(CorpusFinding {
            package: artifact.package,
            fuzz_func: artifact.fuzz_func,
            corpus_id: artifact.corpus_id,
            import_path,
            branch,
            base_oid: repo.head_oid,
        });

        Ok(CampaignOutcome::Failure(report))
    }

    /// Human-readable import path for the report, best effort.
    async fn resolve_import_path(&self, artifact: &CorpusArtifact) -> Option<String> {
        match self
            .runner
            .run(gotool::GO, &gotool::list_command(artifact), &self.config.workdir)
            .await
        {
            Ok(output) if output.success() => {
                let path = output.stdout.lines().next().unwrap_or("").trim();
                if path.is_empty() {
                    None
                } else {
                    Some(path.to_string())
                }
            }
            Ok(output) => {
                debug!(exit_code = output.exit_code, "package listing failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "package listing could not run");
                None
            }
        }
    }
}
