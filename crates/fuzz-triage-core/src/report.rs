//! Campaign outcomes and failure reports.
//!
//! The report carries the data an external formatter needs; rendering is
//! out of scope here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a full triage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CampaignOutcome {
    /// Fuzz subprocess exited zero; no git operations, no network calls.
    Clean,

    /// Fuzz subprocess failed; the report records what triage did about it.
    Failure(FailureReport),
}

impl CampaignOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, CampaignOutcome::Clean)
    }

    pub fn report(&self) -> Option<&FailureReport> {
        match self {
            CampaignOutcome::Failure(report) => Some(report),
            CampaignOutcome::Clean => None,
        }
    }
}

/// Everything captured from one failed fuzz campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    /// Triage run id.
    pub triage_id: Uuid,

    /// Fuzz subprocess exit code (always non-zero here).
    pub exit_code: i32,

    /// Captured fuzz subprocess output.
    pub fuzz_output: String,

    /// Fuzz campaign wall time in milliseconds.
    pub duration_ms: u64,

    /// The published corpus entry. `None` when zero or multiple candidate
    /// files were found and identity could not be attributed.
    pub finding: Option<CorpusFinding>,

    /// Output of re-running the failing case during cleanup.
    pub repro_output: Option<String>,

    /// Error surfaced by branch publication, if any. Publication failure
    /// does not abort cleanup.
    pub publish_error: Option<String>,

    /// When this report was generated.
    pub generated_at: DateTime<Utc>,
}

impl FailureReport {
    pub fn new(exit_code: i32, fuzz_output: String, duration_ms: u64) -> Self {
        FailureReport {
            triage_id: Uuid::new_v4(),
            exit_code,
            fuzz_output,
            duration_ms,
            finding: None,
            repro_output: None,
            publish_error: None,
            generated_at: Utc::now(),
        }
    }

    /// Branch the corpus entry was published to, when one was found.
    pub fn branch(&self) -> Option<&str> {
        self.finding.as_ref().map(|f| f.branch.as_str())
    }
}

/// Identity and destination of a published corpus entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFinding {
    /// Package name derived from the artifact path.
    pub package: String,

    /// Failing fuzz function name.
    pub fuzz_func: String,

    /// Corpus entry identifier.
    pub corpus_id: String,

    /// Import path resolved by the package-listing command (best effort).
    pub import_path: Option<String>,

    /// Branch name the entry was published under.
    pub branch: String,

    /// Commit the branch points at (pre-run HEAD).
    pub base_oid: String,
}
