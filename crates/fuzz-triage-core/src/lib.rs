//! Fuzz triage domain model.
//!
//! Pure types and logic for turning a failed CI fuzz campaign into a
//! published corpus branch:
//! - `FuzzRunConfig`: immutable per-invocation configuration
//! - `CorpusArtifact`: identity of a new failing input, derived from the
//!   `testdata/fuzz/Fuzz*/<id>` path convention
//! - `RepositoryRef` / `BranchRequest`: remote identity and the single
//!   branch-creation attempt derived from it
//! - `CampaignOutcome` / `FailureReport`: what a run produced
//!
//! No process or network IO lives here; execution is in the `fuzz-triage`
//! crate.

pub mod config;
pub mod corpus;
pub mod error;
pub mod remote;
pub mod report;

pub use config::FuzzRunConfig;
pub use corpus::{classify_corpus_path, CorpusArtifact, CorpusLeaf};
pub use error::{Result, TriageError};
pub use remote::{BranchRequest, RepositoryId, RepositoryRef};
pub use report::{CampaignOutcome, CorpusFinding, FailureReport};

/// Fuzz triage domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
