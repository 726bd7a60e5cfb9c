//! Fuzz triage execution.
//!
//! Runs a fuzz campaign as a subprocess, and when it fails:
//! - detects whether exactly one new corpus entry landed in the working tree
//! - resolves the remote repository id over GraphQL
//! - publishes the entry to a deterministically named branch at the
//!   pre-run HEAD commit
//! - re-runs the failing case for the report and restores the tree
//!
//! Subprocess access goes through the [`process::CommandRunner`] capability
//! and the remote API through [`github::RemoteRepository`], so everything
//! here is testable against the fakes in [`fakes`].

pub mod campaign;
pub mod detector;
pub mod fakes;
pub mod git;
pub mod github;
pub mod gotool;
pub mod process;
pub mod telemetry;

// Re-export key types
pub use campaign::FuzzCampaign;
pub use detector::detect_new_corpus;
pub use git::GitWorkspace;
pub use github::{GithubClient, GraphqlError, PublishReceipt, RemoteRepository};
pub use process::{CommandOutput, CommandRunner, TokioCommandRunner};
pub use telemetry::init_tracing;
