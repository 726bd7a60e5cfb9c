//! In-memory fakes for the runner and remote seams (testing only)
//!
//! Provides `ScriptedRunner` and `RecordingRemote` so detector and
//! campaign logic can be exercised without spawning a process or touching
//! the network.

use crate::github::{GraphqlError, PublishReceipt, RemoteRepository};
use crate::process::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use fuzz_triage_core::{BranchRequest, RepositoryId, Result, TriageError};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Canned output with exit code 0.
pub fn ok_with(stdout: &str) -> CommandOutput {
    exit_with(0, stdout)
}

/// Canned output with the given exit code.
pub fn exit_with(exit_code: i32, stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// One recorded subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl RecordedCommand {
    /// Full command line, for assertions.
    pub fn line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Scripted command runner.
///
/// Hands out canned outputs strictly in the order they were queued and
/// panics on any command line it was not told to expect, so tests assert
/// command ordering for free. Every invocation is recorded.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: Mutex<VecDeque<(String, CommandOutput)>>,
    calls: Mutex<Vec<RecordedCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the canned output for the next expected command line.
    pub fn expect(self, line: &str, output: CommandOutput) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back((line.to_string(), output));
        self
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines of all invocations seen so far.
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCommand::line).collect()
    }

    /// Whether every queued expectation was consumed.
    pub fn exhausted(&self) -> bool {
        self.script.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        let call = RecordedCommand {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        };
        let line = call.line();
        self.calls.lock().unwrap().push(call);

        let Some((expected, output)) = self.script.lock().unwrap().pop_front() else {
            panic!("unexpected command (script exhausted): {line}");
        };
        assert_eq!(line, expected, "command out of scripted order");
        Ok(output)
    }
}

/// Recording fake for the remote repository seam.
#[derive(Debug)]
pub struct RecordingRemote {
    repository_id: Option<String>,
    reject_duplicates: bool,
    resolutions: Mutex<Vec<(String, String)>>,
    published: Mutex<Vec<BranchRequest>>,
}

impl RecordingRemote {
    /// Remote that resolves every repository to the given id and accepts
    /// every branch creation.
    pub fn new(repository_id: &str) -> Self {
        RecordingRemote {
            repository_id: Some(repository_id.to_string()),
            reject_duplicates: false,
            resolutions: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Remote whose resolution always fails, as for a misconfigured slug.
    pub fn unresolvable() -> Self {
        RecordingRemote {
            repository_id: None,
            reject_duplicates: false,
            resolutions: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Reject a second creation attempt for an already-seen branch name
    /// with a ref-already-exists error, like the real API.
    pub fn rejecting_duplicates(mut self) -> Self {
        self.reject_duplicates = true;
        self
    }

    pub fn resolutions(&self) -> Vec<(String, String)> {
        self.resolutions.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<BranchRequest> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteRepository for RecordingRemote {
    async fn resolve_repository_id(&self, owner: &str, name: &str) -> Result<RepositoryId> {
        self.resolutions
            .lock()
            .unwrap()
            .push((owner.to_string(), name.to_string()));
        match &self.repository_id {
            Some(id) => Ok(RepositoryId(id.clone())),
            None => Err(TriageError::RepositoryResolution(format!(
                "{owner}/{name}: response contained no repository"
            ))),
        }
    }

    async fn create_branch(&self, request: &BranchRequest) -> Result<PublishReceipt> {
        let mut published = self.published.lock().unwrap();
        let duplicate =
            self.reject_duplicates && published.iter().any(|r| r.branch == request.branch);
        published.push(request.clone());

        if duplicate {
            Ok(PublishReceipt {
                created_ref: None,
                errors: vec![GraphqlError {
                    message: format!(
                        "A ref named {:?} already exists in the repository.",
                        request.qualified_ref()
                    ),
                }],
            })
        } else {
            Ok(PublishReceipt {
                created_ref: Some(request.qualified_ref()),
                errors: Vec::new(),
            })
        }
    }
}
