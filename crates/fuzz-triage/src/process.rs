//! Subprocess execution capability.

use async_trait::async_trait;
use fuzz_triage_core::{Result, TriageError};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Narrow capability interface over process invocation.
///
/// A non-zero exit code is data, not a fault; implementations only error
/// when the process could not be spawned at all.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput>;
}

/// Runner backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
        debug!(program, ?args, cwd = %cwd.display(), "spawning subprocess");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|source| TriageError::CommandSpawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let runner = TokioCommandRunner;
        let output = runner
            .run("echo", &args(&["hello"]), &PathBuf::from("."))
            .await
            .expect("echo failed to spawn");
        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_data() {
        let runner = TokioCommandRunner;
        let output = runner
            .run("false", &[], &PathBuf::from("."))
            .await
            .expect("false failed to spawn");
        assert!(!output.success());
        assert_ne!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_spawn_failure_errors() {
        let runner = TokioCommandRunner;
        let result = runner
            .run("/nonexistent-binary-that-does-not-exist", &[], &PathBuf::from("."))
            .await;
        assert!(matches!(result, Err(TriageError::CommandSpawn { .. })));
    }
}
