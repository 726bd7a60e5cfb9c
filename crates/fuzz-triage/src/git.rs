//! Working-tree operations through the git CLI.
//!
//! Detection and cleanup both require a trustworthy view of the working
//! tree, so every failed git invocation here is fatal. The one exception
//! is `git diff --cached --quiet`, where exit code 0 vs 1 is the answer.

use crate::process::{CommandOutput, CommandRunner};
use fuzz_triage_core::{Result, TriageError};
use std::path::Path;

/// Git operations scoped to one working directory.
pub struct GitWorkspace<'a> {
    runner: &'a dyn CommandRunner,
    workdir: &'a Path,
}

impl<'a> GitWorkspace<'a> {
    pub fn new(runner: &'a dyn CommandRunner, workdir: &'a Path) -> Self {
        GitWorkspace { runner, workdir }
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.runner.run("git", &args, self.workdir).await
    }

    /// HEAD commit id. Read before any staging so it reflects pre-run state.
    pub async fn head_oid(&self) -> Result<String> {
        let output = self.git(&["rev-parse", "HEAD"]).await?;
        if !output.success() {
            return Err(TriageError::Git(format!(
                "git rev-parse HEAD failed: {}",
                output.stderr.trim()
            )));
        }
        let oid = output.stdout.trim().to_string();
        if oid.is_empty() {
            return Err(TriageError::Git(
                "git rev-parse HEAD returned empty output".to_string(),
            ));
        }
        Ok(oid)
    }

    /// Stage all working-tree changes.
    pub async fn stage_all(&self) -> Result<()> {
        let output = self.git(&["add", "-A"]).await?;
        if !output.success() {
            return Err(TriageError::Git(format!(
                "git add -A failed: {}",
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    /// Whether the staged diff against the last commit is empty.
    pub async fn staged_is_empty(&self) -> Result<bool> {
        let output = self.git(&["diff", "--cached", "--quiet"]).await?;
        match output.exit_code {
            0 => Ok(true),
            1 => Ok(false),
            code => Err(TriageError::Git(format!(
                "git diff --cached --quiet exited {code}: {}",
                output.stderr.trim()
            ))),
        }
    }

    /// Staged file paths restricted to additions; deletions are excluded
    /// by the diff filter.
    pub async fn staged_additions(&self) -> Result<Vec<String>> {
        let output = self
            .git(&["diff", "--cached", "--name-only", "--diff-filter=A"])
            .await?;
        if !output.success() {
            return Err(TriageError::Git(format!(
                "git diff --cached --name-only failed: {}",
                output.stderr.trim()
            )));
        }
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Restore the index to match the last commit, leaving files on disk.
    pub async fn restore_index(&self) -> Result<()> {
        let output = self.git(&["restore", "--staged", "."]).await?;
        if !output.success() {
            return Err(TriageError::Git(format!(
                "git restore --staged failed: {}",
                output.stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{exit_with, ok_with, ScriptedRunner};
    use crate::process::TokioCommandRunner;
    use std::fs;
    use std::path::Path;
    use std::process::Command as StdCommand;

    // ------------------------------------------------------------------
    // Scripted-runner unit tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_head_oid_trims_output() {
        let runner = ScriptedRunner::new()
            .expect("git rev-parse HEAD", ok_with("a94a8fe5ccb19ba61c4c0873d391e987982fbbd3\n"));
        let git = GitWorkspace::new(&runner, Path::new("."));
        let oid = git.head_oid().await.unwrap();
        assert_eq!(oid, "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3");
    }

    #[tokio::test]
    async fn test_head_oid_empty_output_is_fatal() {
        let runner = ScriptedRunner::new().expect("git rev-parse HEAD", ok_with(""));
        let git = GitWorkspace::new(&runner, Path::new("."));
        assert!(matches!(git.head_oid().await, Err(TriageError::Git(_))));
    }

    #[tokio::test]
    async fn test_staged_is_empty_maps_exit_codes() {
        let runner = ScriptedRunner::new()
            .expect("git diff --cached --quiet", ok_with(""))
            .expect("git diff --cached --quiet", exit_with(1, ""));
        let git = GitWorkspace::new(&runner, Path::new("."));
        assert!(git.staged_is_empty().await.unwrap());
        assert!(!git.staged_is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_staged_is_empty_other_exit_is_fatal() {
        let runner = ScriptedRunner::new().expect("git diff --cached --quiet", exit_with(128, ""));
        let git = GitWorkspace::new(&runner, Path::new("."));
        assert!(matches!(git.staged_is_empty().await, Err(TriageError::Git(_))));
    }

    #[tokio::test]
    async fn test_staged_additions_splits_lines() {
        let runner = ScriptedRunner::new().expect(
            "git diff --cached --name-only --diff-filter=A",
            ok_with("pkg/testdata/fuzz/FuzzParse/a1b2c3\nsrc/parser.go\n\n"),
        );
        let git = GitWorkspace::new(&runner, Path::new("."));
        let additions = git.staged_additions().await.unwrap();
        assert_eq!(
            additions,
            vec!["pkg/testdata/fuzz/FuzzParse/a1b2c3".to_string(), "src/parser.go".to_string()]
        );
    }

    #[tokio::test]
    async fn test_stage_all_failure_is_fatal() {
        let runner = ScriptedRunner::new().expect("git add -A", exit_with(128, ""));
        let git = GitWorkspace::new(&runner, Path::new("."));
        assert!(matches!(git.stage_all().await, Err(TriageError::Git(_))));
    }

    // ------------------------------------------------------------------
    // Real-git integration tests
    // ------------------------------------------------------------------

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[tokio::test]
    async fn test_head_oid_returns_40_hex_chars() {
        let repo = make_git_repo();
        let runner = TokioCommandRunner;
        let git = GitWorkspace::new(&runner, repo.path());
        let oid = git.head_oid().await.unwrap();
        assert_eq!(oid.len(), 40, "oid should be 40 hex chars, got: {oid}");
        assert!(oid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_stage_and_list_additions() {
        let repo = make_git_repo();
        let corpus = repo.path().join("pkg/testdata/fuzz/FuzzParse");
        fs::create_dir_all(&corpus).unwrap();
        fs::write(corpus.join("a1b2c3"), b"go test fuzz v1\nstring(\"x\")\n").unwrap();

        let runner = TokioCommandRunner;
        let git = GitWorkspace::new(&runner, repo.path());

        assert!(git.staged_is_empty().await.unwrap());
        git.stage_all().await.unwrap();
        assert!(!git.staged_is_empty().await.unwrap());

        let additions = git.staged_additions().await.unwrap();
        assert_eq!(additions, vec!["pkg/testdata/fuzz/FuzzParse/a1b2c3".to_string()]);
    }

    #[tokio::test]
    async fn test_restore_index_unstages_everything() {
        let repo = make_git_repo();
        fs::write(repo.path().join("stray.txt"), b"stray").unwrap();

        let runner = TokioCommandRunner;
        let git = GitWorkspace::new(&runner, repo.path());

        git.stage_all().await.unwrap();
        assert!(!git.staged_is_empty().await.unwrap());

        git.restore_index().await.unwrap();
        assert!(git.staged_is_empty().await.unwrap());
        // File itself stays on disk.
        assert!(repo.path().join("stray.txt").exists());
    }

    #[tokio::test]
    async fn test_head_oid_fails_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TokioCommandRunner;
        let git = GitWorkspace::new(&runner, dir.path());
        assert!(git.head_oid().await.is_err());
    }
}
