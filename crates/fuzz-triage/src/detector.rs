//! New-corpus detection over a dirty working tree.

use crate::git::GitWorkspace;
use crate::process::CommandRunner;
use fuzz_triage_core::{CorpusArtifact, Result};
use std::path::Path;
use tracing::{debug, info};

/// Determine whether the fuzz failure left exactly one new corpus entry
/// in the working tree.
///
/// Stages all changes, then inspects staged additions for paths matching
/// the `.../testdata/fuzz/Fuzz*/<id>` convention. Zero matches means the
/// failure came from a pre-existing input; two or more cannot be safely
/// attributed to independent failing cases, so both return `None`.
/// Publishing the wrong entry is worse than publishing none.
pub async fn detect_new_corpus(
    runner: &dyn CommandRunner,
    workdir: &Path,
) -> Result<Option<CorpusArtifact>> {
    let git = GitWorkspace::new(runner, workdir);

    git.stage_all().await?;
    if git.staged_is_empty().await? {
        debug!("staged diff is empty; fuzz failure produced no new artifact");
        return Ok(None);
    }

    let additions = git.staged_additions().await?;
    let mut candidates: Vec<CorpusArtifact> = additions
        .iter()
        .filter_map(|path| CorpusArtifact::from_repo_path(path))
        .collect();

    if candidates.len() > 1 {
        info!(
            candidates = candidates.len(),
            "multiple corpus candidates; identity is ambiguous"
        );
        return Ok(None);
    }

    match candidates.pop() {
        Some(artifact) => {
            info!(
                package = %artifact.package,
                fuzz_func = %artifact.fuzz_func,
                corpus_id = %artifact.corpus_id,
                "detected new corpus entry"
            );
            Ok(Some(artifact))
        }
        None => {
            debug!(
                additions = additions.len(),
                "no staged addition matches the corpus path convention"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{exit_with, ok_with, ScriptedRunner};
    use fuzz_triage_core::TriageError;
    use std::path::Path;

    fn detection_script(additions: &str) -> ScriptedRunner {
        ScriptedRunner::new()
            .expect("git add -A", ok_with(""))
            .expect("git diff --cached --quiet", exit_with(1, ""))
            .expect("git diff --cached --name-only --diff-filter=A", ok_with(additions))
    }

    #[tokio::test]
    async fn test_empty_staged_diff_returns_none() {
        let runner = ScriptedRunner::new()
            .expect("git add -A", ok_with(""))
            .expect("git diff --cached --quiet", ok_with(""));
        let result = detect_new_corpus(&runner, Path::new(".")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_single_match_yields_artifact() {
        let runner = detection_script("pkg/testdata/fuzz/FuzzParse/a1b2c3\n");
        let artifact = detect_new_corpus(&runner, Path::new(".")).await.unwrap().unwrap();
        assert_eq!(artifact.package, "pkg");
        assert_eq!(artifact.fuzz_func, "FuzzParse");
        assert_eq!(artifact.corpus_id, "a1b2c3");
    }

    #[tokio::test]
    async fn test_unrelated_additions_are_ignored() {
        let runner = detection_script(
            "README.md\npkg/testdata/fuzz/FuzzParse/a1b2c3\nsrc/parser.go\n",
        );
        let artifact = detect_new_corpus(&runner, Path::new(".")).await.unwrap().unwrap();
        assert_eq!(artifact.corpus_id, "a1b2c3");
    }

    #[tokio::test]
    async fn test_no_corpus_addition_returns_none() {
        let runner = detection_script("README.md\nsrc/parser.go\n");
        let result = detect_new_corpus(&runner, Path::new(".")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_two_candidates_are_ambiguous() {
        let runner = detection_script(
            "pkg/testdata/fuzz/FuzzParse/a1b2c3\npkg/testdata/fuzz/FuzzParse/d4e5f6\n",
        );
        let result = detect_new_corpus(&runner, Path::new(".")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_candidates_across_packages_are_ambiguous() {
        let runner = detection_script(
            "a/testdata/fuzz/FuzzOne/111\nb/testdata/fuzz/FuzzTwo/222\nc/testdata/fuzz/FuzzThree/333\n",
        );
        let result = detect_new_corpus(&runner, Path::new(".")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_staging_failure_propagates() {
        let runner = ScriptedRunner::new().expect("git add -A", exit_with(128, ""));
        let result = detect_new_corpus(&runner, Path::new(".")).await;
        assert!(matches!(result, Err(TriageError::Git(_))));
    }
}
