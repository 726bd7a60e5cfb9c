//! Corpus path classification and artifact identity.
//!
//! The fuzz tool writes every new failing input under
//! `<package>/testdata/fuzz/<FuzzFunc>/<corpusId>`. Identity is derived
//! purely from that path shape; no file content is inspected.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Package name used when the corpus convention sits at the repository root.
const ROOT_PACKAGE: &str = "root";

/// Identity extracted from the tail of a corpus path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLeaf {
    /// Fuzz function directory name (always starts with `Fuzz`).
    pub fuzz_func: String,

    /// Content-derived entry name assigned by the fuzz tool.
    pub corpus_id: String,
}

/// Classify a path, already split into ordered segments, against the
/// corpus convention `.../testdata/fuzz/Fuzz*/<id>`.
///
/// Separator-independent: callers split on whatever separator their
/// source uses. Returns `None` for anything that does not match exactly.
pub fn classify_corpus_path(segments: &[&str]) -> Option<CorpusLeaf> {
    let n = segments.len();
    if n < 4 {
        return None;
    }
    if segments[n - 4] != "testdata" || segments[n - 3] != "fuzz" {
        return None;
    }
    let fuzz_func = segments[n - 2];
    let corpus_id = segments[n - 1];
    if !fuzz_func.starts_with("Fuzz") || corpus_id.is_empty() {
        return None;
    }
    Some(CorpusLeaf {
        fuzz_func: fuzz_func.to_string(),
        corpus_id: corpus_id.to_string(),
    })
}

/// Identity of one discovered failing input.
///
/// Exists only between detection and cleanup; the file behind `path` is
/// deleted from disk once the entry has been published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusArtifact {
    /// Package name derived from the path segments before `testdata`.
    pub package: String,

    /// Failing fuzz function name.
    pub fuzz_func: String,

    /// Corpus entry identifier.
    pub corpus_id: String,

    /// Artifact path relative to the working tree.
    pub path: PathBuf,
}

impl CorpusArtifact {
    /// Build an artifact from a repository-relative path as git prints it
    /// (`/`-separated). Returns `None` when the path does not match the
    /// corpus convention.
    pub fn from_repo_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        let leaf = classify_corpus_path(&segments)?;
        let prefix = &segments[..segments.len() - 4];
        let package = if prefix.is_empty() {
            ROOT_PACKAGE.to_string()
        } else {
            prefix.join("/")
        };
        Some(CorpusArtifact {
            package,
            fuzz_func: leaf.fuzz_func,
            corpus_id: leaf.corpus_id,
            path: PathBuf::from(path),
        })
    }

    /// Deterministic branch name for this artifact under the given prefix.
    pub fn branch_name(&self, prefix: &str) -> String {
        format!("{}/{}/{}/{}", prefix, self.package, self.fuzz_func, self.corpus_id)
    }

    /// Test-case selector for re-running just this failing input.
    pub fn run_selector(&self) -> String {
        format!("{}/{}", self.fuzz_func, self.corpus_id)
    }

    /// Package selector relative to the working tree (`./<package>`).
    pub fn package_selector(&self) -> String {
        if self.package == ROOT_PACKAGE {
            ".".to_string()
        } else {
            format!("./{}", self.package)
        }
    }
}
