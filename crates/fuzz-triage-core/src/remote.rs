//! Remote repository identity and branch publication requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque remote repository identifier returned by the GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryId(pub String);

impl RepositoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository identity plus the commit captured at campaign start.
///
/// `head_oid` is read before any staging, so the branch target reflects
/// pre-run state rather than incidental working-tree changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub id: RepositoryId,
    pub head_oid: String,
}

/// One remote branch-creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRequest {
    pub repository_id: RepositoryId,
    pub branch: String,
    pub oid: String,
}

impl BranchRequest {
    pub fn new(repo: &RepositoryRef, branch: impl Into<String>) -> Self {
        BranchRequest {
            repository_id: repo.id.clone(),
            branch: branch.into(),
            oid: repo.head_oid.clone(),
        }
    }

    /// Fully qualified ref name for the createRef mutation.
    pub fn qualified_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }
}
