//! Per-invocation configuration.

use crate::error::{Result, TriageError};
use std::path::PathBuf;

/// Immutable configuration for one triage run.
///
/// Built at the CLI boundary and read-only afterwards. Durations are
/// tool-native strings (e.g. `5m`) handed verbatim to the fuzz subprocess.
#[derive(Debug, Clone)]
pub struct FuzzRunConfig {
    /// Repository slug in `owner/name` form.
    pub repo_slug: String,

    /// Bearer token for the GraphQL endpoint.
    pub token: String,

    /// GraphQL endpoint URL.
    pub endpoint: String,

    /// Package selector pattern handed to the fuzz tool (e.g. `./...`).
    pub package_pattern: String,

    /// Working directory the campaign runs in.
    pub workdir: PathBuf,

    /// Regular expression selecting fuzz targets.
    pub fuzz_regexp: String,

    /// Fuzz campaign duration (e.g. `5m`).
    pub fuzz_time: String,

    /// Minimization duration (e.g. `1m`).
    pub fuzz_minimize_time: String,

    /// Prefix for published branch names.
    pub branch_prefix: String,
}

impl FuzzRunConfig {
    /// Validate the configuration surface before the run starts.
    pub fn validate(&self) -> Result<()> {
        self.split_slug()?;
        let required = [
            ("token", &self.token),
            ("endpoint", &self.endpoint),
            ("package pattern", &self.package_pattern),
            ("fuzz regexp", &self.fuzz_regexp),
            ("fuzz time", &self.fuzz_time),
            ("fuzz minimize time", &self.fuzz_minimize_time),
            ("branch prefix", &self.branch_prefix),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(TriageError::InvalidConfig(format!("{what} must not be empty")));
            }
        }
        if self.branch_prefix.starts_with('/') || self.branch_prefix.ends_with('/') {
            return Err(TriageError::InvalidConfig(format!(
                "branch prefix must not start or end with '/': {:?}",
                self.branch_prefix
            )));
        }
        Ok(())
    }

    /// Split the repository slug into `(owner, name)`.
    pub fn split_slug(&self) -> Result<(&str, &str)> {
        let mut parts = self.repo_slug.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => Err(TriageError::InvalidConfig(format!(
                "repository slug must be owner/name, got {:?}",
                self.repo_slug
            ))),
        }
    }
}
