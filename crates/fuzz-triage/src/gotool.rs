//! Command builders for the Go toolchain.
//!
//! Pure argument construction; nothing here spawns a process.

use fuzz_triage_core::{CorpusArtifact, FuzzRunConfig};

/// Program name for all toolchain invocations.
pub const GO: &str = "go";

/// `go test -fuzz=<re> -fuzztime=<d> -fuzzminimizetime=<d> <pattern>`
pub fn fuzz_command(config: &FuzzRunConfig) -> Vec<String> {
    vec![
        "test".to_string(),
        format!("-fuzz={}", config.fuzz_regexp),
        format!("-fuzztime={}", config.fuzz_time),
        format!("-fuzzminimizetime={}", config.fuzz_minimize_time),
        config.package_pattern.clone(),
    ]
}

/// `go test -run=<FuzzFunc>/<corpusId> ./<package>` for reproducing the
/// failing case during cleanup.
pub fn repro_command(artifact: &CorpusArtifact) -> Vec<String> {
    vec![
        "test".to_string(),
        format!("-run={}", artifact.run_selector()),
        artifact.package_selector(),
    ]
}

/// `go list ./<package>` to resolve the human-readable import path.
pub fn list_command(artifact: &CorpusArtifact) -> Vec<String> {
    vec!["list".to_string(), artifact.package_selector()]
}
