//! Sweep Manifest
//!
//! Optional JSON record of a sweep: what ran, with which parameters, and how
//! each invocation ended. Written after failed sweeps too, next to whatever
//! result files the passing invocations left behind.

use crate::runner::Launcher;
use crate::sweep::{StepRecord, SweepOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use symbench_core::{CommonParameters, ModulePrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepManifest {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub git_commit: Option<String>,
    pub prefix: ModulePrefix,
    pub interpreter: String,
    pub launcher_args: Vec<String>,
    pub parameters: CommonParameters,
    pub status: ManifestStatus,
    pub total_duration_secs: f64,
    pub steps: Vec<StepRecord>,
}

/// Build the manifest for a finished (or aborted) sweep.
pub fn build_manifest(
    prefix: &ModulePrefix,
    params: &CommonParameters,
    launcher: &Launcher,
    outcome: &SweepOutcome,
    steps: &[StepRecord],
) -> SweepManifest {
    SweepManifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        git_commit: git_commit(),
        prefix: prefix.clone(),
        interpreter: launcher.interpreter.clone(),
        launcher_args: launcher.launcher_args.clone(),
        parameters: params.clone(),
        status: if outcome.is_success() {
            ManifestStatus::Passed
        } else {
            ManifestStatus::Failed
        },
        total_duration_secs: steps.iter().map(|s| s.elapsed_secs).sum(),
        steps: steps.to_vec(),
    }
}

/// Write `manifest` as pretty JSON, creating parent directories.
pub fn write_manifest(path: &Path, manifest: &SweepManifest) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn git_commit() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::InvocationFailure;
    use symbench_core::{Backend, Configuration};

    fn step(n: usize, failure: Option<InvocationFailure>) -> StepRecord {
        StepRecord {
            step: n,
            module: "tdot_tenpy".to_string(),
            backend: Backend::Abelian,
            configuration: "legs=1 sym=none".to_string(),
            command: "python -m tdot_tenpy -l 1".to_string(),
            elapsed_secs: 0.5,
            failure,
        }
    }

    #[test]
    fn test_failed_manifest_is_written_as_json() {
        let outcome = SweepOutcome::FailureAt {
            configuration: Configuration::no_symmetry(1).unwrap(),
            backend: Backend::Abelian,
            failure: InvocationFailure::Exited(3),
            attempted: 2,
        };
        let steps = vec![step(1, None), step(2, Some(InvocationFailure::Exited(3)))];
        let manifest = build_manifest(
            &ModulePrefix::default(),
            &CommonParameters::default(),
            &Launcher::default(),
            &outcome,
            &steps,
        );

        assert_eq!(manifest.status, ManifestStatus::Failed);
        assert_eq!(manifest.total_duration_secs, 1.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("sweep.json");
        write_manifest(&path, &manifest).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["prefix"], "tdot");
        assert_eq!(value["parameters"]["backends"][0], "abelian");
        assert_eq!(value["steps"].as_array().unwrap().len(), 2);
        assert_eq!(value["steps"][1]["failure"]["kind"], "exited");
        assert_eq!(value["steps"][1]["failure"]["detail"], 3);
        assert!(value["steps"][0]["failure"].is_null());
    }

    #[test]
    fn test_passed_status() {
        let manifest = build_manifest(
            &ModulePrefix::default(),
            &CommonParameters::default(),
            &Launcher::default(),
            &SweepOutcome::Success { invocations: 0 },
            &[],
        );
        assert_eq!(manifest.status, ManifestStatus::Passed);
        assert!(manifest.steps.is_empty());
    }
}
