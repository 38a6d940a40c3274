//! Result Aggregator
//!
//! After a fully successful sweep, hands every result file of the module
//! family to the plotting collaborator, once. Plotting needs a display; when
//! none is available the aggregator does nothing and says nothing.

use crate::invoker::{InvocationFailure, RunOutcome};
use crate::runner::{Launcher, ProcessRunner, RunnerError};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use symbench_core::ModulePrefix;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Launch(#[from] RunnerError),

    #[error("Plotting command `{command}` {failure}")]
    PlotFailed {
        command: String,
        failure: InvocationFailure,
    },
}

/// The plotting collaborator
pub trait Plotter {
    /// Plot every result file matching the glob `pattern`.
    fn plot(&mut self, pattern: &str) -> Result<(), AggregateError>;
}

/// Plots by running `<launcher> <module> <pattern>`.
///
/// The pattern is passed unexpanded, so the plotting module must expand the
/// glob itself rather than expect a list of file names.
pub struct ModulePlotter<R> {
    runner: R,
    launcher: Launcher,
    module: String,
}

impl<R: ProcessRunner> ModulePlotter<R> {
    pub fn new(runner: R, launcher: Launcher, module: impl Into<String>) -> Self {
        Self {
            runner,
            launcher,
            module: module.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: ProcessRunner> Plotter for ModulePlotter<R> {
    fn plot(&mut self, pattern: &str) -> Result<(), AggregateError> {
        let invocation = self
            .launcher
            .invocation_for(&self.module, [pattern.to_string()]);
        let state = self.runner.run(&invocation)?;
        match RunOutcome::from(Ok::<_, RunnerError>(state)) {
            RunOutcome::Success => Ok(()),
            RunOutcome::Failure(failure) => Err(AggregateError::PlotFailed {
                command: invocation.command_line(),
                failure,
            }),
        }
    }
}

/// What [`ResultAggregator::aggregate`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// The plotter ran once with `pattern`; `located` files matched it
    Plotted { pattern: String, located: usize },
    /// No display surface
    Skipped,
}

pub struct ResultAggregator<P> {
    surface_available: bool,
    plotter: P,
    results_dir: PathBuf,
}

impl<P: Plotter> ResultAggregator<P> {
    /// `surface_available` is decided by the caller, see [`display_available`].
    pub fn new(surface_available: bool, plotter: P) -> Self {
        Self {
            surface_available,
            plotter,
            results_dir: PathBuf::from("."),
        }
    }

    /// Directory the benchmark modules write their result files to.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn aggregate(&mut self, prefix: &ModulePrefix) -> Result<AggregateOutcome, AggregateError> {
        if !self.surface_available {
            tracing::debug!("no display surface, not plotting");
            return Ok(AggregateOutcome::Skipped);
        }

        let pattern = prefix.result_glob();
        // The count is informational; the plotter only gets the pattern.
        let located = match locate_results(&self.results_dir, prefix) {
            Ok(found) => found.len(),
            Err(e) => {
                tracing::warn!(
                    dir = %self.results_dir.display(),
                    "could not scan for result files: {}",
                    e
                );
                0
            }
        };
        if located == 0 {
            tracing::warn!(
                dir = %self.results_dir.display(),
                "no result files match {}",
                pattern
            );
        } else {
            tracing::info!(files = located, "plotting {}", pattern);
        }

        self.plotter.plot(&pattern)?;
        Ok(AggregateOutcome::Plotted { pattern, located })
    }

    pub fn plotter(&self) -> &P {
        &self.plotter
    }
}

/// Result files in `dir` matching `<prefix>_*.txt`, sorted by name.
pub fn locate_results(dir: &Path, prefix: &ModulePrefix) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| prefix.matches_result_file(n)) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// Whether a display-indicator value means a display surface is available:
/// set and non-empty.
pub fn display_available(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
