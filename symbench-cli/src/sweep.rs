//! Sweep Controller
//!
//! Drives configurations × backends through the [`BackendInvoker`], strictly
//! one at a time, in the order given. Benchmarks need an uncontended machine,
//! so there is no parallelism here.
//!
//! Fail-fast: the first failed invocation ends the sweep and is returned as
//! [`SweepOutcome::FailureAt`]. Result files already written are left alone.

use crate::invoker::{BackendInvoker, InvocationFailure, RunOutcome};
use crate::runner::ProcessRunner;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;
use symbench_core::{
    Backend, CommonParameters, Configuration, ModulePrefix, produce_configurations,
};

const RULE_WIDTH: usize = 60;

/// Outcome of a whole sweep
#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    /// Every invocation succeeded
    Success { invocations: usize },
    /// The first failing invocation; nothing ran after it
    FailureAt {
        configuration: Configuration,
        backend: Backend,
        failure: InvocationFailure,
        /// Invocations attempted, including the failing one
        attempted: usize,
    },
}

impl SweepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SweepOutcome::Success { .. })
    }
}

/// One attempted invocation, kept for the sweep manifest
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub module: String,
    pub backend: Backend,
    pub configuration: String,
    pub command: String,
    pub elapsed_secs: f64,
    pub failure: Option<InvocationFailure>,
}

impl StepRecord {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct SweepController<R> {
    invoker: BackendInvoker<R>,
    steps: Vec<StepRecord>,
}

impl<R: ProcessRunner> SweepController<R> {
    pub fn new(invoker: BackendInvoker<R>) -> Self {
        Self {
            invoker,
            steps: Vec::new(),
        }
    }

    /// Run the full configuration grid.
    pub fn run_sweep(
        &mut self,
        prefix: &ModulePrefix,
        params: &CommonParameters,
        progress: &mut impl Write,
    ) -> io::Result<SweepOutcome> {
        self.run_plan(prefix, params, &produce_configurations(), progress)
    }

    /// Run `configurations` in order, every backend of `params` for each.
    /// Step records from a previous plan are discarded.
    ///
    /// Only writing progress can produce an `Err`; invocation failures are
    /// reported through the returned [`SweepOutcome`].
    pub fn run_plan(
        &mut self,
        prefix: &ModulePrefix,
        params: &CommonParameters,
        configurations: &[Configuration],
        progress: &mut impl Write,
    ) -> io::Result<SweepOutcome> {
        let total = configurations.len() * params.backends().len();
        let mut attempted = 0;
        self.steps.clear();

        tracing::info!(
            prefix = %prefix,
            configurations = configurations.len(),
            invocations = total,
            "starting sweep"
        );

        for config in configurations {
            for &backend in params.backends() {
                attempted += 1;
                let module = prefix.module_for(backend);
                let command = self
                    .invoker
                    .build_invocation(prefix, backend, params, config)
                    .command_line();

                writeln!(progress, "{}", "=".repeat(RULE_WIDTH))?;
                writeln!(
                    progress,
                    "[{}/{}] {} ({})  {}",
                    attempted, total, module, backend, config
                )?;
                writeln!(progress, "$ {}", command)?;
                progress.flush()?;

                let start = Instant::now();
                let outcome = self.invoker.invoke(prefix, backend, params, config);
                let elapsed_secs = start.elapsed().as_secs_f64();

                writeln!(progress, "{}", "-".repeat(RULE_WIDTH))?;
                let failure = match outcome {
                    RunOutcome::Success => {
                        writeln!(
                            progress,
                            "[{}/{}] passed in {:.2}s",
                            attempted, total, elapsed_secs
                        )?;
                        None
                    }
                    RunOutcome::Failure(failure) => {
                        writeln!(
                            progress,
                            "[{}/{}] FAILED: {} {}",
                            attempted, total, module, failure
                        )?;
                        Some(failure)
                    }
                };
                progress.flush()?;

                self.steps.push(StepRecord {
                    step: attempted,
                    module,
                    backend,
                    configuration: config.label(),
                    command,
                    elapsed_secs,
                    failure: failure.clone(),
                });

                if let Some(failure) = failure {
                    tracing::error!(
                        backend = %backend,
                        config = %config,
                        "sweep aborted after {} of {} invocations",
                        attempted,
                        total
                    );
                    return Ok(SweepOutcome::FailureAt {
                        configuration: config.clone(),
                        backend,
                        failure,
                        attempted,
                    });
                }
            }
        }

        tracing::info!(invocations = attempted, "sweep complete");
        Ok(SweepOutcome::Success {
            invocations: attempted,
        })
    }

    /// Every invocation attempted by the latest plan.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn invoker(&self) -> &BackendInvoker<R> {
        &self.invoker
    }

    pub fn into_parts(self) -> (BackendInvoker<R>, Vec<StepRecord>) {
        (self.invoker, self.steps)
    }
}
