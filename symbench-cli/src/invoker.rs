//! Backend Invoker
//!
//! Runs one benchmark module for one backend on one configuration.
//!
//! Argument layout, after the launcher prefix and module name:
//!
//! ```text
//! -t <min secs> -b <backend ids...>  -l <legs> [-q <kinds...>] [-s <scale>]
//! └──── common parameters ────────┘  └──── configuration flags ──────────┘
//! ```
//!
//! The module is expected to write `<prefix>_<backend>_<...>.txt` on success.
//! The invoker never names or inspects that file.

use crate::runner::{ExitState, Invocation, Launcher, ProcessRunner, RunnerError};
use serde::Serialize;
use symbench_core::{Backend, CommonParameters, Configuration, ModulePrefix};
use thiserror::Error;

/// Why an invocation did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InvocationFailure {
    #[error("exited with code {0}")]
    Exited(i32),

    #[error("terminated by a signal")]
    Signalled,

    #[error("could not be launched: {0}")]
    LaunchFailed(String),
}

impl InvocationFailure {
    /// Exit code, when the process got far enough to produce one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvocationFailure::Exited(code) => Some(*code),
            _ => None,
        }
    }
}

/// Result of one benchmark run. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure(InvocationFailure),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

impl From<Result<ExitState, RunnerError>> for RunOutcome {
    fn from(result: Result<ExitState, RunnerError>) -> Self {
        match result {
            Ok(ExitState::Code(0)) => RunOutcome::Success,
            Ok(ExitState::Code(code)) => RunOutcome::Failure(InvocationFailure::Exited(code)),
            Ok(ExitState::Signalled) => RunOutcome::Failure(InvocationFailure::Signalled),
            Err(e) => RunOutcome::Failure(InvocationFailure::LaunchFailed(e.to_string())),
        }
    }
}

/// Builds and runs benchmark module invocations
pub struct BackendInvoker<R> {
    runner: R,
    launcher: Launcher,
}

impl<R: ProcessRunner> BackendInvoker<R> {
    pub fn new(runner: R, launcher: Launcher) -> Self {
        Self { runner, launcher }
    }

    /// The full invocation for one backend on one configuration.
    pub fn build_invocation(
        &self,
        prefix: &ModulePrefix,
        backend: Backend,
        params: &CommonParameters,
        config: &Configuration,
    ) -> Invocation {
        let args = params.fixed_flags().into_iter().chain(config.flags());
        self.launcher
            .invocation_for(&prefix.module_for(backend), args)
    }

    /// Run the module and wait for it to exit.
    pub fn invoke(
        &mut self,
        prefix: &ModulePrefix,
        backend: Backend,
        params: &CommonParameters,
        config: &Configuration,
    ) -> RunOutcome {
        let invocation = self.build_invocation(prefix, backend, params, config);
        let outcome = RunOutcome::from(self.runner.run(&invocation));
        if let RunOutcome::Failure(ref failure) = outcome {
            tracing::debug!(
                module = %prefix.module_for(backend),
                config = %config,
                "invocation failed: {}",
                failure
            );
        }
        outcome
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;
    use symbench_core::{SymmetryKind, produce_configurations};

    fn invoker() -> BackendInvoker<ScriptedRunner> {
        BackendInvoker::new(ScriptedRunner::new(), Launcher::default())
    }

    #[test]
    fn test_no_symmetry_invocation() {
        let inv = invoker().build_invocation(
            &ModulePrefix::default(),
            Backend::Abelian,
            &CommonParameters::default(),
            &Configuration::no_symmetry(1).unwrap(),
        );
        assert_eq!(inv.program, "python");
        assert_eq!(
            inv.args,
            vec![
                "-m", "tdot_tenpy", "-t", "0.1", "-b", "abelian", "numpy", "-l", "1"
            ]
        );
    }

    #[test]
    fn test_symmetric_invocation() {
        let config = Configuration::symmetric(
            2,
            [SymmetryKind::U1, SymmetryKind::U1, SymmetryKind::Z2],
            20,
        )
        .unwrap();
        let inv = invoker().build_invocation(
            &ModulePrefix::default(),
            Backend::Numpy,
            &CommonParameters::default(),
            &config,
        );
        assert_eq!(
            inv.command_line(),
            "python -m tdot_numpy -t 0.1 -b abelian numpy -l 2 -q U1 U1 Z2 -s 20"
        );
    }

    #[test]
    fn test_scale_flag_iff_scale_present() {
        let invoker = invoker();
        for config in produce_configurations() {
            let inv = invoker.build_invocation(
                &ModulePrefix::default(),
                Backend::Abelian,
                &CommonParameters::default(),
                &config,
            );
            let has_scale = inv.args.iter().any(|a| a == "-s");
            let has_kinds = inv.args.iter().any(|a| a == "-q");
            assert_eq!(has_scale, config.sector_scale().is_some(), "{}", config);
            assert_eq!(has_kinds, config.is_symmetric(), "{}", config);
        }
    }

    #[test]
    fn test_outcomes() {
        let mut invoker = BackendInvoker::new(
            ScriptedRunner::new()
                .exit_on_call(2, 1)
                .signal_on_call(3)
                .launch_failure_on_call(4, "python: not found"),
            Launcher::default(),
        );
        let prefix = ModulePrefix::default();
        let params = CommonParameters::default();
        let config = Configuration::no_symmetry(1).unwrap();

        let mut next = || invoker.invoke(&prefix, Backend::Numpy, &params, &config);
        assert_eq!(next(), RunOutcome::Success);
        assert_eq!(next(), RunOutcome::Failure(InvocationFailure::Exited(1)));
        assert_eq!(next(), RunOutcome::Failure(InvocationFailure::Signalled));
        match next() {
            RunOutcome::Failure(InvocationFailure::LaunchFailed(msg)) => {
                assert!(msg.contains("python: not found"))
            }
            other => panic!("expected launch failure, got {:?}", other),
        }
        assert_eq!(invoker.runner().calls().len(), 4);
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(InvocationFailure::Exited(2).exit_code(), Some(2));
        assert_eq!(InvocationFailure::Signalled.exit_code(), None);
    }
}
