//! Process Runner
//!
//! Launches external benchmark and plotting processes. Everything that starts
//! a process goes through [`ProcessRunner`] so the sweep can be driven by
//! [`ScriptedRunner`] in tests.
//!
//! Children inherit stdout/stderr: their output is passed through unchanged.
//! There is no timeout; a hung child blocks the caller until it exits.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to launch {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Exited with this code
    Code(i32),
    /// Killed by a signal before it could exit
    Signalled,
}

impl ExitState {
    pub fn success(self) -> bool {
        self == ExitState::Code(0)
    }
}

impl From<std::process::ExitStatus> for ExitState {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitState::Code(code),
            None => ExitState::Signalled,
        }
    }
}

/// One external process to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; inherits the harness's when `None`
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Shell-like rendering for logs and dry runs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// How a module name becomes a program and argument list, e.g. `python -m <module>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub interpreter: String,
    pub launcher_args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Launcher {
    /// `<interpreter> <launcher args...> <module> <args...>`
    pub fn invocation_for(&self, module: &str, args: impl IntoIterator<Item = String>) -> Invocation {
        let mut all_args = self.launcher_args.clone();
        all_args.push(module.to_string());
        all_args.extend(args);
        Invocation::new(self.interpreter.clone(), all_args).in_dir(self.working_dir.clone())
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            launcher_args: vec!["-m".to_string()],
            working_dir: None,
        }
    }
}

/// Capability to run an external process to completion
pub trait ProcessRunner {
    /// Run `invocation`, blocking until the process exits.
    fn run(&mut self, invocation: &Invocation) -> Result<ExitState, RunnerError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<ExitState, RunnerError> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessRunner;

impl ProcessRunner for SubprocessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ExitState, RunnerError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(ref dir) = invocation.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(command = %invocation.command_line(), "launching");

        let status = command.status().map_err(|source| RunnerError::SpawnFailed {
            program: invocation.program.clone(),
            source,
        })?;
        Ok(ExitState::from(status))
    }
}

/// Scripted result for one call of a [`ScriptedRunner`]
#[derive(Debug, Clone)]
enum Scripted {
    Exit(ExitState),
    LaunchFailure(String),
}

/// Test double: records every invocation and replays scripted results.
///
/// Calls are numbered from 1. Calls without a scripted result exit with code 0.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: BTreeMap<usize, Scripted>,
    calls: Vec<Invocation>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make call number `call` exit with `code`.
    pub fn exit_on_call(mut self, call: usize, code: i32) -> Self {
        self.script.insert(call, Scripted::Exit(ExitState::Code(code)));
        self
    }

    /// Make call number `call` die from a signal.
    pub fn signal_on_call(mut self, call: usize) -> Self {
        self.script.insert(call, Scripted::Exit(ExitState::Signalled));
        self
    }

    /// Make call number `call` fail to launch.
    pub fn launch_failure_on_call(mut self, call: usize, message: impl Into<String>) -> Self {
        self.script
            .insert(call, Scripted::LaunchFailure(message.into()));
        self
    }

    /// Every invocation seen so far, in call order.
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ExitState, RunnerError> {
        self.calls.push(invocation.clone());
        match self.script.get(&self.calls.len()) {
            None => Ok(ExitState::Code(0)),
            Some(Scripted::Exit(state)) => Ok(*state),
            Some(Scripted::LaunchFailure(message)) => Err(RunnerError::SpawnFailed {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message.clone()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(arg: &str) -> Invocation {
        Invocation::new("python", vec!["-m".to_string(), arg.to_string()])
    }

    #[test]
    fn test_command_line() {
        assert_eq!(invocation("tdot_numpy").command_line(), "python -m tdot_numpy");
    }

    #[test]
    fn test_launcher_layout() {
        let launcher = Launcher {
            interpreter: "python3".to_string(),
            launcher_args: vec!["-u".to_string(), "-m".to_string()],
            working_dir: Some(PathBuf::from("results")),
        };
        let inv = launcher.invocation_for("tdot_numpy", ["-l".to_string(), "1".to_string()]);
        assert_eq!(inv.program, "python3");
        assert_eq!(inv.args, vec!["-u", "-m", "tdot_numpy", "-l", "1"]);
        assert_eq!(inv.working_dir, Some(PathBuf::from("results")));
    }

    #[test]
    fn test_scripted_runner_defaults_to_success() {
        let mut runner = ScriptedRunner::new();
        assert_eq!(runner.run(&invocation("a")).unwrap(), ExitState::Code(0));
        assert_eq!(runner.run(&invocation("b")).unwrap(), ExitState::Code(0));
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(runner.calls()[1], invocation("b"));
    }

    #[test]
    fn test_scripted_runner_replays_script() {
        let mut runner = ScriptedRunner::new()
            .exit_on_call(2, 3)
            .signal_on_call(3)
            .launch_failure_on_call(4, "no such module");

        assert!(runner.run(&invocation("a")).unwrap().success());
        assert_eq!(runner.run(&invocation("b")).unwrap(), ExitState::Code(3));
        assert_eq!(runner.run(&invocation("c")).unwrap(), ExitState::Signalled);
        let err = runner.run(&invocation("d")).unwrap_err();
        assert!(err.to_string().contains("no such module"));
        assert_eq!(runner.calls().len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_subprocess_runner_reports_exit_codes() {
        let mut runner = SubprocessRunner;
        let ok = Invocation::new("sh", vec!["-c".to_string(), "exit 0".to_string()]);
        let bad = Invocation::new("sh", vec!["-c".to_string(), "exit 7".to_string()]);
        assert_eq!(runner.run(&ok).unwrap(), ExitState::Code(0));
        assert_eq!(runner.run(&bad).unwrap(), ExitState::Code(7));
    }

    #[test]
    fn test_subprocess_runner_missing_program() {
        let mut runner = SubprocessRunner;
        let missing = Invocation::new("symbench-definitely-missing-program", vec![]);
        assert!(matches!(
            runner.run(&missing),
            Err(RunnerError::SpawnFailed { .. })
        ));
    }
}
