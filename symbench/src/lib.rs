#![warn(missing_docs)]
//! # Symbench
//!
//! Benchmark sweeps comparing a symmetry-aware ("abelian") tensor backend with
//! a plain dense backend across a grid of leg counts, symmetry groups and
//! sector counts.
//!
//! - **Configuration grid**: 8 hand-picked symmetry cases for 1 and 2 legs
//! - **Fair comparison**: both backends run every configuration with identical flags
//! - **Sequential, fail-fast**: one benchmark process at a time, stop at the first failure
//! - **Plotting**: result files are handed to a plotting module when a display is available
//!
//! ## Quick Start
//!
//! ```text
//! $ symbench            # tdot_tenpy / tdot_numpy over the full grid
//! $ symbench svd --legs 2 --dry-run
//! ```
//!
//! Each benchmark module is started as
//!
//! ```text
//! python -m <prefix>_<tenpy|numpy> -t 0.1 -b abelian numpy -l <legs> [-q <kinds...>] [-s <sectors>]
//! ```

// Re-export the data model
pub use symbench_core::{
    Backend, CommonParameters, Configuration, ConfigurationError, ModulePrefix, ParameterError,
    SUPPORTED_LEG_COUNTS, SymmetryKind, configurations_for_legs, produce_configurations,
};

// Re-export orchestration
pub use symbench_cli::{
    AggregateOutcome, BackendInvoker, Cli, ExecutionReport, Invocation, InvocationFailure,
    Launcher, ProcessRunner, ResultAggregator, RunOutcome, ScriptedRunner, Settings,
    SubprocessRunner, SweepConfig, SweepController, SweepOutcome, execute, run, run_with_cli,
};
