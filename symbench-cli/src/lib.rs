#![warn(missing_docs)]
//! Symbench CLI Library
//!
//! Runs a benchmark family (`tdot`, `svd`, ...) for a symmetry-aware tensor
//! backend and a dense backend over the configuration grid, one process at a
//! time, then optionally plots the collected result files.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     symbench_cli::run()
//! }
//! ```

mod aggregate;
mod config;
mod invoker;
mod manifest;
mod planner;
mod runner;
mod sweep;

pub use aggregate::*;
pub use config::*;
pub use invoker::{BackendInvoker, InvocationFailure, RunOutcome};
pub use manifest::{ManifestStatus, SweepManifest, build_manifest, write_manifest};
pub use planner::{SweepPlan, build_plan};
pub use runner::*;
pub use sweep::{StepRecord, SweepController, SweepOutcome};

use clap::Parser;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use symbench_core::{
    Backend, CommonParameters, DEFAULT_MODULE_PREFIX, ModulePrefix, SUPPORTED_LEG_COUNTS,
    produce_configurations,
};

/// Symbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "symbench")]
#[command(author, version, about = "Symbench - tensor backend benchmark sweeps")]
pub struct Cli {
    /// Benchmark family; runs modules `<PREFIX>_tenpy` and `<PREFIX>_numpy`
    #[arg(default_value = DEFAULT_MODULE_PREFIX)]
    pub prefix: String,

    /// Minimum measurement duration in seconds, forwarded with -t
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub min_time: Option<f64>,

    /// Backends to compare, forwarded with -b (default: abelian numpy)
    #[arg(short = 'b', long, num_args = 1..)]
    pub backends: Option<Vec<Backend>>,

    /// Run only configurations with this many legs
    #[arg(long)]
    pub legs: Option<u32>,

    /// Run only configurations whose label matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Print every invocation without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Never plot, even with a display available
    #[arg(long)]
    pub no_plot: bool,

    /// Write a JSON manifest of the sweep to this path
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Configuration file (default: discover symbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory benchmark modules run in and write results to
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Print a default symbench.toml and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything a sweep needs, resolved from CLI flags layered over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Benchmark family
    pub prefix: ModulePrefix,
    /// Shared flags for every invocation
    pub params: CommonParameters,
    /// How modules are started
    pub launcher: Launcher,
    /// Configurations to run
    pub plan: SweepPlan,
    /// Where to write the manifest, if anywhere
    pub manifest_path: Option<PathBuf>,
    /// Whether plotting may run at all
    pub plot_enabled: bool,
    /// Module receiving the result glob
    pub plot_module: String,
    /// Variable signalling a display surface
    pub display_var: String,
}

impl Settings {
    /// Layer: symbench.toml defaults → CLI overrides.
    pub fn resolve(cli: &Cli, config: &SweepConfig) -> anyhow::Result<Self> {
        let prefix = ModulePrefix::new(cli.prefix.clone())?;

        let min_duration = match cli.min_time {
            Some(secs) => secs,
            None => config.min_duration_secs()?,
        };
        let backends = cli
            .backends
            .clone()
            .unwrap_or_else(|| config.runner.backends.clone());
        let params = CommonParameters::new(min_duration, backends)?;

        if let Some(legs) = cli.legs {
            if !SUPPORTED_LEG_COUNTS.contains(&legs) {
                return Err(anyhow::anyhow!(
                    "Unsupported leg count {} (supported: {:?})",
                    legs,
                    SUPPORTED_LEG_COUNTS
                ));
            }
        }
        let filter = cli
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid --filter pattern: {}", e))?;
        let plan = build_plan(produce_configurations(), filter.as_ref(), cli.legs);

        let launcher = Launcher {
            interpreter: config.runner.interpreter.clone(),
            launcher_args: config.runner.launcher_args.clone(),
            working_dir: cli
                .working_dir
                .clone()
                .or_else(|| config.runner.working_dir.clone()),
        };

        Ok(Self {
            prefix,
            params,
            launcher,
            plan,
            manifest_path: cli.manifest.clone(),
            plot_enabled: config.plot.enabled && !cli.no_plot,
            plot_module: config.plot.module.clone(),
            display_var: config.plot.display_var.clone(),
        })
    }

    /// Directory the result files land in
    pub fn results_dir(&self) -> PathBuf {
        self.launcher
            .working_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// What [`execute`] did
#[derive(Debug)]
pub struct ExecutionReport {
    /// Sweep result
    pub outcome: SweepOutcome,
    /// Every attempted invocation
    pub steps: Vec<StepRecord>,
    /// Plotting result; `None` when the sweep failed or plotting is disabled
    pub aggregate: Option<AggregateOutcome>,
}

/// Run the Symbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
/// A failed benchmark invocation terminates the process with exit code 1.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Symbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.print_config {
        print!("{}", SweepConfig::default_toml());
        return Ok(());
    }

    // Logs go to stderr; stdout carries progress and module output
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("symbench=debug,symbench_cli=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("symbench=info,symbench_cli=info")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match cli.config {
        Some(ref path) => SweepConfig::load(path).map_err(|e| {
            anyhow::anyhow!("Failed to load config {}: {}", path.display(), e)
        })?,
        None => SweepConfig::discover().unwrap_or_default(),
    };
    let settings = Settings::resolve(&cli, &config)?;

    if settings.plan.configurations.is_empty() {
        println!("No configurations match.");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.dry_run {
        print_plan(&settings, &mut out)?;
        return Ok(());
    }

    let surface_available = display_available(std::env::var_os(&settings.display_var).as_deref());
    let mut runner = SubprocessRunner;
    let report = execute(&settings, &mut runner, surface_available, &mut out)?;

    if let SweepOutcome::FailureAt {
        configuration,
        backend,
        failure,
        attempted,
    } = &report.outcome
    {
        eprintln!(
            "\nSweep aborted: {} ({}) on {} {} [invocation {} of {}]",
            settings.prefix.module_for(*backend),
            backend,
            configuration,
            failure,
            attempted,
            settings.plan.invocation_count(settings.params.backends().len())
        );
        std::process::exit(1);
    }

    if let Some(AggregateOutcome::Plotted { pattern, located }) = &report.aggregate {
        println!("Plotted {} result file(s) matching {}", located, pattern);
    }

    Ok(())
}

/// Run the sweep, write the manifest, and plot after a fully successful sweep.
///
/// `runner` launches both the benchmark modules and the plotting module.
/// Only progress I/O, manifest writing and plotting produce an `Err`; a failed
/// benchmark invocation is reported in [`ExecutionReport::outcome`].
pub fn execute<R: ProcessRunner>(
    settings: &Settings,
    runner: &mut R,
    surface_available: bool,
    progress: &mut impl Write,
) -> anyhow::Result<ExecutionReport> {
    let invoker = BackendInvoker::new(&mut *runner, settings.launcher.clone());
    let mut sweep = SweepController::new(invoker);
    let outcome = sweep.run_plan(
        &settings.prefix,
        &settings.params,
        &settings.plan.configurations,
        progress,
    )?;
    let (_, steps) = sweep.into_parts();

    if let Some(ref path) = settings.manifest_path {
        let manifest = build_manifest(
            &settings.prefix,
            &settings.params,
            &settings.launcher,
            &outcome,
            &steps,
        );
        write_manifest(path, &manifest)?;
        tracing::info!(path = %path.display(), "manifest written");
    }

    let aggregate = if outcome.is_success() && settings.plot_enabled {
        let plotter = ModulePlotter::new(
            &mut *runner,
            settings.launcher.clone(),
            settings.plot_module.clone(),
        );
        let mut aggregator = ResultAggregator::new(surface_available, plotter)
            .with_results_dir(settings.results_dir());
        Some(aggregator.aggregate(&settings.prefix)?)
    } else {
        None
    };

    Ok(ExecutionReport {
        outcome,
        steps,
        aggregate,
    })
}

/// Print the plan as a tree of configurations and their invocations.
pub fn print_plan(settings: &Settings, out: &mut impl Write) -> std::io::Result<()> {
    let invoker = BackendInvoker::new(SubprocessRunner, settings.launcher.clone());
    let backends = settings.params.backends();

    writeln!(
        out,
        "Symbench Plan: {} (min time {}s, backends: {})",
        settings.prefix,
        settings.params.min_duration_secs(),
        backends
            .iter()
            .map(|b| b.identifier())
            .collect::<Vec<_>>()
            .join(", ")
    )?;

    for config in &settings.plan.configurations {
        writeln!(out, "├── {} [{}]", config, config.group_name())?;
        for (i, &backend) in backends.iter().enumerate() {
            let branch = if i + 1 == backends.len() { "└──" } else { "├──" };
            let invocation =
                invoker.build_invocation(&settings.prefix, backend, &settings.params, config);
            writeln!(out, "│   {} {}", branch, invocation.command_line())?;
        }
    }

    writeln!(
        out,
        "{} configurations, {} invocations.",
        settings.plan.configurations.len(),
        settings.plan.invocation_count(backends.len())
    )?;
    Ok(())
}
