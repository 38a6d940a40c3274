//! Configuration loading from symbench.toml
//!
//! Sweep settings can be specified in a `symbench.toml` file. The file is
//! discovered by walking up from the current directory; every key has a
//! default and command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use symbench_core::{Backend, DEFAULT_MIN_DURATION_SECS};

/// File name searched for by [`SweepConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "symbench.toml";

/// Symbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Plotting configuration
    #[serde(default)]
    pub plot: PlotConfig,
}

/// How benchmark modules are launched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Interpreter running the benchmark modules
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Arguments placed between the interpreter and the module name
    #[serde(default = "default_launcher_args")]
    pub launcher_args: Vec<String>,
    /// Minimum measurement duration per benchmark (e.g., "100ms", "0.5s")
    #[serde(default = "default_min_time")]
    pub min_time: String,
    /// Backends to compare, in sweep order
    #[serde(default = "Backend::default_pair")]
    pub backends: Vec<Backend>,
    /// Directory modules run in and write result files to
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            launcher_args: default_launcher_args(),
            min_time: default_min_time(),
            backends: Backend::default_pair(),
            working_dir: None,
        }
    }
}

fn default_interpreter() -> String {
    "python".to_string()
}
fn default_launcher_args() -> Vec<String> {
    vec!["-m".to_string()]
}
fn default_min_time() -> String {
    format!("{}s", DEFAULT_MIN_DURATION_SECS)
}

/// Plotting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Plot after a successful sweep
    #[serde(default = "default_plot_enabled")]
    pub enabled: bool,
    /// Module invoked with the result-file glob
    #[serde(default = "default_plot_module")]
    pub module: String,
    /// Environment variable whose non-empty value means a display is available
    #[serde(default = "default_display_var")]
    pub display_var: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: default_plot_enabled(),
            module: default_plot_module(),
            display_var: default_display_var(),
        }
    }
}

fn default_plot_enabled() -> bool {
    true
}
fn default_plot_module() -> String {
    "plot_results".to_string()
}
fn default_display_var() -> String {
    "DISPLAY".to_string()
}

impl SweepConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for [`CONFIG_FILE_NAME`].
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            "ignoring unreadable config: {}",
                            e
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Minimum measurement duration in seconds, from `runner.min_time`
    pub fn min_duration_secs(&self) -> anyhow::Result<f64> {
        let ns = Self::parse_duration(&self.runner.min_time)?;
        Ok(ns as f64 / 1e9)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Symbench Configuration

[runner]
# Interpreter and arguments used to start a benchmark module:
#   <interpreter> <launcher_args...> <prefix>_<backend> <flags...>
interpreter = "python"
launcher_args = ["-m"]
# Minimum measurement duration forwarded with -t
min_time = "100ms"
# Backends to compare, symmetry-aware first
backends = ["abelian", "numpy"]
# Directory the modules run in (uncomment to enable)
# working_dir = "results"

[plot]
# Plot all result files after a successful sweep
enabled = true
# Module receiving the result-file glob
module = "plot_results"
# Plot only when this variable is set and non-empty
display_var = "DISPLAY"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SweepConfig::default();
        assert_eq!(config.runner.interpreter, "python");
        assert_eq!(config.runner.launcher_args, vec!["-m"]);
        assert_eq!(config.runner.backends, Backend::default_pair());
        assert!(config.plot.enabled);
        assert_eq!(config.plot.display_var, "DISPLAY");
        assert_eq!(config.min_duration_secs().unwrap(), 0.1);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(SweepConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(SweepConfig::parse_duration("100ms").unwrap(), 100_000_000);
        assert_eq!(SweepConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(SweepConfig::parse_duration("250µs").unwrap(), 250_000);
        assert_eq!(SweepConfig::parse_duration("1000ns").unwrap(), 1000);
        assert_eq!(SweepConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert_eq!(SweepConfig::parse_duration("0.1").unwrap(), 100_000_000);
        assert!(SweepConfig::parse_duration("").is_err());
        assert!(SweepConfig::parse_duration("-1s").is_err());
        assert!(SweepConfig::parse_duration("5 fortnights").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            interpreter = "python3"
            min_time = "500ms"
            backends = ["numpy"]

            [plot]
            enabled = false
        "#;

        let config: SweepConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.interpreter, "python3");
        assert_eq!(config.runner.backends, vec![Backend::Numpy]);
        assert_eq!(config.min_duration_secs().unwrap(), 0.5);
        assert!(!config.plot.enabled);
        // Defaults should still apply
        assert_eq!(config.runner.launcher_args, vec!["-m"]);
        assert_eq!(config.plot.module, "plot_results");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let toml_str = r#"
            [runner]
            backends = ["abelian", "torch"]
        "#;
        assert!(toml::from_str::<SweepConfig>(toml_str).is_err());
    }

    #[test]
    fn test_default_toml_parses() {
        let config: SweepConfig = toml::from_str(&SweepConfig::default_toml()).unwrap();
        assert_eq!(config.runner.min_time, "100ms");
        assert_eq!(config.min_duration_secs().unwrap(), 0.1);
    }

    #[test]
    fn test_discover_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[runner]\ninterpreter = \"pypy\"\n",
        )
        .unwrap();

        let config = SweepConfig::discover_from(&nested).unwrap();
        assert_eq!(config.runner.interpreter, "pypy");
    }
}
