//! Sweep Parameters
//!
//! Values fixed once per harness invocation and shared by every run:
//! the module prefix, the backend list and the minimum measurement duration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Module prefix used when none is given
pub const DEFAULT_MODULE_PREFIX: &str = "tdot";

/// Minimum measurement duration (seconds) used when none is given
pub const DEFAULT_MIN_DURATION_SECS: f64 = 0.1;

/// Errors from validating sweep parameters
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParameterError {
    /// Duration was negative, NaN or infinite.
    #[error("Minimum duration must be a non-negative number of seconds, got {0}")]
    InvalidDuration(f64),

    /// No backend to benchmark.
    #[error("At least one backend is required")]
    NoBackends,

    /// The same backend was listed twice.
    #[error("Backend '{0}' listed more than once")]
    DuplicateBackend(Backend),

    /// Prefix was empty or contained characters unusable in a module or file name.
    #[error("Invalid module prefix {0:?}: {1}")]
    InvalidPrefix(String, &'static str),
}

/// A tensor backend under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Symmetry-aware block-sparse backend
    Abelian,
    /// Plain dense-array backend
    Numpy,
}

impl Backend {
    /// Identifier forwarded with `-b`
    pub fn identifier(self) -> &'static str {
        match self {
            Backend::Abelian => "abelian",
            Backend::Numpy => "numpy",
        }
    }

    /// Suffix of the benchmark module implementing this backend
    pub fn module_suffix(self) -> &'static str {
        match self {
            Backend::Abelian => "tenpy",
            Backend::Numpy => "numpy",
        }
    }

    /// Default comparison pair, symmetry-aware first.
    pub fn default_pair() -> Vec<Backend> {
        vec![Backend::Abelian, Backend::Numpy]
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abelian" | "tenpy" => Ok(Backend::Abelian),
            "numpy" | "dense" => Ok(Backend::Numpy),
            other => Err(format!("Unknown backend: {}", other)),
        }
    }
}

/// Parameters shared by every invocation of one sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonParameters {
    min_duration_secs: f64,
    backends: Vec<Backend>,
}

impl CommonParameters {
    /// Validate and build the shared parameters.
    pub fn new(min_duration_secs: f64, backends: Vec<Backend>) -> Result<Self, ParameterError> {
        if !min_duration_secs.is_finite() || min_duration_secs < 0.0 {
            return Err(ParameterError::InvalidDuration(min_duration_secs));
        }
        if backends.is_empty() {
            return Err(ParameterError::NoBackends);
        }
        for (i, backend) in backends.iter().enumerate() {
            if backends[..i].contains(backend) {
                return Err(ParameterError::DuplicateBackend(*backend));
            }
        }

        Ok(Self {
            min_duration_secs,
            backends,
        })
    }

    /// Minimum measurement duration in seconds
    pub fn min_duration_secs(&self) -> f64 {
        self.min_duration_secs
    }

    /// Backends in sweep order
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    /// Flags forwarded unchanged to every invocation: `-t <secs> -b <id>...`
    pub fn fixed_flags(&self) -> Vec<String> {
        let mut flags = vec!["-t".to_string(), self.min_duration_secs.to_string()];
        flags.push("-b".to_string());
        flags.extend(self.backends.iter().map(|b| b.identifier().to_string()));
        flags
    }
}

impl Default for CommonParameters {
    fn default() -> Self {
        Self {
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            backends: Backend::default_pair(),
        }
    }
}

/// Benchmark family name, e.g. `tdot`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModulePrefix(String);

impl ModulePrefix {
    /// Validate a prefix. It becomes part of module names and of a file glob,
    /// so whitespace, path separators and glob metacharacters are rejected.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ParameterError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ParameterError::InvalidPrefix(prefix, "must not be empty"));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(ParameterError::InvalidPrefix(prefix, "contains whitespace"));
        }
        if prefix.contains(['/', '\\']) {
            return Err(ParameterError::InvalidPrefix(prefix, "contains a path separator"));
        }
        if prefix.contains(['*', '?', '[', ']']) {
            return Err(ParameterError::InvalidPrefix(prefix, "contains a glob character"));
        }
        Ok(Self(prefix))
    }

    /// The prefix itself
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module implementing `backend` for this family: `<prefix>_<suffix>`
    pub fn module_for(&self, backend: Backend) -> String {
        format!("{}_{}", self.0, backend.module_suffix())
    }

    /// Glob covering every result file of this family: `<prefix>_*.txt`
    pub fn result_glob(&self) -> String {
        format!("{}_*.txt", self.0)
    }

    /// Whether `file_name` falls under [`ModulePrefix::result_glob`].
    pub fn matches_result_file(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|rest| rest.ends_with(".txt"))
    }
}

impl Default for ModulePrefix {
    fn default() -> Self {
        Self(DEFAULT_MODULE_PREFIX.to_string())
    }
}

impl fmt::Display for ModulePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
