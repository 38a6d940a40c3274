#![warn(missing_docs)]
//! Symbench Core - Sweep Data Model
//!
//! Types shared by every part of a tensor-backend sweep:
//! - [`SymmetryKind`]: the symmetry factors a benchmark can be built with
//! - [`Configuration`]: one point of the parameter grid
//! - [`CommonParameters`], [`Backend`], [`ModulePrefix`]: per-invocation constants
//! - [`produce_configurations`]: the hand-curated grid itself

mod configuration;
mod grid;
mod params;
mod symmetry;

pub use configuration::{Configuration, ConfigurationError};
pub use grid::{SUPPORTED_LEG_COUNTS, configurations_for_legs, produce_configurations};
pub use params::{
    Backend, CommonParameters, DEFAULT_MIN_DURATION_SECS, DEFAULT_MODULE_PREFIX, ModulePrefix,
    ParameterError,
};
pub use symmetry::{SymmetryKind, product_group_name};
