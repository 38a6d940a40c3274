//! Grid Configuration
//!
//! One point of the benchmark parameter grid. A configuration is validated on
//! construction and immutable afterwards.

use crate::symmetry::{SymmetryKind, product_group_name};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors from constructing a [`Configuration`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Leg count must be at least one.
    #[error("Leg count must be positive")]
    ZeroLegs,

    /// `NoSymmetry` was listed as a factor; the no-symmetry case is an empty list.
    #[error("'none' cannot be combined into a symmetry product")]
    TrivialFactor,

    /// Symmetry factors were given without a sector scale.
    #[error("Symmetry {0} requires a sector scale")]
    MissingSectorScale(String),

    /// A sector scale was given for the no-symmetry case.
    #[error("Sector scale {0} given without any symmetry")]
    UnexpectedSectorScale(u32),

    /// Sector scale must be at least one.
    #[error("Sector scale must be positive")]
    ZeroSectorScale,
}

/// A single structural test case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Configuration {
    leg_count: u32,
    symmetry_kinds: Vec<SymmetryKind>,
    sector_scale: Option<u32>,
}

impl Configuration {
    /// Build a configuration, checking that `sector_scale` is present exactly
    /// when `symmetry_kinds` is non-empty.
    pub fn new(
        leg_count: u32,
        symmetry_kinds: Vec<SymmetryKind>,
        sector_scale: Option<u32>,
    ) -> Result<Self, ConfigurationError> {
        if leg_count == 0 {
            return Err(ConfigurationError::ZeroLegs);
        }
        if symmetry_kinds.iter().any(|k| k.is_trivial()) {
            return Err(ConfigurationError::TrivialFactor);
        }

        match (symmetry_kinds.is_empty(), sector_scale) {
            (true, Some(scale)) => return Err(ConfigurationError::UnexpectedSectorScale(scale)),
            (false, None) => {
                return Err(ConfigurationError::MissingSectorScale(product_group_name(
                    &symmetry_kinds,
                )));
            }
            (false, Some(0)) => return Err(ConfigurationError::ZeroSectorScale),
            _ => {}
        }

        Ok(Self {
            leg_count,
            symmetry_kinds,
            sector_scale,
        })
    }

    /// The no-symmetry case for `leg_count` legs.
    pub fn no_symmetry(leg_count: u32) -> Result<Self, ConfigurationError> {
        Self::new(leg_count, Vec::new(), None)
    }

    /// A symmetric case with `sector_scale` sectors per leg.
    pub fn symmetric(
        leg_count: u32,
        symmetry_kinds: impl Into<Vec<SymmetryKind>>,
        sector_scale: u32,
    ) -> Result<Self, ConfigurationError> {
        Self::new(leg_count, symmetry_kinds.into(), Some(sector_scale))
    }

    /// Number of tensor legs under test
    pub fn leg_count(&self) -> u32 {
        self.leg_count
    }

    /// Symmetry factors, in product order. Empty means no symmetry.
    pub fn symmetry_kinds(&self) -> &[SymmetryKind] {
        &self.symmetry_kinds
    }

    /// Sectors per leg; `None` exactly when there is no symmetry.
    pub fn sector_scale(&self) -> Option<u32> {
        self.sector_scale
    }

    /// Whether any symmetry factor is present.
    pub fn is_symmetric(&self) -> bool {
        !self.symmetry_kinds.is_empty()
    }

    /// Product group name, e.g. `U(1) ⨉ ℤ₂`.
    pub fn group_name(&self) -> String {
        product_group_name(&self.symmetry_kinds)
    }

    /// Short stable label, e.g. `legs=2 sym=U1,Z2 sectors=5`.
    pub fn label(&self) -> String {
        let mut label = format!("legs={} sym=", self.leg_count);
        if self.symmetry_kinds.is_empty() {
            label.push_str("none");
        } else {
            let tokens: Vec<String> = self.symmetry_kinds.iter().map(|k| k.token()).collect();
            label.push_str(&tokens.join(","));
        }
        if let Some(scale) = self.sector_scale {
            label.push_str(&format!(" sectors={}", scale));
        }
        label
    }

    /// Per-configuration command-line flags: `-l <n> [-q <kind>...] [-s <n>]`.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = vec!["-l".to_string(), self.leg_count.to_string()];
        if !self.symmetry_kinds.is_empty() {
            flags.push("-q".to_string());
            flags.extend(self.symmetry_kinds.iter().map(|k| k.token()));
        }
        if let Some(scale) = self.sector_scale {
            flags.push("-s".to_string());
            flags.push(scale.to_string());
        }
        flags
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_symmetry_has_no_scale() {
        let config = Configuration::no_symmetry(2).unwrap();
        assert!(!config.is_symmetric());
        assert_eq!(config.sector_scale(), None);
        assert_eq!(config.flags(), vec!["-l", "2"]);
        assert_eq!(config.label(), "legs=2 sym=none");
    }

    #[test]
    fn test_symmetric_flags() {
        let config = Configuration::symmetric(
            1,
            [SymmetryKind::U1, SymmetryKind::U1, SymmetryKind::Z2],
            5,
        )
        .unwrap();
        assert_eq!(
            config.flags(),
            vec!["-l", "1", "-q", "U1", "U1", "Z2", "-s", "5"]
        );
        assert_eq!(config.label(), "legs=1 sym=U1,U1,Z2 sectors=5");
        assert_eq!(config.group_name(), "U(1) ⨉ U(1) ⨉ ℤ₂");
    }

    #[test]
    fn test_rejects_scale_without_symmetry() {
        assert_eq!(
            Configuration::new(1, Vec::new(), Some(2)),
            Err(ConfigurationError::UnexpectedSectorScale(2))
        );
    }

    #[test]
    fn test_rejects_symmetry_without_scale() {
        let err = Configuration::new(1, vec![SymmetryKind::U1], None).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingSectorScale("U(1)".to_string()));
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(
            Configuration::no_symmetry(0),
            Err(ConfigurationError::ZeroLegs)
        );
        assert_eq!(
            Configuration::symmetric(1, [SymmetryKind::U1], 0),
            Err(ConfigurationError::ZeroSectorScale)
        );
    }

    #[test]
    fn test_rejects_none_as_factor() {
        assert_eq!(
            Configuration::symmetric(1, [SymmetryKind::NoSymmetry], 2),
            Err(ConfigurationError::TrivialFactor)
        );
    }
}
