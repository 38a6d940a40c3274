//! Symmetry Kinds
//!
//! The closed set of symmetry factors a benchmark module understands. A
//! configuration combines several factors into a product group; the order of
//! factors is significant because it fixes which product group is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest and largest `N` accepted for a cyclic `Z_N` factor.
const ZN_RANGE: std::ops::RangeInclusive<u8> = 2..=9;

/// A single symmetry factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryKind {
    /// No symmetry at all. Only meaningful on its own, never as a factor.
    NoSymmetry,
    /// Abelian U(1) charge conservation
    U1,
    /// Cyclic group `Z_N`, `2 <= N <= 9`
    ZN(u8),
    /// Non-abelian SU(2)
    SU2,
    /// Fermionic parity (even/odd)
    FermionParity,
}

impl SymmetryKind {
    /// `Z_2`, by far the most common cyclic factor.
    pub const Z2: SymmetryKind = SymmetryKind::ZN(2);

    /// Spelling forwarded to benchmark modules with `-q`.
    pub fn token(self) -> String {
        match self {
            SymmetryKind::NoSymmetry => "none".to_string(),
            SymmetryKind::U1 => "U1".to_string(),
            SymmetryKind::ZN(n) => format!("Z{}", n),
            SymmetryKind::SU2 => "SU2".to_string(),
            SymmetryKind::FermionParity => "fermion_parity".to_string(),
        }
    }

    /// Mathematical group name, e.g. `U(1)` or `ℤ₂`.
    pub fn group_name(self) -> String {
        match self {
            SymmetryKind::NoSymmetry => "NoSymmetry".to_string(),
            SymmetryKind::U1 => "U(1)".to_string(),
            SymmetryKind::ZN(n) => format!("ℤ{}", subscript(n)),
            SymmetryKind::SU2 => "SU(2)".to_string(),
            SymmetryKind::FermionParity => "FermionParity".to_string(),
        }
    }

    /// Whether all sectors fuse to a single outcome.
    pub fn is_abelian(self) -> bool {
        !matches!(self, SymmetryKind::SU2)
    }

    /// Whether this is the trivial (absent) symmetry.
    pub fn is_trivial(self) -> bool {
        matches!(self, SymmetryKind::NoSymmetry)
    }
}

fn subscript(n: u8) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '0' => '₀',
            '1' => '₁',
            '2' => '₂',
            '3' => '₃',
            '4' => '₄',
            '5' => '₅',
            '6' => '₆',
            '7' => '₇',
            '8' => '₈',
            _ => '₉',
        })
        .collect()
}

/// Name of the product group formed by `factors`, in order.
///
/// An empty factor list names the trivial group.
pub fn product_group_name(factors: &[SymmetryKind]) -> String {
    if factors.is_empty() {
        return SymmetryKind::NoSymmetry.group_name();
    }
    factors
        .iter()
        .map(|f| f.group_name())
        .collect::<Vec<_>>()
        .join(" ⨉ ")
}

impl fmt::Display for SymmetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl std::str::FromStr for SymmetryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "none" | "nosymmetry" | "no_symmetry" => return Ok(SymmetryKind::NoSymmetry),
            "u1" => return Ok(SymmetryKind::U1),
            "su2" => return Ok(SymmetryKind::SU2),
            "fermion_parity" | "fermionparity" => return Ok(SymmetryKind::FermionParity),
            _ => {}
        }

        if let Some(n) = lower.strip_prefix('z').and_then(|n| n.parse::<u8>().ok()) {
            if ZN_RANGE.contains(&n) {
                return Ok(SymmetryKind::ZN(n));
            }
            return Err(format!(
                "Unsupported cyclic symmetry Z{} (expected Z{} to Z{})",
                n,
                ZN_RANGE.start(),
                ZN_RANGE.end()
            ));
        }

        Err(format!("Unknown symmetry kind: {}", s))
    }
}
