//! Configuration Grid
//!
//! The hand-curated set of structural test cases. The case table is a
//! `static` slice and the producers are pure, so the grid cannot drift between
//! runs.
//!
//! Ordering: leg count is the outer loop, symmetry case the inner loop.

use crate::configuration::Configuration;
use crate::symmetry::SymmetryKind;

/// Leg counts exercised by a sweep, in sweep order.
pub const SUPPORTED_LEG_COUNTS: [u32; 2] = [1, 2];

const U1: SymmetryKind = SymmetryKind::U1;
const Z2: SymmetryKind = SymmetryKind::Z2;

/// (symmetry factors, sector scale) for every case, in sweep order.
static SYMMETRY_CASES: &[(&[SymmetryKind], Option<u32>)] = &[
    (&[], None),
    (&[U1, U1, Z2], Some(2)),
    (&[U1, U1, Z2], Some(5)),
    (&[U1, U1, Z2], Some(20)),
    (&[U1], Some(2)),
    (&[U1], Some(5)),
    (&[U1], Some(20)),
    (&[Z2], Some(20)),
];

/// Every configuration of the grid: 8 symmetry cases for each supported leg count.
pub fn produce_configurations() -> Vec<Configuration> {
    SUPPORTED_LEG_COUNTS
        .iter()
        .flat_map(|&legs| configurations_for_legs(legs))
        .collect()
}

/// The 8 symmetry cases for one leg count, or nothing for an unsupported count.
pub fn configurations_for_legs(leg_count: u32) -> Vec<Configuration> {
    if !SUPPORTED_LEG_COUNTS.contains(&leg_count) {
        return Vec::new();
    }

    SYMMETRY_CASES
        .iter()
        .filter_map(|&(kinds, scale)| Configuration::new(leg_count, kinds.to_vec(), scale).ok())
        .collect()
}
