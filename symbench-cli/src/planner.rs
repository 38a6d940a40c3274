//! Sweep Planner
//!
//! Narrows the configuration grid to what a run should execute.
//!
//! Filtering options:
//! - Leg count
//! - Regex pattern matching on the configuration label
//!
//! Ordering: grid order is kept so progress output is reproducible.

use regex::Regex;
use symbench_core::Configuration;

/// Execution plan for a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    /// Configurations to run, in grid order
    pub configurations: Vec<Configuration>,
}

impl SweepPlan {
    /// Number of invocations the plan needs for `backends` backends.
    pub fn invocation_count(&self, backends: usize) -> usize {
        self.configurations.len() * backends
    }
}

/// Build the execution plan from the grid
pub fn build_plan(
    configurations: impl IntoIterator<Item = Configuration>,
    filter: Option<&Regex>,
    legs: Option<u32>,
) -> SweepPlan {
    let selected = configurations
        .into_iter()
        .filter(|c| {
            if let Some(l) = legs {
                if c.leg_count() != l {
                    return false;
                }
            }

            if let Some(re) = filter {
                if !re.is_match(&c.label()) {
                    return false;
                }
            }

            true
        })
        .collect();

    SweepPlan {
        configurations: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbench_core::produce_configurations;

    #[test]
    fn test_no_filter_keeps_grid_order() {
        let plan = build_plan(produce_configurations(), None, None);
        assert_eq!(plan.configurations, produce_configurations());
        assert_eq!(plan.invocation_count(2), 32);
    }

    #[test]
    fn test_leg_filter() {
        let plan = build_plan(produce_configurations(), None, Some(2));
        assert_eq!(plan.configurations.len(), 8);
        assert!(plan.configurations.iter().all(|c| c.leg_count() == 2));
    }

    #[test]
    fn test_regex_filter() {
        let re = Regex::new(r"sym=U1 ").unwrap();
        let plan = build_plan(produce_configurations(), Some(&re), None);
        // single U1 at three scales, for both leg counts
        assert_eq!(plan.configurations.len(), 6);
        assert!(
            plan.configurations
                .iter()
                .all(|c| c.symmetry_kinds().len() == 1)
        );
    }

    #[test]
    fn test_combined_filters() {
        let re = Regex::new(r"sectors=20$").unwrap();
        let plan = build_plan(produce_configurations(), Some(&re), Some(1));
        assert_eq!(plan.configurations.len(), 3);
    }
}
