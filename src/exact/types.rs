//! Problem, result and observer types for the exact solver.

use super::bound::lower_bound;
use super::error::PackError;
use super::feasibility::bin_loads;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A validated bin packing instance.
///
/// Item order is preserved: an assignment is keyed by item index.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::{PackError, PackingProblem};
///
/// let problem = PackingProblem::new(vec![10, 7, 7, 5, 5], 20).unwrap();
/// assert_eq!(problem.total_size(), 34);
/// assert_eq!(problem.lower_bound(), 2);
///
/// let err = PackingProblem::new(vec![25], 20).unwrap_err();
/// assert!(matches!(err, PackError::ItemTooLarge { index: 0, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingProblem {
    sizes: Vec<u32>,
    capacity: u32,
}

impl PackingProblem {
    /// Validates and creates a problem.
    ///
    /// Rejects an empty item list, zero capacity, zero-sized items and items
    /// larger than the capacity.
    pub fn new(sizes: Vec<u32>, capacity: u32) -> Result<Self, PackError> {
        if capacity == 0 {
            return Err(PackError::ZeroCapacity);
        }
        if sizes.is_empty() {
            return Err(PackError::EmptyItems);
        }
        for (index, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(PackError::ZeroSizedItem { index });
            }
            if size > capacity {
                return Err(PackError::ItemTooLarge {
                    index,
                    size,
                    capacity,
                });
            }
        }
        Ok(Self { sizes, capacity })
    }

    /// Item sizes in index order.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Shared bin capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.sizes.len()
    }

    /// Sum of all item sizes.
    pub fn total_size(&self) -> u64 {
        self.sizes.iter().map(|&s| u64::from(s)).sum()
    }

    /// Number of distinct item sizes.
    pub fn distinct_sizes(&self) -> usize {
        self.sizes.iter().collect::<BTreeSet<_>>().len()
    }

    /// Minimum bin count by volume.
    pub fn lower_bound(&self) -> usize {
        lower_bound(&self.sizes, self.capacity)
    }

    /// Unused capacity across `bin_count` bins.
    pub fn wasted_space(&self, bin_count: usize) -> u64 {
        (bin_count as u64 * u64::from(self.capacity)).saturating_sub(self.total_size())
    }
}

/// Why a search stopped without a packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AbortReason {
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The step budget ran out.
    StepLimit,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::TimeLimit => write!(f, "time limit"),
            Self::StepLimit => write!(f, "step limit"),
        }
    }
}

/// A feasible packing found by the exact solver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Packing {
    /// Number of bins used by the assignment.
    pub bin_count: usize,

    /// Bin index for each item, in item order.
    pub assignment: Vec<usize>,

    /// Volume lower bound the search started from.
    pub lower_bound: usize,

    /// Whether every smaller bin count was proven infeasible.
    ///
    /// `false` only when a round was abandoned on its time limit under
    /// [`RoundLimitPolicy::Promote`](super::RoundLimitPolicy::Promote).
    pub proven_optimal: bool,

    /// Number of bin counts searched, including the successful one.
    pub rounds: usize,

    /// Feasibility checks performed across all rounds.
    pub steps: u64,

    /// Wall-clock search time in milliseconds.
    pub elapsed_ms: u64,
}

impl Packing {
    /// Item indices held by each bin.
    pub fn bins(&self) -> Vec<Vec<usize>> {
        let mut bins = vec![Vec::new(); self.bin_count];
        for (item, &bin) in self.assignment.iter().enumerate() {
            bins[bin].push(item);
        }
        bins
    }

    /// Total size held by each bin.
    pub fn bin_loads(&self, problem: &PackingProblem) -> Vec<u64> {
        bin_loads(self.bin_count, problem.sizes(), &self.assignment)
    }

    /// Unused capacity of one bin.
    pub fn bin_wasted_space(&self, problem: &PackingProblem, bin: usize) -> u64 {
        let load: u64 = self
            .assignment
            .iter()
            .zip(problem.sizes())
            .filter(|&(&b, _)| b == bin)
            .map(|(_, &s)| u64::from(s))
            .sum();
        u64::from(problem.capacity()).saturating_sub(load)
    }

    /// Unused capacity across all bins.
    pub fn wasted_space(&self, problem: &PackingProblem) -> u64 {
        problem.wasted_space(self.bin_count)
    }
}

/// Receives progress events from the solver.
///
/// All methods default to no-ops. The search itself never prints; a caller
/// that wants progress output implements this trait.
pub trait SearchObserver {
    /// Called once, after validation, before the first round.
    fn on_search_start(&mut self, _problem: &PackingProblem, _lower_bound: usize) {}

    /// Called when a round for `bin_count` bins begins.
    fn on_round_start(&mut self, _bin_count: usize, _wasted_space: u64) {}

    /// Called when every assignment for `bin_count` bins was rejected.
    fn on_round_exhausted(&mut self, _bin_count: usize, _round_steps: u64) {}

    /// Called when a round was abandoned on its time limit and the search
    /// moves on to the next bin count.
    fn on_round_timeout(&mut self, _bin_count: usize) {}

    /// Called with the final packing.
    fn on_found(&mut self, _packing: &Packing) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_validation() {
        assert_eq!(PackingProblem::new(vec![], 20), Err(PackError::EmptyItems));
        assert_eq!(PackingProblem::new(vec![1], 0), Err(PackError::ZeroCapacity));
        assert_eq!(
            PackingProblem::new(vec![3, 0, 4], 10),
            Err(PackError::ZeroSizedItem { index: 1 })
        );
        assert_eq!(
            PackingProblem::new(vec![5, 25], 20),
            Err(PackError::ItemTooLarge {
                index: 1,
                size: 25,
                capacity: 20
            })
        );
        assert!(PackingProblem::new(vec![20], 20).is_ok());
    }

    #[test]
    fn test_problem_accessors() {
        let p = PackingProblem::new(vec![16, 2, 2, 18, 18, 4], 20).unwrap();
        assert_eq!(p.item_count(), 6);
        assert_eq!(p.total_size(), 60);
        assert_eq!(p.distinct_sizes(), 4);
        assert_eq!(p.lower_bound(), 3);
        assert_eq!(p.wasted_space(3), 0);
        assert_eq!(p.wasted_space(4), 20);
    }

    #[test]
    fn test_packing_bins_and_waste() {
        let p = PackingProblem::new(vec![10, 7, 7, 5, 5], 20).unwrap();
        let packing = Packing {
            bin_count: 2,
            assignment: vec![0, 1, 1, 0, 0],
            lower_bound: 2,
            proven_optimal: true,
            rounds: 1,
            steps: 1,
            elapsed_ms: 0,
        };
        assert_eq!(packing.bins(), vec![vec![0, 3, 4], vec![1, 2]]);
        assert_eq!(packing.bin_loads(&p), vec![20, 14]);
        assert_eq!(packing.bin_wasted_space(&p, 0), 0);
        assert_eq!(packing.bin_wasted_space(&p, 1), 6);
        assert_eq!(packing.wasted_space(&p), 6);
    }

    #[test]
    fn test_abort_reason_display() {
        assert_eq!(AbortReason::Cancelled.to_string(), "cancelled");
        assert_eq!(AbortReason::StepLimit.to_string(), "step limit");
    }
}
