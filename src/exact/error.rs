//! Error type for the exact solver.

use super::types::AbortReason;
use thiserror::Error;

/// Errors returned by [`ExactRunner`](super::ExactRunner) and
/// [`PackingProblem::new`](super::PackingProblem::new).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The item list is empty.
    #[error("item list is empty")]
    EmptyItems,

    /// Bin capacity is zero.
    #[error("bin capacity must be positive")]
    ZeroCapacity,

    /// An item has size zero.
    #[error("item {index} has size 0; item sizes must be positive")]
    ZeroSizedItem {
        /// Index of the offending item.
        index: usize,
    },

    /// An item is larger than the bin capacity and can never be packed.
    #[error("item {index} has size {size}, which exceeds bin capacity {capacity}")]
    ItemTooLarge {
        /// Index of the offending item.
        index: usize,
        /// Size of the offending item.
        size: u32,
        /// Bin capacity.
        capacity: u32,
    },

    /// The solver configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The search stopped before a packing was found.
    #[error("search aborted ({reason}) at {bin_count} bins after {steps} steps")]
    SearchAborted {
        /// Why the search stopped.
        reason: AbortReason,
        /// Bin count being searched when the search stopped.
        bin_count: usize,
        /// Feasibility checks performed across all rounds.
        steps: u64,
    },
}

impl PackError {
    /// Whether this error describes a malformed problem instance.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PackError::EmptyItems
                | PackError::ZeroCapacity
                | PackError::ZeroSizedItem { .. }
                | PackError::ItemTooLarge { .. }
        )
    }

    /// Whether this error is a budget or cancellation abort.
    pub fn is_aborted(&self) -> bool {
        matches!(self, PackError::SearchAborted { .. })
    }
}
