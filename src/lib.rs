//! Exact one-dimensional bin packing.
//!
//! Finds a provably minimal number of equal-capacity bins for a list of
//! positive item sizes by exhaustive enumeration. No heuristics and no
//! pruning: every assignment for a bin count is checked before the bin count
//! is increased, so runtime grows as `b^n` and the solver is meant for small
//! instances.
//!
//! - **Exact solver** ([`exact`]): lower bound, mixed-radix assignment
//!   enumeration, capacity check and the bin-count loop, with step/time
//!   budgets, cancellation and progress observers.
//! - **Instances** ([`instance`]): random problem generation.
//! - **Reports** ([`report`]): text rendering of a packing.
//!
//! # Example
//!
//! ```
//! use u_binpack::exact::ExactRunner;
//!
//! let packing = ExactRunner::solve(&[10, 7, 7, 5, 5], 20).unwrap();
//! assert_eq!(packing.bin_count, 2);
//! ```
//!
//! # Features
//!
//! - `parallel`: split each bin-count round across rayon workers.
//! - `serde`: serialize configurations and results.

pub mod exact;
pub mod instance;
pub mod report;

pub use exact::{ExactConfig, ExactRunner, PackError, Packing, PackingProblem};
