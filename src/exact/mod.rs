//! Exhaustive (exact) one-dimensional bin packing.
//!
//! Finds the minimum number of equal-capacity bins that hold a list of
//! item sizes by checking every item-to-bin assignment, bin count by bin
//! count, starting from the volume lower bound.
//!
//! # Key Components
//!
//! - [`lower_bound`]: starting bin count, `ceil(sum / capacity)`
//! - [`Odometer`] / [`advance`]: mixed-radix enumeration of assignments
//! - [`is_feasible`]: capacity check of one assignment
//! - [`ExactRunner`]: the outer loop, with step/time budgets, cancellation
//!   and a [`SearchObserver`] for progress events
//!
//! # Cost
//!
//! A bin count `b` over `n` items spans `b^n` assignments, and proving a bin
//! count infeasible means visiting all of them. Runtime grows exponentially;
//! use [`ExactConfig::with_time_limit_ms`] or
//! [`ExactConfig::with_max_steps`] to bound it.

mod bound;
mod config;
mod enumerate;
mod error;
mod feasibility;
mod runner;
mod types;

pub use bound::{lower_bound, search_space_size};
pub use config::{ExactConfig, RoundLimitPolicy};
pub use enumerate::{advance, Advance, Assignments, Odometer};
pub use error::PackError;
pub use feasibility::{bin_loads, is_feasible, is_feasible_with};
pub use runner::ExactRunner;
pub use types::{AbortReason, NoopObserver, Packing, PackingProblem, SearchObserver};
