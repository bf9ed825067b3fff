//! Exact solver configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happens when a time or step limit fires inside a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundLimitPolicy {
    /// Stop the search and report
    /// [`PackError::SearchAborted`](super::PackError::SearchAborted).
    #[default]
    Abort,

    /// Abandon the round, move on to the next bin count with a fresh time
    /// and step budget, and mark the eventual packing as not proven optimal.
    ///
    /// Once the bin count reaches the item count the search stops with one
    /// item per bin. Cancellation still aborts.
    Promote,
}

/// Configuration for the exhaustive solver.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::{ExactConfig, RoundLimitPolicy};
///
/// let config = ExactConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_max_steps(10_000_000)
///     .with_round_limit_policy(RoundLimitPolicy::Promote);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExactConfig {
    /// Wall-clock budget in milliseconds. 0 = no limit.
    ///
    /// Under [`RoundLimitPolicy::Promote`] the budget applies to each round
    /// separately.
    pub time_limit_ms: u64,

    /// Maximum feasibility checks. 0 = no limit.
    ///
    /// Counted across all rounds, or per round under
    /// [`RoundLimitPolicy::Promote`].
    pub max_steps: u64,

    /// Steps between clock and cancellation checks. Must be a power of two.
    pub check_interval: u64,

    /// Behaviour when a time or step limit fires inside a round.
    pub on_round_limit: RoundLimitPolicy,

    /// Whether to split each round across rayon workers.
    ///
    /// Only honoured when the crate is built with the `parallel` feature.
    pub parallel: bool,
}

impl ExactConfig {
    /// Smallest non-zero time limit accepted.
    pub const MIN_TIME_LIMIT_MS: u64 = 50;

    /// Largest time limit accepted.
    pub const MAX_TIME_LIMIT_MS: u64 = 1_000_000_000_000;

    /// Default steps between clock checks (2^14).
    pub const DEFAULT_CHECK_INTERVAL: u64 = 1 << 14;
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 0,
            max_steps: 0,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
            on_round_limit: RoundLimitPolicy::default(),
            parallel: false,
        }
    }
}

impl ExactConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_max_steps(mut self, n: u64) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_check_interval(mut self, n: u64) -> Self {
        self.check_interval = n;
        self
    }

    pub fn with_round_limit_policy(mut self, policy: RoundLimitPolicy) -> Self {
        self.on_round_limit = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms != 0
            && !(Self::MIN_TIME_LIMIT_MS..=Self::MAX_TIME_LIMIT_MS).contains(&self.time_limit_ms)
        {
            return Err(format!(
                "time_limit_ms must be 0 or in [{}, {}], got {}",
                Self::MIN_TIME_LIMIT_MS,
                Self::MAX_TIME_LIMIT_MS,
                self.time_limit_ms
            ));
        }
        if !self.check_interval.is_power_of_two() {
            return Err(format!(
                "check_interval must be a power of two, got {}",
                self.check_interval
            ));
        }
        Ok(())
    }

    /// Bitmask form of `check_interval`.
    pub(crate) fn check_mask(&self) -> u64 {
        self.check_interval - 1
    }
}
