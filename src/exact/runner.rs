//! Exhaustive search loop.
//!
//! [`ExactRunner`] starts at the volume lower bound and, for each bin count,
//! checks every assignment in counting order until one fits. A bin count is
//! only abandoned once its whole space has been rejected, so the first
//! packing found uses the minimum number of bins. The exception is
//! [`RoundLimitPolicy::Promote`], which gives up on a round when its budget
//! runs out and flags the result as not proven optimal.

use super::bound::search_space_size;
use super::config::{ExactConfig, RoundLimitPolicy};
use super::enumerate::{advance, Advance};
use super::error::PackError;
use super::feasibility::is_feasible_with;
use super::types::{AbortReason, NoopObserver, Packing, PackingProblem, SearchObserver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Executes the exhaustive bin packing search.
///
/// # Usage
///
/// ```
/// use u_binpack::exact::{ExactConfig, ExactRunner, PackingProblem};
///
/// let problem = PackingProblem::new(vec![16, 2, 2, 18, 18, 4], 20).unwrap();
/// let packing = ExactRunner::run(&problem, &ExactConfig::default()).unwrap();
/// assert_eq!(packing.bin_count, 3);
/// assert!(packing.proven_optimal);
/// ```
pub struct ExactRunner;

impl ExactRunner {
    /// Validates `sizes` and `capacity`, then solves with the default
    /// configuration.
    pub fn solve(sizes: &[u32], capacity: u32) -> Result<Packing, PackError> {
        let problem = PackingProblem::new(sizes.to_vec(), capacity)?;
        Self::run(&problem, &ExactConfig::default())
    }

    /// Runs the search.
    pub fn run(problem: &PackingProblem, config: &ExactConfig) -> Result<Packing, PackError> {
        Self::run_with_observer(problem, config, None, &mut NoopObserver)
    }

    /// Runs the search with an optional cancellation token.
    pub fn run_with_cancel(
        problem: &PackingProblem,
        config: &ExactConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Packing, PackError> {
        Self::run_with_observer(problem, config, cancel, &mut NoopObserver)
    }

    /// Runs the search, reporting progress to `observer`.
    pub fn run_with_observer<O: SearchObserver + ?Sized>(
        problem: &PackingProblem,
        config: &ExactConfig,
        cancel: Option<Arc<AtomicBool>>,
        observer: &mut O,
    ) -> Result<Packing, PackError> {
        config.validate().map_err(PackError::InvalidConfig)?;

        let start = Instant::now();
        let lower_bound = problem.lower_bound();
        let promote = config.on_round_limit == RoundLimitPolicy::Promote;
        let mut budget = Budget::new(config, cancel.as_deref());

        log::debug!(
            "packing {} items ({} distinct sizes) into bins of capacity {}, lower bound {}",
            problem.item_count(),
            problem.distinct_sizes(),
            problem.capacity(),
            lower_bound
        );
        observer.on_search_start(problem, lower_bound);

        let mut bins = lower_bound;
        let mut rounds = 0usize;
        let mut total_steps = 0u64;
        let mut window_steps = 0u64;
        let mut proven_optimal = true;

        loop {
            rounds += 1;
            let wasted = problem.wasted_space(bins);
            match search_space_size(problem.item_count(), bins) {
                Some(space) => log::debug!("searching {bins} bins, {space} assignments"),
                None => log::debug!("searching {bins} bins, more than 2^128 assignments"),
            }
            observer.on_round_start(bins, wasted);

            // With one bin per item every item fits on its own; a per-round
            // budget must not push the search past that.
            if promote && bins >= problem.item_count() {
                let packing = Packing {
                    bin_count: bins,
                    assignment: (0..problem.item_count()).collect(),
                    lower_bound,
                    proven_optimal,
                    rounds,
                    steps: total_steps,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                };
                log::info!("reached one bin per item at {bins} bins after {total_steps} steps");
                observer.on_found(&packing);
                return Ok(packing);
            }

            let before = window_steps;
            let outcome = search_round(problem, bins, &budget, config.parallel, &mut window_steps);
            let round_steps = window_steps - before;
            total_steps += round_steps;

            match outcome {
                RoundOutcome::Found(assignment) => {
                    let packing = Packing {
                        bin_count: bins,
                        assignment,
                        lower_bound,
                        proven_optimal,
                        rounds,
                        steps: total_steps,
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    };
                    log::info!(
                        "found packing into {} bins after {} steps ({} ms)",
                        bins,
                        total_steps,
                        packing.elapsed_ms
                    );
                    observer.on_found(&packing);
                    return Ok(packing);
                }
                RoundOutcome::Exhausted => {
                    log::debug!("{bins} bins infeasible after {round_steps} steps");
                    observer.on_round_exhausted(bins, round_steps);
                }
                RoundOutcome::Stopped(AbortReason::TimeLimit | AbortReason::StepLimit)
                    if promote =>
                {
                    log::warn!("round at {bins} bins hit its budget, promoting to {}", bins + 1);
                    observer.on_round_timeout(bins);
                    proven_optimal = false;
                }
                RoundOutcome::Stopped(reason) => {
                    log::warn!("search aborted ({reason}) at {bins} bins after {total_steps} steps");
                    return Err(PackError::SearchAborted {
                        reason,
                        bin_count: bins,
                        steps: total_steps,
                    });
                }
            }

            bins += 1;
            if promote {
                window_steps = 0;
                budget.restart();
            }
        }
    }
}

/// Result of searching one bin count.
#[derive(Debug)]
enum RoundOutcome {
    Found(Vec<usize>),
    Exhausted,
    Stopped(AbortReason),
}

/// Result of scanning one slice of the assignment space.
#[derive(Debug)]
enum ScanOutcome {
    Done(RoundOutcome),
    /// Another worker found a packing first.
    Yielded,
}

/// Step, clock and cancellation limits for one budget window.
///
/// Under [`RoundLimitPolicy::Abort`] the window is the whole search; under
/// [`RoundLimitPolicy::Promote`] it is restarted every round.
#[derive(Debug)]
struct Budget<'a> {
    cancel: Option<&'a AtomicBool>,
    time_limit: Option<Duration>,
    max_steps: u64,
    check_mask: u64,
    clock: Instant,
}

impl<'a> Budget<'a> {
    fn new(config: &ExactConfig, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            cancel,
            time_limit: (config.time_limit_ms > 0)
                .then(|| Duration::from_millis(config.time_limit_ms)),
            max_steps: config.max_steps,
            check_mask: config.check_mask(),
            clock: Instant::now(),
        }
    }

    fn restart(&mut self) {
        self.clock = Instant::now();
    }

    #[inline]
    fn steps_exhausted(&self, steps: u64) -> bool {
        self.max_steps != 0 && steps >= self.max_steps
    }

    #[inline]
    fn is_check_point(&self, steps: u64) -> bool {
        steps & self.check_mask == 0
    }

    fn poll(&self) -> Option<AbortReason> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(AbortReason::Cancelled);
        }
        match self.time_limit {
            Some(limit) if self.clock.elapsed() > limit => Some(AbortReason::TimeLimit),
            _ => None,
        }
    }
}

fn search_round(
    problem: &PackingProblem,
    bins: usize,
    budget: &Budget<'_>,
    parallel: bool,
    steps: &mut u64,
) -> RoundOutcome {
    #[cfg(feature = "parallel")]
    {
        if parallel && bins > 1 && problem.item_count() > 1 {
            return search_round_parallel(problem, bins, budget, steps);
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut digits = vec![0usize; problem.item_count()];
    let free = digits.len();
    match scan(problem, &mut digits, free, bins, budget, steps, None) {
        ScanOutcome::Done(outcome) => outcome,
        ScanOutcome::Yielded => unreachable!("scan only yields when given a found flag"),
    }
}

/// Splits the round on the bin of the last item; each rayon task enumerates
/// the remaining digits under one fixed value.
#[cfg(feature = "parallel")]
fn search_round_parallel(
    problem: &PackingProblem,
    bins: usize,
    budget: &Budget<'_>,
    steps: &mut u64,
) -> RoundOutcome {
    use rayon::prelude::*;

    let n = problem.item_count();
    let found = AtomicBool::new(false);
    let base = *steps;

    let results: Vec<(ScanOutcome, u64)> = (0..bins)
        .into_par_iter()
        .map(|last_bin| {
            let mut digits = vec![0usize; n];
            digits[n - 1] = last_bin;
            let mut local = base;
            let outcome = scan(problem, &mut digits, n - 1, bins, budget, &mut local, Some(&found));
            if matches!(outcome, ScanOutcome::Done(RoundOutcome::Found(_))) {
                found.store(true, Ordering::Relaxed);
            }
            (outcome, local - base)
        })
        .collect();

    *steps += results.iter().map(|(_, s)| s).sum::<u64>();

    let mut stopped = None;
    for (outcome, _) in results {
        match outcome {
            ScanOutcome::Done(RoundOutcome::Found(assignment)) => {
                return RoundOutcome::Found(assignment)
            }
            ScanOutcome::Done(RoundOutcome::Stopped(reason)) => {
                stopped.get_or_insert(reason);
            }
            ScanOutcome::Done(RoundOutcome::Exhausted) | ScanOutcome::Yielded => {}
        }
    }
    match stopped {
        Some(reason) => RoundOutcome::Stopped(reason),
        None => RoundOutcome::Exhausted,
    }
}

/// Checks assignments starting from `digits`, advancing only the first
/// `free` digits, until one fits, the slice is exhausted or a limit fires.
fn scan(
    problem: &PackingProblem,
    digits: &mut [usize],
    free: usize,
    bins: usize,
    budget: &Budget<'_>,
    steps: &mut u64,
    found: Option<&AtomicBool>,
) -> ScanOutcome {
    let sizes = problem.sizes();
    let capacity = problem.capacity();
    let mut loads = vec![0u64; bins];

    loop {
        if budget.steps_exhausted(*steps) {
            return ScanOutcome::Done(RoundOutcome::Stopped(AbortReason::StepLimit));
        }
        if budget.is_check_point(*steps) {
            if let Some(reason) = budget.poll() {
                return ScanOutcome::Done(RoundOutcome::Stopped(reason));
            }
            if found.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return ScanOutcome::Yielded;
            }
        }
        *steps += 1;

        if is_feasible_with(sizes, digits, capacity, &mut loads) {
            return ScanOutcome::Done(RoundOutcome::Found(digits.to_vec()));
        }
        if advance(&mut digits[..free], bins) == Advance::Exhausted {
            return ScanOutcome::Done(RoundOutcome::Exhausted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::{is_feasible, lower_bound};

    fn solve(sizes: &[u32], capacity: u32) -> Packing {
        ExactRunner::solve(sizes, capacity).unwrap()
    }

    fn assert_valid(packing: &Packing, sizes: &[u32], capacity: u32) {
        assert_eq!(packing.assignment.len(), sizes.len());
        assert!(packing.assignment.iter().all(|&b| b < packing.bin_count));
        assert!(is_feasible(
            packing.bin_count,
            sizes,
            &packing.assignment,
            capacity
        ));
        assert!(packing.bin_count >= lower_bound(sizes, capacity));
    }

    #[test]
    fn test_scenario_two_bins() {
        let sizes = [10, 7, 7, 5, 5];
        let packing = solve(&sizes, 20);
        assert_eq!(packing.bin_count, 2);
        assert_eq!(packing.rounds, 1);
        assert_eq!(packing.assignment, vec![1, 1, 0, 0, 0]);
        assert_eq!(packing.steps, 4);
        assert!(packing.proven_optimal);
        assert_valid(&packing, &sizes, 20);
    }

    #[test]
    fn test_scenario_three_bins() {
        let sizes = [16, 2, 2, 18, 18, 4];
        let packing = solve(&sizes, 20);
        assert_eq!(packing.bin_count, 3);
        assert_valid(&packing, &sizes, 20);
    }

    #[test]
    fn test_scenario_five_bins_needs_second_round() {
        let sizes = [13, 5, 6, 11, 15, 11, 12, 7];
        let packing = solve(&sizes, 20);
        assert_eq!(packing.lower_bound, 4);
        assert_eq!(packing.bin_count, 5);
        assert_eq!(packing.rounds, 2);
        assert!(packing.steps > 4u64.pow(8));
        assert_valid(&packing, &sizes, 20);
    }

    #[test]
    fn test_oversized_item_is_rejected_before_search() {
        let err = ExactRunner::solve(&[25], 20).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(
            err,
            PackError::ItemTooLarge {
                index: 0,
                size: 25,
                capacity: 20
            }
        );
    }

    #[test]
    fn test_exact_fit_single_item() {
        let packing = solve(&[20], 20);
        assert_eq!(packing.bin_count, 1);
        assert_eq!(packing.assignment, vec![0]);
        assert_eq!(packing.steps, 1);
    }

    #[test]
    fn test_first_feasible_in_counting_order() {
        // Round 2 over [11, 11, 11] is exhausted after 8 checks; in round 3
        // the first assignment with three distinct bins is [2, 1, 0].
        let packing = solve(&[11, 11, 11], 20);
        assert_eq!(packing.bin_count, 3);
        assert_eq!(packing.assignment, vec![2, 1, 0]);
        assert_eq!(packing.steps, 8 + 6);
    }

    #[test]
    fn test_repeated_runs_agree() {
        let sizes = [13, 5, 6, 11, 15, 11, 12, 7];
        let a = solve(&sizes, 20);
        let b = solve(&sizes, 20);
        assert_eq!(a.bin_count, b.bin_count);
        assert_eq!(a.assignment, b.assignment);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let problem = PackingProblem::new(vec![5], 10).unwrap();
        let config = ExactConfig::default().with_time_limit_ms(10);
        let err = ExactRunner::run(&problem, &config).unwrap_err();
        assert!(matches!(err, PackError::InvalidConfig(_)));
    }

    #[test]
    fn test_cancellation() {
        let problem = PackingProblem::new(vec![13, 5, 6, 11, 15, 11, 12, 7], 20).unwrap();
        // Raised before the run so the first check point sees it.
        let cancel = Arc::new(AtomicBool::new(true));
        let err =
            ExactRunner::run_with_cancel(&problem, &ExactConfig::default(), Some(cancel)).unwrap_err();
        assert_eq!(
            err,
            PackError::SearchAborted {
                reason: AbortReason::Cancelled,
                bin_count: 4,
                steps: 0
            }
        );
    }

    #[test]
    fn test_step_limit_aborts() {
        let problem = PackingProblem::new(vec![11, 11, 11, 1, 1, 1, 1], 20).unwrap();
        let config = ExactConfig::default().with_max_steps(50);
        let err = ExactRunner::run(&problem, &config).unwrap_err();
        assert_eq!(
            err,
            PackError::SearchAborted {
                reason: AbortReason::StepLimit,
                bin_count: 2,
                steps: 50
            }
        );
    }

    #[test]
    fn test_step_limit_spans_rounds_under_abort() {
        // 128 checks exhaust round 2 and round 3 needs 6 more.
        let problem = PackingProblem::new(vec![11, 11, 11, 1, 1, 1, 1], 20).unwrap();
        let ok = ExactRunner::run(&problem, &ExactConfig::default().with_max_steps(134)).unwrap();
        assert_eq!(ok.bin_count, 3);
        assert_eq!(ok.steps, 134);

        let err = ExactRunner::run(&problem, &ExactConfig::default().with_max_steps(133)).unwrap_err();
        assert!(matches!(
            err,
            PackError::SearchAborted {
                reason: AbortReason::StepLimit,
                bin_count: 3,
                steps: 133
            }
        ));
    }

    #[test]
    fn test_promote_policy_marks_suboptimal() {
        let problem = PackingProblem::new(vec![11, 11, 11, 1, 1, 1, 1], 20).unwrap();
        let config = ExactConfig::default()
            .with_max_steps(50)
            .with_round_limit_policy(RoundLimitPolicy::Promote);
        let packing = ExactRunner::run(&problem, &config).unwrap();
        assert_eq!(packing.bin_count, 3);
        assert_eq!(packing.rounds, 2);
        assert!(!packing.proven_optimal);
        assert_eq!(packing.steps, 56);
        assert_valid(&packing, problem.sizes(), problem.capacity());
    }

    #[test]
    fn test_promote_stops_at_one_bin_per_item() {
        // Round 2 hits the 5-step budget; round 3 would need 6 steps, and
        // every later round more, so promotion ends at three bins.
        let problem = PackingProblem::new(vec![11, 11, 11], 20).unwrap();
        let config = ExactConfig::default()
            .with_max_steps(5)
            .with_round_limit_policy(RoundLimitPolicy::Promote);
        let packing = ExactRunner::run(&problem, &config).unwrap();
        assert_eq!(packing.bin_count, 3);
        assert_eq!(packing.assignment, vec![0, 1, 2]);
        assert_eq!(packing.rounds, 2);
        assert_eq!(packing.steps, 5);
        assert!(!packing.proven_optimal);
        assert_valid(&packing, problem.sizes(), problem.capacity());
    }

    #[test]
    fn test_promote_with_lower_bound_at_item_count() {
        let problem = PackingProblem::new(vec![15, 15], 20).unwrap();
        let config = ExactConfig::default()
            .with_max_steps(1)
            .with_round_limit_policy(RoundLimitPolicy::Promote);
        let packing = ExactRunner::run(&problem, &config).unwrap();
        assert_eq!(packing.bin_count, 2);
        assert_eq!(packing.steps, 0);
        assert!(packing.proven_optimal);
    }

    #[test]
    fn test_time_limit_aborts_long_search() {
        // Six bins for these ten items is infeasible and spans 6^10 assignments.
        let problem =
            PackingProblem::new(vec![13, 5, 6, 11, 15, 11, 19, 12, 7, 18], 20).unwrap();
        let config = ExactConfig::default()
            .with_time_limit_ms(50)
            .with_check_interval(1024);
        let err = ExactRunner::run(&problem, &config).unwrap_err();
        assert!(matches!(
            err,
            PackError::SearchAborted {
                reason: AbortReason::TimeLimit,
                bin_count: 6,
                ..
            }
        ));
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Vec<String>,
    }

    impl SearchObserver for RecordingObserver {
        fn on_search_start(&mut self, problem: &PackingProblem, lower_bound: usize) {
            self.events
                .push(format!("start {} {}", problem.item_count(), lower_bound));
        }
        fn on_round_start(&mut self, bin_count: usize, wasted_space: u64) {
            self.events.push(format!("round {bin_count} {wasted_space}"));
        }
        fn on_round_exhausted(&mut self, bin_count: usize, round_steps: u64) {
            self.events.push(format!("exhausted {bin_count} {round_steps}"));
        }
        fn on_round_timeout(&mut self, bin_count: usize) {
            self.events.push(format!("timeout {bin_count}"));
        }
        fn on_found(&mut self, packing: &Packing) {
            self.events.push(format!("found {}", packing.bin_count));
        }
    }

    #[test]
    fn test_observer_sees_every_round() {
        let problem = PackingProblem::new(vec![11, 11, 11], 20).unwrap();
        let mut observer = RecordingObserver::default();
        ExactRunner::run_with_observer(&problem, &ExactConfig::default(), None, &mut observer)
            .unwrap();
        assert_eq!(
            observer.events,
            vec![
                "start 3 2",
                "round 2 7",
                "exhausted 2 8",
                "round 3 27",
                "found 3"
            ]
        );
    }

    #[test]
    fn test_observer_sees_promotion() {
        let problem = PackingProblem::new(vec![11, 11, 11, 1, 1, 1, 1], 20).unwrap();
        let config = ExactConfig::default()
            .with_max_steps(50)
            .with_round_limit_policy(RoundLimitPolicy::Promote);
        let mut observer = RecordingObserver::default();
        ExactRunner::run_with_observer(&problem, &config, None, &mut observer).unwrap();
        assert!(observer.events.contains(&"timeout 2".to_string()));
        assert_eq!(observer.events.last().map(String::as_str), Some("found 3"));
    }

    #[test]
    fn test_dyn_observer() {
        let problem = PackingProblem::new(vec![10, 7, 7, 5, 5], 20).unwrap();
        let mut observer = RecordingObserver::default();
        let dyn_observer: &mut dyn SearchObserver = &mut observer;
        let packing =
            ExactRunner::run_with_observer(&problem, &ExactConfig::default(), None, dyn_observer)
                .unwrap();
        assert_eq!(packing.bin_count, 2);
        assert_eq!(observer.events.len(), 3);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential_bin_count() {
        for sizes in [
            vec![10, 7, 7, 5, 5],
            vec![16, 2, 2, 18, 18, 4],
            vec![13, 5, 6, 11, 15, 11, 12, 7],
            vec![11, 11, 11],
        ] {
            let problem = PackingProblem::new(sizes.clone(), 20).unwrap();
            let seq = ExactRunner::run(&problem, &ExactConfig::default()).unwrap();
            let par =
                ExactRunner::run(&problem, &ExactConfig::default().with_parallel(true)).unwrap();
            assert_eq!(seq.bin_count, par.bin_count);
            assert_valid(&par, &sizes, 20);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_exhausts_full_space() {
        let problem = PackingProblem::new(vec![11, 11, 11], 20).unwrap();
        let config = ExactConfig::default().with_parallel(true);
        let packing = ExactRunner::run(&problem, &config).unwrap();
        assert_eq!(packing.bin_count, 3);
        assert!(packing.steps >= 8);
    }
}
