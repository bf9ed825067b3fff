//! Random problem instances for testing and benchmarking.

use crate::exact::{PackError, PackingProblem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates `count` items with sizes drawn uniformly from
/// `[min_size, max_size]`.
///
/// Returns [`PackError::InvalidConfig`] unless
/// `1 <= min_size <= max_size <= capacity`, and [`PackError::EmptyItems`]
/// if `count` is 0.
///
/// # Examples
///
/// ```
/// use u_binpack::instance::random_instance;
///
/// let mut rng = rand::rng();
/// let problem = random_instance(100, 10, 60, 8, &mut rng).unwrap();
/// assert_eq!(problem.item_count(), 8);
/// assert!(problem.sizes().iter().all(|&s| (10..=60).contains(&s)));
/// ```
pub fn random_instance<R: Rng>(
    capacity: u32,
    min_size: u32,
    max_size: u32,
    count: usize,
    rng: &mut R,
) -> Result<PackingProblem, PackError> {
    if min_size == 0 || min_size > max_size || max_size > capacity {
        return Err(PackError::InvalidConfig(format!(
            "item sizes must satisfy 1 <= min ({min_size}) <= max ({max_size}) <= capacity ({capacity})"
        )));
    }
    let sizes = (0..count)
        .map(|_| rng.random_range(min_size..=max_size))
        .collect();
    PackingProblem::new(sizes, capacity)
}

/// Seeded variant of [`random_instance`]; equal seeds give equal instances.
pub fn random_instance_seeded(
    capacity: u32,
    min_size: u32,
    max_size: u32,
    count: usize,
    seed: u64,
) -> Result<PackingProblem, PackError> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_instance(capacity, min_size, max_size, count, &mut rng)
}
