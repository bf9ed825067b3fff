//! Capacity check for a single assignment.

/// Whether `assignment` keeps every bin within `capacity`.
///
/// Accumulates item sizes per bin in index order and returns `false` as soon
/// as any bin exceeds `capacity`. `loads` is scratch space of at least
/// `bins` entries; it is cleared on entry so the runner can reuse one buffer
/// across millions of checks.
///
/// # Panics
///
/// Panics if an assignment value is not below `loads.len()`, or if
/// `assignment` is shorter than `sizes`.
#[inline]
pub fn is_feasible_with(
    sizes: &[u32],
    assignment: &[usize],
    capacity: u32,
    loads: &mut [u64],
) -> bool {
    loads.fill(0);
    let capacity = u64::from(capacity);
    for (&size, &bin) in sizes.iter().zip(assignment) {
        let load = &mut loads[bin];
        *load += u64::from(size);
        if *load > capacity {
            return false;
        }
    }
    true
}

/// Whether `assignment` of `sizes` into `bins` bins keeps every bin within
/// `capacity`.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::is_feasible;
///
/// let sizes = [10, 7, 7, 5, 5];
/// assert!(is_feasible(2, &sizes, &[0, 1, 1, 0, 0], 20));
/// assert!(is_feasible(2, &sizes, &[0, 0, 1, 1, 1], 20));
/// assert!(!is_feasible(2, &sizes, &[0, 0, 0, 1, 1], 20));
/// ```
pub fn is_feasible(bins: usize, sizes: &[u32], assignment: &[usize], capacity: u32) -> bool {
    let mut loads = vec![0u64; bins];
    is_feasible_with(sizes, assignment, capacity, &mut loads)
}

/// Total size assigned to each of `bins` bins.
pub fn bin_loads(bins: usize, sizes: &[u32], assignment: &[usize]) -> Vec<u64> {
    let mut loads = vec![0u64; bins];
    for (&size, &bin) in sizes.iter().zip(assignment) {
        loads[bin] += u64::from(size);
    }
    loads
}
