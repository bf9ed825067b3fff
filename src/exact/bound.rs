//! Starting bin count and search-space size.

/// Minimum number of bins that could hold `sizes` by volume alone.
///
/// Computed with exact integer ceiling division on a `u64` total, so the
/// bound is never understated at the boundary. Never returns 0; an empty
/// item list yields 1. Saturates at `usize::MAX` on targets where the bound
/// does not fit.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::lower_bound;
///
/// assert_eq!(lower_bound(&[10, 7, 7, 5, 5], 20), 2);
/// assert_eq!(lower_bound(&[20], 20), 1);
/// assert_eq!(lower_bound(&[20, 1], 20), 2);
/// ```
///
/// # Panics
///
/// Panics if `capacity` is 0. [`PackingProblem`](super::PackingProblem)
/// rejects that before a search ever calls this.
pub fn lower_bound(sizes: &[u32], capacity: u32) -> usize {
    assert!(capacity > 0, "capacity must be positive");
    let total: u64 = sizes.iter().map(|&s| u64::from(s)).sum();
    let bins = total.div_ceil(u64::from(capacity));
    usize::try_from(bins).unwrap_or(usize::MAX).max(1)
}

/// Number of assignments of `items` items to `bins` bins, `bins^items`.
///
/// Returns `None` if the count does not fit in a `u128`.
pub fn search_space_size(items: usize, bins: usize) -> Option<u128> {
    let exp = u32::try_from(items).ok()?;
    (bins as u128).checked_pow(exp)
}
