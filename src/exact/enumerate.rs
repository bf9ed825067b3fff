//! Mixed-radix enumeration of item-to-bin assignments.
//!
//! An assignment of `n` items to `b` bins is read as an `n`-digit number in
//! base `b`, least significant digit first (digit `i` is the bin of item
//! `i`). Counting from all zeros to all `b - 1` visits each of the `b^n`
//! assignments exactly once.

use std::iter::FusedIterator;

/// Outcome of advancing an assignment by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The digits now hold the next assignment.
    Advanced,
    /// Every digit overflowed; the space is fully explored and the digits
    /// have wrapped back to all zeros.
    Exhausted,
}

/// Advances `digits` to the next assignment in counting order.
///
/// Scans from index 0: the first digit below `radix - 1` is incremented and
/// the scan stops; digits at `radix - 1` are reset to 0 and carry into the
/// next index. If every digit carries, returns [`Advance::Exhausted`].
///
/// # Examples
///
/// ```
/// use u_binpack::exact::{advance, Advance};
///
/// let mut digits = vec![1, 0, 1];
/// assert_eq!(advance(&mut digits, 2), Advance::Advanced);
/// assert_eq!(digits, vec![0, 1, 1]);
///
/// let mut digits = vec![1, 1];
/// assert_eq!(advance(&mut digits, 2), Advance::Exhausted);
/// ```
#[inline]
pub fn advance(digits: &mut [usize], radix: usize) -> Advance {
    for digit in digits.iter_mut() {
        if *digit + 1 < radix {
            *digit += 1;
            return Advance::Advanced;
        }
        *digit = 0;
    }
    Advance::Exhausted
}

/// Stateful enumerator owning a single in-place assignment.
///
/// Starts at all zeros. Each call to [`advance`](Odometer::advance) moves
/// to the next assignment; once it reports [`Advance::Exhausted`] the
/// odometer stays exhausted.
#[derive(Debug, Clone)]
pub struct Odometer {
    digits: Vec<usize>,
    radix: usize,
    exhausted: bool,
}

impl Odometer {
    /// Creates an odometer over `items` digits in base `bins`.
    ///
    /// # Panics
    ///
    /// Panics if `bins` is 0.
    pub fn new(items: usize, bins: usize) -> Self {
        assert!(bins > 0, "bin count must be positive");
        Self {
            digits: vec![0; items],
            radix: bins,
            exhausted: false,
        }
    }

    /// The current assignment.
    #[inline]
    pub fn current(&self) -> &[usize] {
        &self.digits
    }

    /// Whether the space has been fully explored.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Moves to the next assignment.
    #[inline]
    pub fn advance(&mut self) -> Advance {
        if self.exhausted {
            return Advance::Exhausted;
        }
        let outcome = advance(&mut self.digits, self.radix);
        if outcome == Advance::Exhausted {
            self.exhausted = true;
        }
        outcome
    }
}

/// Owning iterator over every assignment for a fixed bin count.
///
/// Yields `bins^items` vectors, starting at all zeros. With zero items it
/// yields the single empty assignment.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::Assignments;
///
/// assert_eq!(Assignments::new(3, 2).count(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct Assignments {
    odometer: Odometer,
    pending: bool,
}

impl Assignments {
    /// Creates an iterator over assignments of `items` items to `bins` bins.
    pub fn new(items: usize, bins: usize) -> Self {
        Self {
            odometer: Odometer::new(items, bins),
            pending: true,
        }
    }
}

impl Iterator for Assignments {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.pending {
            self.pending = false;
            return Some(self.odometer.current().to_vec());
        }
        match self.odometer.advance() {
            Advance::Advanced => Some(self.odometer.current().to_vec()),
            Advance::Exhausted => None,
        }
    }
}

impl FusedIterator for Assignments {}
