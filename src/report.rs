//! Text rendering of a packing.
//!
//! ```text
//! [10 5 5] (Wasted = 0)
//! [7 7] (Wasted = 6)
//! ```

use crate::exact::{Packing, PackingProblem};
use std::fmt;

/// Displays one line per bin listing its item sizes in item order, with the
/// bin's unused capacity.
///
/// A packing that is not proven optimal is preceded by a
/// `Potentially Sub-Optimal Packing!` line.
///
/// # Examples
///
/// ```
/// use u_binpack::exact::{ExactRunner, PackingProblem, ExactConfig};
/// use u_binpack::report::PackingReport;
///
/// let problem = PackingProblem::new(vec![10, 7, 7, 5, 5], 20).unwrap();
/// let packing = ExactRunner::run(&problem, &ExactConfig::default()).unwrap();
/// let text = PackingReport::new(&problem, &packing).to_string();
/// assert_eq!(text.lines().count(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PackingReport<'a> {
    problem: &'a PackingProblem,
    packing: &'a Packing,
}

impl<'a> PackingReport<'a> {
    pub fn new(problem: &'a PackingProblem, packing: &'a Packing) -> Self {
        Self { problem, packing }
    }
}

impl fmt::Display for PackingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.packing.proven_optimal {
            writeln!(f, "Potentially Sub-Optimal Packing!")?;
        }
        let sizes = self.problem.sizes();
        for (bin, items) in self.packing.bins().iter().enumerate() {
            write!(f, "[")?;
            for (i, &item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", sizes[item])?;
            }
            writeln!(
                f,
                "] (Wasted = {})",
                self.packing.bin_wasted_space(self.problem, bin)
            )?;
        }
        Ok(())
    }
}
