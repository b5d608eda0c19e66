// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Radius search monitoring interface
//!
//! Declares the `SearchMonitor` trait for observing a radius search. The
//! solver calls the hooks in this order:
//!
//! - enter (after the metric has been computed)
//! - probe, once per oracle call, including the final confirming call
//! - solution (only if the search succeeds)
//! - exit (always once entered, with final statistics)
//!
//! Methods take `&mut self`; monitors are assumed single-threaded. The
//! oracle is cheap relative to printing, so keep callbacks lightweight.

use crate::{metric::TreeMetric, oracle::OracleOutcome, stats::SolverStatistics};
use canopy_core::num::weight::TreeWeight;
use canopy_model::solution::CenterSolution;

/// Trait for observing the radius search of the solver.
pub trait SearchMonitor<W>
where
    W: TreeWeight,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts, once the metric is available.
    fn on_enter_search(&mut self, metric: &TreeMetric<W>, statistics: &SolverStatistics);
    /// Called after every oracle call.
    fn on_probe(&mut self, outcome: &OracleOutcome<W>, statistics: &SolverStatistics);
    /// Called when the search produced its final solution.
    fn on_solution_found(&mut self, solution: &CenterSolution<W>, statistics: &SolverStatistics);
    /// Called when the search ends, successfully or not.
    fn on_exit_search(&mut self, statistics: &SolverStatistics);
}

impl<W> std::fmt::Debug for dyn SearchMonitor<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<W> std::fmt::Display for dyn SearchMonitor<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<W, M> SearchMonitor<W> for &mut M
where
    W: TreeWeight,
    M: SearchMonitor<W> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_enter_search(&mut self, metric: &TreeMetric<W>, statistics: &SolverStatistics) {
        (**self).on_enter_search(metric, statistics);
    }

    #[inline]
    fn on_probe(&mut self, outcome: &OracleOutcome<W>, statistics: &SolverStatistics) {
        (**self).on_probe(outcome, statistics);
    }

    #[inline]
    fn on_solution_found(&mut self, solution: &CenterSolution<W>, statistics: &SolverStatistics) {
        (**self).on_solution_found(solution, statistics);
    }

    #[inline]
    fn on_exit_search(&mut self, statistics: &SolverStatistics) {
        (**self).on_exit_search(statistics);
    }
}
