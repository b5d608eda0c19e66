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

use crate::{
    metric::TreeMetric, monitor::search_monitor::SearchMonitor, oracle::OracleOutcome,
    stats::SolverStatistics,
};
use canopy_core::num::weight::TreeWeight;
use canopy_model::solution::CenterSolution;

/// A no-operation monitor that implements the `SearchMonitor` trait
/// but does nothing on any of the events.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<W> {
    _phantom: std::marker::PhantomData<W>,
}

impl<W> NoOperationMonitor<W>
where
    W: TreeWeight,
{
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<W> SearchMonitor<W> for NoOperationMonitor<W>
where
    W: TreeWeight,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _metric: &TreeMetric<W>, _statistics: &SolverStatistics) {}

    #[inline(always)]
    fn on_probe(&mut self, _outcome: &OracleOutcome<W>, _statistics: &SolverStatistics) {}

    #[inline(always)]
    fn on_solution_found(
        &mut self,
        _solution: &CenterSolution<W>,
        _statistics: &SolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &SolverStatistics) {}
}
