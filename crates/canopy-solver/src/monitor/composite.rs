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

//! Monitoring combinators for the radius search
//!
//! Provides `CompositeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children in insertion order. This lets you mix logging and
//! custom bookkeeping without coupling them to the solver.

use crate::{
    metric::TreeMetric, monitor::search_monitor::SearchMonitor, oracle::OracleOutcome,
    stats::SolverStatistics,
};
use canopy_core::num::weight::TreeWeight;
use canopy_model::solution::CenterSolution;

/// A search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeSearchMonitor<'a, W>
where
    W: TreeWeight,
{
    monitors: Vec<Box<dyn SearchMonitor<W> + 'a>>,
}

impl<'a, W> Default for CompositeSearchMonitor<'a, W>
where
    W: TreeWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, W> CompositeSearchMonitor<'a, W>
where
    W: TreeWeight,
{
    /// Creates a new empty `CompositeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor<W> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor<W> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the number of monitors contained in the composite monitor.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, W> FromIterator<Box<dyn SearchMonitor<W> + 'a>> for CompositeSearchMonitor<'a, W>
where
    W: TreeWeight,
{
    fn from_iter<I: IntoIterator<Item = Box<dyn SearchMonitor<W> + 'a>>>(iter: I) -> Self {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, W> SearchMonitor<W> for CompositeSearchMonitor<'a, W>
where
    W: TreeWeight,
{
    fn name(&self) -> &str {
        "CompositeSearchMonitor"
    }

    fn on_enter_search(&mut self, metric: &TreeMetric<W>, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(metric, statistics);
        }
    }

    fn on_probe(&mut self, outcome: &OracleOutcome<W>, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_probe(outcome, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &CenterSolution<W>, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;

    #[test]
    fn test_add_and_len() {
        let mut composite = CompositeSearchMonitor::<i64>::new();
        assert!(composite.is_empty());

        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor_boxed(Box::new(NoOperationMonitor::new()));
        assert_eq!(composite.len(), 2);
        assert_eq!(composite.name(), "CompositeSearchMonitor");
    }

    #[test]
    fn test_from_iterator() {
        let monitors: Vec<Box<dyn SearchMonitor<i64>>> = vec![
            Box::new(NoOperationMonitor::new()),
            Box::new(NoOperationMonitor::new()),
            Box::new(NoOperationMonitor::new()),
        ];
        let composite: CompositeSearchMonitor<'_, i64> = monitors.into_iter().collect();
        assert_eq!(composite.len(), 3);
    }
}
