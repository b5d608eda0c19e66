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

//! # Capacitated Center Solver
//!
//! Entry point of the crate. `CenterSolver` computes the tree metric once,
//! then binary searches the sorted radius candidates with the feasibility
//! oracle and returns the first candidate the oracle accepts, together with
//! the center placement and assignment produced at that radius.
//!
//! ## Usage
//!
//! ```rust
//! use canopy_model::index::VertexIndex;
//! use canopy_model::tree::TreeBuilder;
//! use canopy_solver::solver::CenterSolverBuilder;
//!
//! let mut builder = TreeBuilder::<i64>::new(4);
//! builder
//!     .add_edge(VertexIndex::new(1), VertexIndex::new(2), 1)
//!     .add_edge(VertexIndex::new(1), VertexIndex::new(3), 3)
//!     .add_edge(VertexIndex::new(1), VertexIndex::new(4), 1);
//! let tree = builder.build().unwrap();
//!
//! let solver = CenterSolverBuilder::new().build();
//! let solution = solver.solve(&tree, 3, 2).unwrap();
//! assert_eq!(solution.radius(), 1);
//! assert_eq!(solution.num_centers(), 2);
//! ```

use crate::{
    metric::{Traversal, TreeMetric},
    monitor::{no_op::NoOperationMonitor, search_monitor::SearchMonitor},
    oracle::{FeasibilityOracle, StaleEntryPolicy},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use canopy_core::num::weight::TreeWeight;
use canopy_model::{solution::CenterSolution, tree::Tree};
use std::time::{Duration, Instant};

/// Errors returned by `CenterSolver`.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError<W> {
    /// `max_centers * capacity` cannot cover every vertex.
    InvalidCapacity {
        capacity: usize,
        max_centers: usize,
        num_vertices: usize,
    },
    /// The oracle rejected the radius the search converged on.
    Infeasible { radius: W },
}

impl<W> std::fmt::Display for SolveError<W>
where
    W: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::InvalidCapacity {
                capacity,
                max_centers,
                num_vertices,
            } => write!(
                f,
                "{} centers of capacity {} cannot serve {} vertices",
                max_centers, capacity, num_vertices
            ),
            SolveError::Infeasible { radius } => {
                write!(f, "no feasible assignment found at radius {}", radius)
            }
        }
    }
}

impl<W> std::error::Error for SolveError<W> where W: std::fmt::Debug + std::fmt::Display {}

/// A solution together with the statistics of the search that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome<W> {
    solution: CenterSolution<W>,
    statistics: SolverStatistics,
}

impl<W> SolverOutcome<W> {
    #[inline]
    pub fn new(solution: CenterSolution<W>, statistics: SolverStatistics) -> Self {
        Self {
            solution,
            statistics,
        }
    }

    #[inline]
    pub fn solution(&self) -> &CenterSolution<W> {
        &self.solution
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_solution(self) -> CenterSolution<W> {
        self.solution
    }
}

impl<W> std::fmt::Display for SolverOutcome<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.solution)?;
        write!(f, "{}", self.statistics)
    }
}

/// Configures a `CenterSolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CenterSolverBuilder {
    traversal: Traversal,
    stale_entry_policy: StaleEntryPolicy,
}

impl CenterSolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the traversal used for the metric precomputation.
    #[inline]
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Sets how the oracle treats queue entries of already assigned vertices.
    #[inline]
    pub fn with_stale_entry_policy(mut self, policy: StaleEntryPolicy) -> Self {
        self.stale_entry_policy = policy;
        self
    }

    #[inline]
    pub fn build(self) -> CenterSolver {
        CenterSolver {
            traversal: self.traversal,
            stale_entry_policy: self.stale_entry_policy,
        }
    }
}

/// Solves the capacitated vertex p-center problem on trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CenterSolver {
    traversal: Traversal,
    stale_entry_policy: StaleEntryPolicy,
}

impl CenterSolver {
    /// Creates a solver with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    #[inline]
    pub fn stale_entry_policy(&self) -> StaleEntryPolicy {
        self.stale_entry_policy
    }

    /// Finds the smallest candidate radius at which at most `max_centers`
    /// centers of capacity `capacity` can serve every vertex of `tree`.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::InvalidCapacity` if `max_centers * capacity` is
    /// smaller than the number of vertices, before any distance is computed.
    #[inline]
    pub fn solve<W>(
        &self,
        tree: &Tree<W>,
        capacity: usize,
        max_centers: usize,
    ) -> Result<CenterSolution<W>, SolveError<W>>
    where
        W: TreeWeight,
    {
        self.solve_with_monitor(tree, capacity, max_centers, NoOperationMonitor::new())
            .map(SolverOutcome::into_solution)
    }

    /// Like `solve`, reporting progress to `monitor` and returning statistics.
    pub fn solve_with_monitor<W, M>(
        &self,
        tree: &Tree<W>,
        capacity: usize,
        max_centers: usize,
        monitor: M,
    ) -> Result<SolverOutcome<W>, SolveError<W>>
    where
        W: TreeWeight,
        M: SearchMonitor<W>,
    {
        validate_capacity::<W>(tree.num_vertices(), capacity, max_centers)?;

        let start_time = Instant::now();
        let metric = TreeMetric::with_traversal(tree, self.traversal);
        let precompute_duration = start_time.elapsed();

        self.search(
            &metric,
            capacity,
            max_centers,
            monitor,
            start_time,
            precompute_duration,
        )
    }

    /// Runs the radius search on a metric computed beforehand, so that one
    /// metric can serve several capacity and budget combinations.
    pub fn solve_on_metric<W, M>(
        &self,
        metric: &TreeMetric<W>,
        capacity: usize,
        max_centers: usize,
        monitor: M,
    ) -> Result<SolverOutcome<W>, SolveError<W>>
    where
        W: TreeWeight,
        M: SearchMonitor<W>,
    {
        validate_capacity::<W>(metric.num_vertices(), capacity, max_centers)?;
        self.search(
            metric,
            capacity,
            max_centers,
            monitor,
            Instant::now(),
            Duration::ZERO,
        )
    }

    fn search<W, M>(
        &self,
        metric: &TreeMetric<W>,
        capacity: usize,
        max_centers: usize,
        mut monitor: M,
        start_time: Instant,
        precompute_duration: Duration,
    ) -> Result<SolverOutcome<W>, SolveError<W>>
    where
        W: TreeWeight,
        M: SearchMonitor<W>,
    {
        let oracle = FeasibilityOracle::new(metric, capacity, max_centers)
            .with_stale_entry_policy(self.stale_entry_policy);

        // A single vertex has no pairwise distance; radius zero serves it.
        let zero = [W::zero()];
        let candidates = match metric.candidates() {
            [] => &zero[..],
            candidates => candidates,
        };

        let mut statistics = SolverStatisticsBuilder::new()
            .num_vertices(metric.num_vertices())
            .num_candidates(metric.candidates().len())
            .precompute_duration(precompute_duration)
            .build();
        monitor.on_enter_search(metric, &statistics);

        // Invariant: `lo == 0` or `candidates[lo - 1]` was rejected, and
        // `candidates[hi]` was accepted or is the largest candidate.
        let mut lo = 0;
        let mut hi = candidates.len() - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let outcome = oracle.check(candidates[mid]);
            statistics.on_probe(outcome.is_feasible());
            monitor.on_probe(&outcome, &statistics);

            if outcome.is_feasible() {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        let radius = candidates[lo];
        let outcome = oracle.check(radius);
        statistics.on_probe(outcome.is_feasible());
        monitor.on_probe(&outcome, &statistics);

        let Some(solution) = outcome.into_solution() else {
            statistics.solve_duration = start_time.elapsed();
            monitor.on_exit_search(&statistics);
            return Err(SolveError::Infeasible { radius });
        };

        statistics.centers_opened = solution.num_centers();
        statistics.solve_duration = start_time.elapsed();
        monitor.on_solution_found(&solution, &statistics);
        monitor.on_exit_search(&statistics);

        Ok(SolverOutcome::new(solution, statistics))
    }
}

#[inline]
fn validate_capacity<W>(
    num_vertices: usize,
    capacity: usize,
    max_centers: usize,
) -> Result<(), SolveError<W>> {
    if max_centers.saturating_mul(capacity) < num_vertices {
        return Err(SolveError::InvalidCapacity {
            capacity,
            max_centers,
            num_vertices,
        });
    }
    Ok(())
}
