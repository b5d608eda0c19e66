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

use std::time::Duration;

/// Statistics collected during a radius search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverStatistics {
    /// Number of vertices of the tree.
    pub num_vertices: usize,
    /// Number of radius candidates searched over.
    pub num_candidates: usize,
    /// Number of oracle calls, including the final one.
    pub probes: u64,
    /// Number of oracle calls that reported a feasible radius.
    pub feasible_probes: u64,
    /// Number of centers opened by the final solution.
    pub centers_opened: usize,
    /// Time spent computing distances and ancestor chains.
    pub precompute_duration: Duration,
    /// Total duration of the solving process.
    pub solve_duration: Duration,
}

impl SolverStatistics {
    /// Records one oracle call.
    #[inline]
    pub fn on_probe(&mut self, feasible: bool) {
        self.probes += 1;
        if feasible {
            self.feasible_probes += 1;
        }
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Vertices: {}", self.num_vertices)?;
        writeln!(f, "  Radius Candidates: {}", self.num_candidates)?;
        writeln!(
            f,
            "  Probes (feasible): {} ({})",
            self.probes, self.feasible_probes
        )?;
        writeln!(f, "  Centers Opened: {}", self.centers_opened)?;
        writeln!(
            f,
            "  Precompute Duration (secs): {:.3}",
            self.precompute_duration.as_secs_f64()
        )?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverStatisticsBuilder {
    statistics: SolverStatistics,
}

impl SolverStatisticsBuilder {
    /// Creates a new `SolverStatisticsBuilder` with all counters at zero.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of vertices.
    #[inline]
    pub fn num_vertices(mut self, num_vertices: usize) -> Self {
        self.statistics.num_vertices = num_vertices;
        self
    }

    /// Sets the number of radius candidates.
    #[inline]
    pub fn num_candidates(mut self, num_candidates: usize) -> Self {
        self.statistics.num_candidates = num_candidates;
        self
    }

    /// Sets the number of probes and how many of them were feasible.
    #[inline]
    pub fn probes(mut self, probes: u64, feasible_probes: u64) -> Self {
        self.statistics.probes = probes;
        self.statistics.feasible_probes = feasible_probes;
        self
    }

    /// Sets the number of opened centers.
    #[inline]
    pub fn centers_opened(mut self, centers_opened: usize) -> Self {
        self.statistics.centers_opened = centers_opened;
        self
    }

    /// Sets the precomputation duration.
    #[inline]
    pub fn precompute_duration(mut self, precompute_duration: Duration) -> Self {
        self.statistics.precompute_duration = precompute_duration;
        self
    }

    /// Sets the total solve duration.
    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.statistics.solve_duration = solve_duration;
        self
    }

    /// Builds the `SolverStatistics` instance.
    #[inline]
    pub fn build(self) -> SolverStatistics {
        self.statistics
    }
}
