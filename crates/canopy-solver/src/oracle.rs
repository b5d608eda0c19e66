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

//! Feasibility oracle for a fixed radius.
//!
//! Given a radius `r`, the oracle decides greedily whether every vertex can be
//! served by at most `k` centers of capacity `C` without any vertex being
//! farther than `r` from its center. It follows the equal-capacity p-center
//! procedure for trees of Jaeger and Goldberg:
//!
//! 1. Every vertex `i` gets an anchor `f(i)`: the first vertex on its root
//!    chain (root first) whose root distance is within `r` of `i`'s root
//!    distance. This is the highest point of the tree a center at `i`
//!    could still reach upward.
//! 2. Vertices are queued by the root distance of their anchor, deepest
//!    anchor first; ties go to the smaller vertex id.
//! 3. Up to `k` times, the next queued vertex is opened as a center at its
//!    own position. Of the still unassigned vertices within `r` of it, it
//!    claims up to `C`, preferring those farthest from the root (ties by
//!    smaller id).
//! 4. The radius is feasible iff no vertex is left unassigned.
//!
//! Queue entries of vertices that were claimed by an earlier center are not
//! purged by default (`StaleEntryPolicy::Reopen`): such a vertex is opened as
//! a further center when its turn comes and spends one unit of the center
//! budget, even if nothing within reach is left to claim. `StaleEntryPolicy::Skip`
//! drops those entries instead. The default reproduces the published greedy
//! step for step; `Skip` can only open centers at unassigned vertices.
//!
//! Every call to `FeasibilityOracle::check` builds its outcome from scratch,
//! so no state carries over between the probes of a radius search.

use canopy_core::num::weight::{TreeWeight, compare_weights};
use canopy_model::{index::VertexIndex, solution::CenterSolution};
use fixedbitset::FixedBitSet;

use crate::metric::TreeMetric;

/// What to do with a queue entry whose vertex is already assigned.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StaleEntryPolicy {
    /// Open the vertex as a center anyway, consuming budget.
    #[default]
    Reopen,
    /// Discard the entry and move on to the next one.
    Skip,
}

impl std::fmt::Display for StaleEntryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleEntryPolicy::Reopen => write!(f, "Reopen"),
            StaleEntryPolicy::Skip => write!(f, "Skip"),
        }
    }
}

/// The result of a single feasibility check.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleOutcome<W> {
    radius: W,
    centers: Vec<VertexIndex>,
    assignment: Vec<Option<VertexIndex>>, // len = num_vertices, indexed by slot
    num_unassigned: usize,
}

impl<W> OracleOutcome<W>
where
    W: TreeWeight,
{
    /// Returns the radius that was checked.
    #[inline]
    pub fn radius(&self) -> W {
        self.radius
    }

    /// Returns `true` if every vertex was assigned.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.num_unassigned == 0
    }

    /// Returns the centers in the order they were opened.
    #[inline]
    pub fn centers(&self) -> &[VertexIndex] {
        &self.centers
    }

    /// Returns the (possibly partial) assignment, indexed by slot.
    #[inline]
    pub fn assignment(&self) -> &[Option<VertexIndex>] {
        &self.assignment
    }

    /// Returns the number of vertices left without a center.
    #[inline]
    pub fn num_unassigned(&self) -> usize {
        self.num_unassigned
    }

    /// Converts a feasible outcome into a `CenterSolution`.
    /// Returns `None` if some vertex is unassigned.
    pub fn into_solution(self) -> Option<CenterSolution<W>> {
        let assignment = self.assignment.into_iter().collect::<Option<Vec<_>>>()?;
        Some(CenterSolution::new(self.radius, self.centers, assignment))
    }
}

impl<W> std::fmt::Display for OracleOutcome<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OracleOutcome(radius: {}, feasible: {}, centers: {}, unassigned: {})",
            self.radius,
            self.is_feasible(),
            self.centers.len(),
            self.num_unassigned
        )
    }
}

/// Decides feasibility of radii for a fixed capacity and center budget.
#[derive(Clone, Copy, Debug)]
pub struct FeasibilityOracle<'a, W> {
    metric: &'a TreeMetric<W>,
    capacity: usize,
    max_centers: usize,
    stale_entry_policy: StaleEntryPolicy,
}

impl<'a, W> FeasibilityOracle<'a, W>
where
    W: TreeWeight,
{
    /// Creates an oracle over `metric` with centers of capacity `capacity`
    /// and at most `max_centers` centers.
    #[inline]
    pub fn new(metric: &'a TreeMetric<W>, capacity: usize, max_centers: usize) -> Self {
        Self {
            metric,
            capacity,
            max_centers,
            stale_entry_policy: StaleEntryPolicy::default(),
        }
    }

    /// Sets how queue entries of already assigned vertices are handled.
    #[inline]
    pub fn with_stale_entry_policy(mut self, policy: StaleEntryPolicy) -> Self {
        self.stale_entry_policy = policy;
        self
    }

    /// Returns the capacity of every center.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the center budget.
    #[inline]
    pub fn max_centers(&self) -> usize {
        self.max_centers
    }

    /// Returns the configured stale entry policy.
    #[inline]
    pub fn stale_entry_policy(&self) -> StaleEntryPolicy {
        self.stale_entry_policy
    }

    /// Returns the anchor `f(vertex)` for `radius`: the first vertex on the
    /// root chain of `vertex` whose root distance is within `radius` of the
    /// root distance of `vertex`. `None` only for negative radii.
    pub fn anchor(&self, vertex: VertexIndex, radius: W) -> Option<VertexIndex> {
        let depth = self.metric.root_distance(vertex);
        self.metric
            .ancestors(vertex)
            .iter()
            .copied()
            .find(|&a| depth - self.metric.root_distance(a) <= radius)
    }

    /// Checks whether `radius` admits a full capacitated assignment.
    pub fn check(&self, radius: W) -> OracleOutcome<W> {
        let metric = self.metric;
        let n = metric.num_vertices();

        let mut queue: Vec<(W, VertexIndex)> = (0..n)
            .map(VertexIndex::from_slot)
            .filter_map(|v| {
                self.anchor(v, radius)
                    .map(|anchor| (metric.root_distance(anchor), v))
            })
            .collect();
        queue.sort_by(|(ka, va), (kb, vb)| compare_weights(kb, ka).then(va.cmp(vb)));

        let mut unassigned = FixedBitSet::with_capacity(n);
        unassigned.insert_range(..);
        let mut num_unassigned = n;
        let mut assignment = vec![None; n];
        let mut centers = Vec::with_capacity(self.max_centers.min(n));
        let mut reachable: Vec<VertexIndex> = Vec::with_capacity(n);
        let mut entries = queue.into_iter().map(|(_, v)| v);

        while num_unassigned > 0 && centers.len() < self.max_centers {
            let next = match self.stale_entry_policy {
                StaleEntryPolicy::Reopen => entries.next(),
                StaleEntryPolicy::Skip => entries.find(|v| unassigned.contains(v.slot())),
            };
            let Some(center) = next else {
                break;
            };
            centers.push(center);

            reachable.clear();
            reachable.extend(
                unassigned
                    .ones()
                    .map(VertexIndex::from_slot)
                    .filter(|&v| metric.distance(center, v) <= radius),
            );
            // Stable, so equally deep vertices keep ascending id order.
            reachable.sort_by(|&a, &b| {
                compare_weights(&metric.root_distance(b), &metric.root_distance(a))
            });
            reachable.truncate(self.capacity);

            for &v in &reachable {
                assignment[v.slot()] = Some(center);
                unassigned.set(v.slot(), false);
            }
            num_unassigned -= reachable.len();
        }

        OracleOutcome {
            radius,
            centers,
            assignment,
            num_unassigned,
        }
    }
}
