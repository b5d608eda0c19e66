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

//! All-pairs tree distances and root ancestor chains.
//!
//! `TreeMetric` is computed once per tree and is read-only afterwards. It
//! holds three tables:
//!
//! - the full distance matrix, flattened row-major (`n * n` entries), filled
//!   by one depth-first walk per source vertex;
//! - for the fixed root (vertex 1), the root-first chain of ancestors of
//!   every vertex, built only during the walk that starts at the root;
//! - the ascending multiset of pairwise distances `d(u, v)` with `u < v`,
//!   which is the candidate domain of the radius search. Every walk visits
//!   every other vertex exactly once, so each unordered pair contributes
//!   exactly one entry.
//!
//! Walks run on an explicit stack by default. `Traversal::Recursive` is kept
//! for small, shallow trees; it recurses once per tree level and can exhaust
//! the native stack on long paths. Children are visited in adjacency order
//! by both strategies, and the resulting tables are identical.
//!
//! Time and memory are `O(n^2)`, dominated by the distance matrix.

use canopy_core::num::weight::{TreeWeight, sort_weights};
use canopy_model::{index::VertexIndex, solution::CenterSolution, tree::Tree};

/// The fixed root of the ancestor chains.
pub const ROOT: VertexIndex = VertexIndex::new(1);

#[inline(always)]
fn flatten_index(num_vertices: usize, from: VertexIndex, to: VertexIndex) -> usize {
    from.slot() * num_vertices + to.slot()
}

/// How the per-source depth-first walks are executed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Traversal {
    /// Explicit-stack walk; native stack usage is independent of tree depth.
    #[default]
    Iterative,
    /// Recursive walk; one native stack frame per tree level.
    Recursive,
}

impl std::fmt::Display for Traversal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Traversal::Iterative => write!(f, "Iterative"),
            Traversal::Recursive => write!(f, "Recursive"),
        }
    }
}

/// Precomputed distances, ancestor chains, and radius candidates of a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeMetric<W> {
    num_vertices: usize,
    distances: Vec<W>,                // len = num_vertices * num_vertices
    ancestors: Vec<Vec<VertexIndex>>, // len = num_vertices, root-first
    candidates: Vec<W>,               // len = num_vertices * (num_vertices - 1) / 2, ascending
}

impl<W> TreeMetric<W>
where
    W: TreeWeight,
{
    /// Computes the metric of `tree` with the default iterative traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use canopy_model::{index::VertexIndex, tree::TreeBuilder};
    /// # use canopy_solver::metric::TreeMetric;
    ///
    /// let mut builder = TreeBuilder::<i64>::new(3);
    /// builder
    ///     .add_edge(VertexIndex::new(1), VertexIndex::new(2), 2)
    ///     .add_edge(VertexIndex::new(2), VertexIndex::new(3), 5);
    /// let metric = TreeMetric::new(&builder.build().unwrap());
    ///
    /// assert_eq!(metric.distance(VertexIndex::new(1), VertexIndex::new(3)), 7);
    /// assert_eq!(metric.candidates(), &[2, 5, 7]);
    /// ```
    #[inline]
    pub fn new(tree: &Tree<W>) -> Self {
        Self::with_traversal(tree, Traversal::default())
    }

    /// Computes the metric of `tree` using the given traversal strategy.
    pub fn with_traversal(tree: &Tree<W>, traversal: Traversal) -> Self {
        let n = tree.num_vertices();
        let mut distances = vec![W::zero(); n * n];
        let mut ancestors = vec![Vec::new(); n];
        let mut candidates = Vec::with_capacity(n * n.saturating_sub(1) / 2);

        for (slot, row) in distances.chunks_exact_mut(n.max(1)).enumerate().take(n) {
            let source = VertexIndex::from_slot(slot);
            let mut recorder = SourceRecorder {
                source,
                row,
                ancestors: (source == ROOT).then_some(ancestors.as_mut_slice()),
                candidates: &mut candidates,
            };

            match traversal {
                Traversal::Iterative => walk_iterative(tree, source, &mut recorder),
                Traversal::Recursive => {
                    walk_recursive(tree, source, None, W::zero(), &mut recorder)
                }
            }
        }

        sort_weights(&mut candidates);

        Self {
            num_vertices: n,
            distances,
            ancestors,
            candidates,
        }
    }

    /// Returns the number of vertices of the underlying tree.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns the root the ancestor chains are relative to.
    #[inline]
    pub fn root(&self) -> VertexIndex {
        ROOT
    }

    /// Returns the tree distance between `u` and `v`.
    ///
    /// # Panics
    ///
    /// Panics if either vertex is out of range.
    #[inline]
    pub fn distance(&self, u: VertexIndex, v: VertexIndex) -> W {
        debug_assert!(
            u.is_within(self.num_vertices) && v.is_within(self.num_vertices),
            "called `TreeMetric::distance` with vertex out of bounds: the len is {} but the vertices are {} and {}",
            self.num_vertices,
            u.get(),
            v.get()
        );

        self.distances[flatten_index(self.num_vertices, u, v)]
    }

    /// Returns the distance from the root to `v`.
    #[inline]
    pub fn root_distance(&self, v: VertexIndex) -> W {
        self.distance(ROOT, v)
    }

    /// Returns all distances from `source`, indexed by slot.
    #[inline]
    pub fn distances_from(&self, source: VertexIndex) -> &[W] {
        let start = source.slot() * self.num_vertices;
        &self.distances[start..start + self.num_vertices]
    }

    /// Returns the vertices on the path from the root to `v`, root first and
    /// `v` last.
    #[inline]
    pub fn ancestors(&self, v: VertexIndex) -> &[VertexIndex] {
        &self.ancestors[v.slot()]
    }

    /// Returns the ascending multiset of pairwise distances `d(u, v)`, `u < v`.
    /// Empty for a single-vertex tree.
    #[inline]
    pub fn candidates(&self) -> &[W] {
        &self.candidates
    }

    /// Returns the largest distance between any vertex and the center it is
    /// assigned to in `solution`, or zero for an empty assignment.
    pub fn assignment_radius(&self, solution: &CenterSolution<W>) -> W {
        solution
            .assignment()
            .iter()
            .enumerate()
            .map(|(slot, &center)| self.distance(VertexIndex::from_slot(slot), center))
            .fold(W::zero(), |acc, d| if d > acc { d } else { acc })
    }
}

/// Collects the outcome of one source walk.
struct SourceRecorder<'a, W> {
    source: VertexIndex,
    row: &'a mut [W],
    /// Only present for the walk from `ROOT`.
    ancestors: Option<&'a mut [Vec<VertexIndex>]>,
    candidates: &'a mut Vec<W>,
}

impl<W> SourceRecorder<'_, W>
where
    W: TreeWeight,
{
    /// Called once per vertex, after its parent.
    #[inline]
    fn record(&mut self, vertex: VertexIndex, parent: Option<VertexIndex>, distance: W) {
        self.row[vertex.slot()] = distance;

        if let Some(chains) = self.ancestors.as_deref_mut() {
            let mut chain = match parent {
                Some(p) => {
                    let mut chain = Vec::with_capacity(chains[p.slot()].len() + 1);
                    chain.extend_from_slice(&chains[p.slot()]);
                    chain
                }
                None => Vec::with_capacity(1),
            };
            chain.push(vertex);
            chains[vertex.slot()] = chain;
        }

        if self.source < vertex {
            self.candidates.push(distance);
        }
    }
}

fn walk_iterative<W>(tree: &Tree<W>, source: VertexIndex, recorder: &mut SourceRecorder<'_, W>)
where
    W: TreeWeight,
{
    let mut stack: Vec<(VertexIndex, Option<VertexIndex>, W)> = vec![(source, None, W::zero())];
    while let Some((vertex, parent, distance)) = stack.pop() {
        recorder.record(vertex, parent, distance);
        // Reversed so that children pop in adjacency order.
        for &(next, weight) in tree.neighbors(vertex).iter().rev() {
            if Some(next) != parent {
                stack.push((next, Some(vertex), distance + weight));
            }
        }
    }
}

fn walk_recursive<W>(
    tree: &Tree<W>,
    vertex: VertexIndex,
    parent: Option<VertexIndex>,
    distance: W,
    recorder: &mut SourceRecorder<'_, W>,
) where
    W: TreeWeight,
{
    recorder.record(vertex, parent, distance);
    for &(next, weight) in tree.neighbors(vertex) {
        if Some(next) != parent {
            walk_recursive(tree, next, Some(vertex), distance + weight, recorder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_model::tree::TreeBuilder;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn vi(i: usize) -> VertexIndex {
        VertexIndex::new(i)
    }

    fn star() -> Tree<i64> {
        let mut builder = TreeBuilder::new(4);
        builder
            .add_edge(vi(1), vi(2), 1)
            .add_edge(vi(1), vi(3), 3)
            .add_edge(vi(1), vi(4), 1);
        builder.build().unwrap()
    }

    /// Random tree where vertex `v > 1` hangs below a uniformly chosen
    /// earlier vertex.
    fn random_tree(rng: &mut ChaCha8Rng, n: usize) -> Tree<i64> {
        let mut builder = TreeBuilder::new(n);
        for v in 2..=n {
            let parent = rng.random_range(1..v);
            builder.add_edge(vi(parent), vi(v), rng.random_range(0..20));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_star_distances() {
        let metric = TreeMetric::new(&star());
        assert_eq!(metric.num_vertices(), 4);
        assert_eq!(metric.distance(vi(1), vi(1)), 0);
        assert_eq!(metric.distance(vi(2), vi(3)), 4);
        assert_eq!(metric.distance(vi(3), vi(2)), 4);
        assert_eq!(metric.distance(vi(2), vi(4)), 2);
        assert_eq!(metric.distances_from(vi(3)), &[3, 4, 0, 4]);
        assert_eq!(metric.root_distance(vi(3)), 3);
    }

    #[test]
    fn test_star_ancestors_and_candidates() {
        let metric = TreeMetric::new(&star());
        assert_eq!(metric.root(), vi(1));
        assert_eq!(metric.ancestors(vi(1)), &[vi(1)]);
        assert_eq!(metric.ancestors(vi(3)), &[vi(1), vi(3)]);
        assert_eq!(metric.candidates(), &[1, 1, 2, 3, 4, 4]);
    }

    #[test]
    fn test_path_ancestors_are_root_first() {
        let mut builder = TreeBuilder::<i64>::new(4);
        builder
            .add_edge(vi(3), vi(4), 1)
            .add_edge(vi(2), vi(3), 1)
            .add_edge(vi(1), vi(2), 1);
        let metric = TreeMetric::new(&builder.build().unwrap());
        assert_eq!(metric.ancestors(vi(4)), &[vi(1), vi(2), vi(3), vi(4)]);
        assert_eq!(metric.distance(vi(4), vi(1)), 3);
    }

    #[test]
    fn test_single_vertex_has_no_candidates() {
        let metric = TreeMetric::new(&TreeBuilder::<i64>::new(1).build().unwrap());
        assert!(metric.candidates().is_empty());
        assert_eq!(metric.distance(vi(1), vi(1)), 0);
        assert_eq!(metric.ancestors(vi(1)), &[vi(1)]);
    }

    #[test]
    fn test_float_weights() {
        let mut builder = TreeBuilder::<f64>::new(3);
        builder
            .add_edge(vi(1), vi(2), 0.5)
            .add_edge(vi(1), vi(3), 1.25);
        let metric = TreeMetric::new(&builder.build().unwrap());
        assert_eq!(metric.distance(vi(2), vi(3)), 1.75);
        assert_eq!(metric.candidates(), &[0.5, 1.25, 1.75]);
    }

    #[test]
    fn test_traversals_agree_on_random_trees() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in 1..30 {
            let tree = random_tree(&mut rng, n);
            let iterative = TreeMetric::with_traversal(&tree, Traversal::Iterative);
            let recursive = TreeMetric::with_traversal(&tree, Traversal::Recursive);
            assert_eq!(iterative, recursive, "traversals disagree for n = {}", n);
        }
    }

    #[test]
    fn test_metric_is_symmetric_with_exact_candidate_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = random_tree(&mut rng, 25);
        let metric = TreeMetric::new(&tree);

        assert_eq!(metric.candidates().len(), 25 * 24 / 2);
        assert!(metric.candidates().windows(2).all(|w| w[0] <= w[1]));

        for u in tree.vertices() {
            assert_eq!(metric.distance(u, u), 0);
            for v in tree.vertices() {
                assert_eq!(metric.distance(u, v), metric.distance(v, u));
            }
        }
    }

    #[test]
    fn test_ancestor_chains_follow_edges() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let tree = random_tree(&mut rng, 40);
        let metric = TreeMetric::new(&tree);

        for v in tree.vertices() {
            let chain = metric.ancestors(v);
            assert_eq!(chain.first(), Some(&ROOT));
            assert_eq!(chain.last(), Some(&v));
            // Root distances strictly follow the chain's edges.
            for pair in chain.windows(2) {
                let weight = tree
                    .neighbors(pair[0])
                    .iter()
                    .find(|(next, _)| *next == pair[1])
                    .map(|&(_, w)| w)
                    .expect("consecutive chain vertices are adjacent");
                assert_eq!(
                    metric.root_distance(pair[1]),
                    metric.root_distance(pair[0]) + weight
                );
            }
        }
    }

    #[test]
    fn test_deep_path_does_not_overflow_the_stack() {
        let n = 2_000;
        let mut builder = TreeBuilder::<i64>::new(n);
        for v in 2..=n {
            builder.add_edge(vi(v - 1), vi(v), 1);
        }
        let metric = TreeMetric::new(&builder.build().unwrap());
        assert_eq!(metric.distance(vi(1), vi(n)), (n - 1) as i64);
        assert_eq!(metric.ancestors(vi(n)).len(), n);
    }

    #[test]
    fn test_assignment_radius() {
        let metric = TreeMetric::new(&star());
        let solution =
            CenterSolution::new(1, vec![vi(3), vi(1)], vec![vi(1), vi(1), vi(3), vi(1)]);
        assert_eq!(metric.assignment_radius(&solution), 1);

        let solution = CenterSolution::new(4, vec![vi(2)], vec![vi(2); 4]);
        assert_eq!(metric.assignment_radius(&solution), 4);
    }

    #[test]
    fn test_traversal_display() {
        assert_eq!(Traversal::default(), Traversal::Iterative);
        assert_eq!(Traversal::Recursive.to_string(), "Recursive");
    }
}
