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

//! Weighted trees.
//!
//! A `Tree` is the immutable input of every location query: `n` vertices
//! numbered `1..=n` and `n - 1` undirected, non-negatively weighted edges that
//! connect them without cycles. Adjacency is stored per vertex and every
//! edge appears in the rows of both endpoints.
//!
//! Trees are assembled with a `TreeBuilder`, which records edges without
//! checking them and performs the full structural validation once in
//! `TreeBuilder::build`. A tree that made it through `build` is guaranteed to
//! be connected and acyclic, so the distance precomputation never has to
//! guard against malformed input.

use crate::index::VertexIndex;
use canopy_core::num::weight::{TreeWeight, accumulate_weight, is_admissible_weight};
use smallvec::SmallVec;

/// Inline capacity of an adjacency row. Most vertices of location trees have
/// a handful of neighbors, so rows rarely spill to the heap.
const INLINE_NEIGHBORS: usize = 4;

/// Upper bound on the edges `TreeBuilder::new` reserves up front. The vertex
/// count may come from untrusted input, so larger edge lists grow on demand.
const MAX_PREALLOCATED_EDGES: usize = 1 << 16;

type AdjacencyRow<W> = SmallVec<[(VertexIndex, W); INLINE_NEIGHBORS]>;

/// An undirected weighted edge as it was added to the builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<W> {
    source: VertexIndex,
    target: VertexIndex,
    weight: W,
}

impl<W> Edge<W>
where
    W: TreeWeight,
{
    /// Creates a new edge.
    #[inline]
    pub fn new(source: VertexIndex, target: VertexIndex, weight: W) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the first endpoint.
    #[inline]
    pub fn source(&self) -> VertexIndex {
        self.source
    }

    /// Returns the second endpoint.
    #[inline]
    pub fn target(&self) -> VertexIndex {
        self.target
    }

    /// Returns the edge length.
    #[inline]
    pub fn weight(&self) -> W {
        self.weight
    }
}

impl<W> std::fmt::Display for Edge<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -- {} (weight {})",
            self.source.get(),
            self.target.get(),
            self.weight
        )
    }
}

/// The reasons a set of edges does not describe a valid tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// The tree has no vertices.
    Empty,
    /// A tree on `num_vertices` vertices needs exactly `num_vertices - 1` edges.
    EdgeCount { expected: usize, found: usize },
    /// An edge references a vertex id outside `1..=num_vertices`.
    VertexOutOfRange {
        edge_index: usize,
        vertex: VertexIndex,
        num_vertices: usize,
    },
    /// An edge connects a vertex to itself.
    SelfLoop {
        edge_index: usize,
        vertex: VertexIndex,
    },
    /// An edge weight is negative or not a number.
    InvalidWeight { edge_index: usize },
    /// The total edge weight up to and including this edge exceeds the
    /// largest value of the weight type, so path lengths could overflow.
    WeightOverflow { edge_index: usize },
    /// An edge closes a cycle, i.e. its endpoints were already connected.
    /// Duplicate edges are reported this way as well.
    Cycle {
        edge_index: usize,
        source: VertexIndex,
        target: VertexIndex,
    },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "A tree must contain at least one vertex"),
            Self::EdgeCount { expected, found } => write!(
                f,
                "A tree on {} vertices has {} edges, but {} were given",
                expected + 1,
                expected,
                found
            ),
            Self::VertexOutOfRange {
                edge_index,
                vertex,
                num_vertices,
            } => write!(
                f,
                "Edge {} references vertex {}, but vertex ids range over 1..={}",
                edge_index,
                vertex.get(),
                num_vertices
            ),
            Self::SelfLoop { edge_index, vertex } => write!(
                f,
                "Edge {} is a self loop on vertex {}",
                edge_index,
                vertex.get()
            ),
            Self::InvalidWeight { edge_index } => {
                write!(f, "Edge {} has a negative or undefined weight", edge_index)
            }
            Self::WeightOverflow { edge_index } => write!(
                f,
                "Edge {} pushes the total tree weight beyond the range of the weight type",
                edge_index
            ),
            Self::Cycle {
                edge_index,
                source,
                target,
            } => write!(
                f,
                "Edge {} between {} and {} closes a cycle",
                edge_index,
                source.get(),
                target.get()
            ),
        }
    }
}

impl std::error::Error for TopologyError {}

/// An immutable, validated, edge-weighted tree.
#[derive(Clone, Debug)]
pub struct Tree<W> {
    adjacency: Vec<AdjacencyRow<W>>, // len = num_vertices, indexed by slot
    edges: Vec<Edge<W>>,             // len = num_vertices - 1
}

impl<W> Tree<W>
where
    W: TreeWeight,
{
    /// Returns the number of vertices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use canopy_model::{index::VertexIndex, tree::TreeBuilder};
    ///
    /// let mut builder = TreeBuilder::<i64>::new(2);
    /// builder.add_edge(VertexIndex::new(1), VertexIndex::new(2), 4);
    /// let tree = builder.build().unwrap();
    /// assert_eq!(tree.num_vertices(), 2);
    /// assert_eq!(tree.num_edges(), 1);
    /// ```
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of edges, which is always `num_vertices() - 1`.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns all edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    /// Returns an iterator over all vertex ids in ascending order.
    #[inline]
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexIndex> + use<W> {
        (0..self.num_vertices()).map(VertexIndex::from_slot)
    }

    /// Returns the neighbors of `vertex` together with the connecting edge
    /// weights, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not a vertex of this tree.
    #[inline]
    pub fn neighbors(&self, vertex: VertexIndex) -> &[(VertexIndex, W)] {
        assert!(
            vertex.is_within(self.num_vertices()),
            "called `Tree::neighbors` with vertex out of range: the tree has {} vertices but the vertex is {}",
            self.num_vertices(),
            vertex.get()
        );

        &self.adjacency[vertex.slot()]
    }

    /// Returns the number of edges incident to `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not a vertex of this tree.
    #[inline]
    pub fn degree(&self, vertex: VertexIndex) -> usize {
        self.neighbors(vertex).len()
    }

    /// Returns the sum of all edge weights.
    pub fn total_weight(&self) -> W {
        self.edges
            .iter()
            .fold(W::zero(), |acc, edge| acc + edge.weight())
    }
}

impl<W> std::fmt::Display for Tree<W>
where
    W: TreeWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Tree(vertices: {}, edges: {})",
            self.num_vertices(),
            self.num_edges()
        )?;
        for edge in &self.edges {
            writeln!(f, "   {}", edge)?;
        }
        Ok(())
    }
}

/// Mutable construction front-end for `Tree`.
///
/// Edges are recorded verbatim; `build` validates the whole edge list at once
/// and reports the first violation it finds.
#[derive(Clone, Debug)]
pub struct TreeBuilder<W> {
    num_vertices: usize,
    edges: Vec<Edge<W>>,
}

impl<W> TreeBuilder<W>
where
    W: TreeWeight,
{
    /// Creates a builder for a tree on the vertices `1..=num_vertices`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use canopy_model::tree::TreeBuilder;
    ///
    /// let tree = TreeBuilder::<i64>::new(1).build().unwrap();
    /// assert_eq!(tree.num_vertices(), 1);
    /// assert_eq!(tree.num_edges(), 0);
    /// ```
    #[inline]
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            edges: Vec::with_capacity(
                num_vertices
                    .saturating_sub(1)
                    .min(MAX_PREALLOCATED_EDGES),
            ),
        }
    }

    /// Returns the number of vertices the tree will have.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns the number of edges added so far.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Adds an undirected edge of length `weight` between `source` and `target`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use canopy_model::{index::VertexIndex, tree::TreeBuilder};
    ///
    /// let mut builder = TreeBuilder::<i64>::new(3);
    /// builder
    ///     .add_edge(VertexIndex::new(1), VertexIndex::new(2), 1)
    ///     .add_edge(VertexIndex::new(2), VertexIndex::new(3), 1);
    /// let tree = builder.build().unwrap();
    /// assert_eq!(tree.degree(VertexIndex::new(2)), 2);
    /// ```
    #[inline]
    pub fn add_edge(&mut self, source: VertexIndex, target: VertexIndex, weight: W) -> &mut Self {
        self.edges.push(Edge::new(source, target, weight));
        self
    }

    /// Validates the recorded edges and freezes them into a `Tree`.
    ///
    /// The checks run in this order: the vertex set is non-empty, the edge
    /// count is `num_vertices - 1`, and then, edge by edge, endpoints are in
    /// range, endpoints differ, the weight is admissible, the running total
    /// weight stays within `W::max_value()`, and the edge does not join two
    /// already connected vertices. Every path length is bounded by the total
    /// weight, so distances computed on the tree cannot overflow. An acyclic graph with
    /// `n - 1` edges on `n` vertices is connected, so passing every check
    /// implies a spanning tree.
    ///
    /// # Errors
    ///
    /// Returns the first `TopologyError` encountered.
    pub fn build(&self) -> Result<Tree<W>, TopologyError> {
        let n = self.num_vertices;
        if n == 0 {
            return Err(TopologyError::Empty);
        }
        if self.edges.len() != n - 1 {
            return Err(TopologyError::EdgeCount {
                expected: n - 1,
                found: self.edges.len(),
            });
        }

        let mut components = DisjointSets::new(n);
        let mut total_weight = W::zero();
        let mut adjacency: Vec<AdjacencyRow<W>> = vec![SmallVec::new(); n];

        for (edge_index, edge) in self.edges.iter().enumerate() {
            for vertex in [edge.source, edge.target] {
                if !vertex.is_within(n) {
                    return Err(TopologyError::VertexOutOfRange {
                        edge_index,
                        vertex,
                        num_vertices: n,
                    });
                }
            }
            if edge.source == edge.target {
                return Err(TopologyError::SelfLoop {
                    edge_index,
                    vertex: edge.source,
                });
            }
            if !is_admissible_weight(edge.weight) {
                return Err(TopologyError::InvalidWeight { edge_index });
            }
            total_weight = accumulate_weight(total_weight, edge.weight)
                .ok_or(TopologyError::WeightOverflow { edge_index })?;
            if !components.union(edge.source.slot(), edge.target.slot()) {
                return Err(TopologyError::Cycle {
                    edge_index,
                    source: edge.source,
                    target: edge.target,
                });
            }

            adjacency[edge.source.slot()].push((edge.target, edge.weight));
            adjacency[edge.target.slot()].push((edge.source, edge.weight));
        }

        Ok(Tree {
            adjacency,
            edges: self.edges.clone(),
        })
    }
}

/// Union-find over vertex slots with path halving and union by size.
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. Returns `false` if they were already
    /// the same set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
        builder.build().expect("star is a valid tree")
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let tree = star();
        assert_eq!(tree.num_vertices(), 4);
        assert_eq!(tree.num_edges(), 3);
        assert_eq!(tree.neighbors(vi(1)), &[(vi(2), 1), (vi(3), 3), (vi(4), 1)]);
        assert_eq!(tree.neighbors(vi(3)), &[(vi(1), 3)]);
        assert_eq!(tree.degree(vi(1)), 3);
        assert_eq!(tree.degree(vi(4)), 1);
        assert_eq!(tree.total_weight(), 5);
    }

    #[test]
    fn test_vertices_iterates_ids() {
        let tree = star();
        let ids: Vec<usize> = tree.vertices().map(|v| v.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_vertex_tree() {
        let tree = TreeBuilder::<f64>::new(1).build().unwrap();
        assert_eq!(tree.num_vertices(), 1);
        assert!(tree.neighbors(vi(1)).is_empty());
        assert_eq!(tree.total_weight(), 0.0);
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        let err = TreeBuilder::<i64>::new(0).build().unwrap_err();
        assert_eq!(err, TopologyError::Empty);
    }

    #[test]
    fn test_wrong_edge_count_is_rejected() {
        let mut builder = TreeBuilder::<i64>::new(4);
        builder.add_edge(vi(1), vi(2), 1).add_edge(vi(2), vi(3), 1);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::EdgeCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_vertex_out_of_range_is_rejected() {
        let mut builder = TreeBuilder::<i64>::new(2);
        builder.add_edge(vi(1), vi(3), 1);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::VertexOutOfRange {
                edge_index: 0,
                vertex: vi(3),
                num_vertices: 2
            }
        );

        let mut builder = TreeBuilder::<i64>::new(2);
        builder.add_edge(vi(0), vi(1), 1);
        assert!(matches!(
            builder.build(),
            Err(TopologyError::VertexOutOfRange { vertex, .. }) if vertex == vi(0)
        ));
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let mut builder = TreeBuilder::<i64>::new(2);
        builder.add_edge(vi(2), vi(2), 1);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::SelfLoop {
                edge_index: 0,
                vertex: vi(2)
            }
        );
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let mut builder = TreeBuilder::<i64>::new(2);
        builder.add_edge(vi(1), vi(2), -1);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::InvalidWeight { edge_index: 0 }
        );

        let mut builder = TreeBuilder::<f64>::new(3);
        builder
            .add_edge(vi(1), vi(2), 0.5)
            .add_edge(vi(2), vi(3), f64::NAN);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::InvalidWeight { edge_index: 1 }
        );
    }

    #[test]
    fn test_total_weight_beyond_type_range_is_rejected() {
        let mut builder = TreeBuilder::<i32>::new(3);
        builder
            .add_edge(vi(1), vi(2), 1_500_000_000)
            .add_edge(vi(2), vi(3), 1_500_000_000);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::WeightOverflow { edge_index: 1 }
        );

        let mut builder = TreeBuilder::<i32>::new(3);
        builder
            .add_edge(vi(1), vi(2), i32::MAX - 1)
            .add_edge(vi(2), vi(3), 1);
        let tree = builder.build().unwrap();
        assert_eq!(tree.total_weight(), i32::MAX);
    }

    #[test]
    fn test_infinite_weight_is_rejected() {
        let mut builder = TreeBuilder::<f64>::new(2);
        builder.add_edge(vi(1), vi(2), f64::INFINITY);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::WeightOverflow { edge_index: 0 }
        );
    }

    #[test]
    fn test_huge_vertex_count_does_not_preallocate() {
        let mut builder = TreeBuilder::<i64>::new(usize::MAX);
        builder.add_edge(vi(1), vi(2), 1);
        assert_eq!(builder.num_vertices(), usize::MAX);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::EdgeCount {
                expected: usize::MAX - 1,
                found: 1
            }
        );
    }

    #[test]
    fn test_zero_weight_edges_are_allowed() {
        let mut builder = TreeBuilder::<i64>::new(2);
        builder.add_edge(vi(1), vi(2), 0);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_cycle_and_disconnection_are_rejected() {
        // 1-2-3 cycle leaves vertex 4 unreachable.
        let mut builder = TreeBuilder::<i64>::new(4);
        builder
            .add_edge(vi(1), vi(2), 1)
            .add_edge(vi(2), vi(3), 1)
            .add_edge(vi(3), vi(1), 1);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::Cycle {
                edge_index: 2,
                source: vi(3),
                target: vi(1)
            }
        );
    }

    #[test]
    fn test_duplicate_edge_is_rejected() {
        let mut builder = TreeBuilder::<i64>::new(3);
        builder.add_edge(vi(1), vi(2), 1).add_edge(vi(2), vi(1), 4);
        assert!(matches!(
            builder.build(),
            Err(TopologyError::Cycle { edge_index: 1, .. })
        ));
    }

    #[test]
    fn test_random_trees_are_accepted() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
        for n in 1..40 {
            let mut builder = TreeBuilder::<i64>::new(n);
            for v in 2..=n {
                let parent = rng.random_range(1..v);
                builder.add_edge(vi(parent), vi(v), rng.random_range(0..50));
            }
            let tree = builder.build().expect("random parent trees are valid");
            let degree_sum: usize = tree.vertices().map(|v| tree.degree(v)).sum();
            assert_eq!(degree_sum, 2 * (n - 1));
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TopologyError::EdgeCount {
                expected: 3,
                found: 5
            }
            .to_string(),
            "A tree on 4 vertices has 3 edges, but 5 were given"
        );
        assert_eq!(
            TopologyError::Cycle {
                edge_index: 2,
                source: vi(3),
                target: vi(1)
            }
            .to_string(),
            "Edge 2 between 3 and 1 closes a cycle"
        );
        assert_eq!(
            TopologyError::WeightOverflow { edge_index: 1 }.to_string(),
            "Edge 1 pushes the total tree weight beyond the range of the weight type"
        );
    }

    #[test]
    fn test_display_lists_edges() {
        let rendered = format!("{}", star());
        assert!(rendered.starts_with("Tree(vertices: 4, edges: 3)\n"));
        assert!(rendered.contains("1 -- 3 (weight 3)"));
    }

    #[test]
    #[should_panic(expected = "called `Tree::neighbors` with vertex out of range")]
    fn test_neighbors_panics_out_of_range() {
        let tree = star();
        let _ = tree.neighbors(vi(5));
    }
}
