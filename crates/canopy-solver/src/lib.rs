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

//! Canopy solver: capacitated vertex p-center on trees
//!
//! Given a weighted tree, a uniform center capacity `C`, and a center budget
//! `k`, finds the smallest pairwise tree distance `r` such that at most `k`
//! centers, each serving at most `C` vertices, can serve every vertex within
//! distance `r`.
//!
//! Core flow
//! - Build a `canopy_model::tree::Tree<W>` with `TreeBuilder` or `TreeLoader`.
//! - `metric::TreeMetric` computes all-pairs distances, root ancestor chains,
//!   and the sorted radius candidates once per tree.
//! - `oracle::FeasibilityOracle` decides a single radius greedily, opening
//!   centers at the deepest anchors first.
//! - `solver::CenterSolver` binary searches the candidates with the oracle.
//!
//! Assumptions
//! - The oracle is treated as monotone in the radius; the search relies on
//!   it but validates the final radius.
//! - Memory is quadratic in the number of vertices.
//!
//! Module map
//! - `metric`: distance table, ancestor chains, candidates.
//! - `oracle`: feasibility check and stale queue entry handling.
//! - `solver`: radius search, configuration, errors, outcomes.
//! - `monitor`: search monitors (log, composite, no-op).
//! - `stats`: lightweight counters and timing.

pub mod metric;
pub mod monitor;
pub mod oracle;
pub mod solver;
pub mod stats;
