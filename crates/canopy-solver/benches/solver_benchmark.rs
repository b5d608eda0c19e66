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

use canopy_model::index::VertexIndex;
use canopy_model::tree::{Tree, TreeBuilder};
use canopy_solver::metric::{Traversal, TreeMetric};
use canopy_solver::oracle::FeasibilityOracle;
use canopy_solver::solver::CenterSolver;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const SIZES: [usize; 3] = [100, 400, 1000];

fn vi(i: usize) -> VertexIndex {
    VertexIndex::new(i)
}

/// Random recursive tree with integer weights, seeded per size.
fn random_tree(n: usize) -> Tree<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
    let mut builder = TreeBuilder::new(n);
    for v in 2..=n {
        let parent = rng.random_range(1..v);
        builder.add_edge(vi(parent), vi(v), rng.random_range(1..100));
    }
    builder
        .build()
        .unwrap_or_else(|e| panic!("Failed to build tree with {} vertices: {}", n, e))
}

fn bench_metric(c: &mut Criterion) {
    let mut group = c.benchmark_group("metric_benchmark");

    for n in SIZES {
        let tree = random_tree(n);
        group.throughput(Throughput::Elements((n * n) as u64));

        for traversal in [Traversal::Iterative, Traversal::Recursive] {
            group.bench_with_input(
                BenchmarkId::new(traversal.to_string(), n),
                &tree,
                |b, tree| b.iter(|| TreeMetric::with_traversal(black_box(tree), traversal)),
            );
        }
    }
    group.finish();
}

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle_benchmark");

    for n in SIZES {
        let metric = TreeMetric::new(&random_tree(n));
        let capacity = 10;
        let oracle = FeasibilityOracle::new(&metric, capacity, n.div_ceil(capacity));
        let radius = metric.candidates()[metric.candidates().len() / 2];

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("check", n), &radius, |b, &radius| {
            b.iter(|| oracle.check(black_box(radius)))
        });
    }
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_benchmark");
    let solver = CenterSolver::new();

    for n in SIZES {
        let tree = random_tree(n);
        let capacity = 10;
        let max_centers = n.div_ceil(capacity);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("solve", n), &tree, |b, tree| {
            b.iter(|| {
                let result = solver.solve(black_box(tree), capacity, max_centers);
                if let Err(e) = result {
                    panic!("Benchmark configuration error: {}", e);
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_metric, bench_oracle, bench_solver);
criterion_main!(benches);
