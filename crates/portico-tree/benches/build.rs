//! Tree building benchmarks.
//!
//! Run with: `cargo bench -p portico-tree`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use portico_tree::PathTree;

fn route_paths(num_routes: usize) -> Vec<String> {
    let mut paths = Vec::with_capacity(num_routes);

    // Static routes
    for i in 0..num_routes / 3 {
        paths.push(format!("/api/v1/resource{i}"));
    }

    // Param routes
    for i in 0..num_routes / 3 {
        paths.push(format!("/api/v1/resource{i}/{{id}}"));
    }

    // Nested routes
    for i in 0..num_routes / 3 {
        paths.push(format!("/api/v1/org/{{orgId}}/resource{i}/{{id}}"));
    }

    paths
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [10, 100, 1000] {
        let paths = route_paths(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &paths, |b, paths| {
            b.iter(|| {
                let tree: PathTree<()> = PathTree::build(black_box(paths));
                black_box(tree)
            });
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let paths = route_paths(100);
    let tree: PathTree<()> = PathTree::build(&paths);

    c.bench_function("resolve_nested", |b| {
        b.iter(|| black_box(tree.resolve(black_box("/api/v1/org/{orgId}/resource10/{id}"))));
    });

    c.bench_function("resolve_miss", |b| {
        b.iter(|| black_box(tree.resolve(black_box("/api/v1/nonexistent/path"))));
    });
}

criterion_group!(benches, bench_build, bench_resolve);
criterion_main!(benches);
