//! Routing benchmarks.
//!
//! Run with: `cargo bench -p arsa-router`

use arsa_router::{MethodSet, Router};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;

fn build_router(num_routes: usize) -> Router {
    let mut router = Router::new();

    for i in 0..num_routes / 3 {
        router
            .insert(&format!("/api/v1/resource{i}"), MethodSet::default(), format!("list{i}"))
            .unwrap();
    }

    for i in 0..num_routes / 3 {
        router
            .insert(
                &format!("/api/v1/resource{i}/<int:id>"),
                MethodSet::default(),
                format!("get{i}"),
            )
            .unwrap();
    }

    for i in 0..num_routes / 3 {
        router
            .insert(
                &format!("/api/v1/org/<org>/resource{i}/<id>"),
                MethodSet::default(),
                format!("org{i}"),
            )
            .unwrap();
    }

    router
}

fn bench_static_match(c: &mut Criterion) {
    let router = build_router(99);
    c.bench_function("static_match", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/resource20")));
    });
}

fn bench_typed_match(c: &mut Criterion) {
    let router = build_router(99);
    c.bench_function("typed_match", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/resource20/12345")));
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(99);
    c.bench_function("miss", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/nonexistent/path")));
    });
}

fn bench_table_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_size");
    for size in [12, 48, 192] {
        let router = build_router(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &router, |b, router| {
            b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/org/acme/resource3/9")));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_static_match,
    bench_typed_match,
    bench_miss,
    bench_table_size
);
criterion_main!(benches);
