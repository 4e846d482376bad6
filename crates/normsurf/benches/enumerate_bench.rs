//! Criterion benchmarks for the tree-traversal engines.
//! Focus: named triangulations in each normal coordinate system, plus the
//! fundamental and taut searches on the small cusped examples.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p normsurf

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use normsurf::api::{
    named_triangulation, AngleStructureList, Coords, EnumMode, NormalSurfaceList, Which,
};

const NAMES: [&str; 4] = ["lone-tet", "figure-eight", "lst-123", "twisted-kxi"];

fn bench_vertex(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertex");
    for name in NAMES {
        let Some(tri) = named_triangulation(name) else { continue };
        for coords in [Coords::Standard, Coords::Quad, Coords::AnStandard] {
            group.bench_with_input(BenchmarkId::new(coords.key(), name), &tri, |b, tri| {
                b.iter(|| {
                    let list = NormalSurfaceList::enumerate(tri, coords, Which::default(), None);
                    std::hint::black_box(list.map(|l| l.len()).unwrap_or(0))
                })
            });
        }
    }
    group.finish();
}

fn bench_fundamental(c: &mut Criterion) {
    let mut group = c.benchmark_group("fundamental");
    group.sample_size(10);
    let which = Which {
        mode: EnumMode::Fundamental,
        embedded: true,
    };
    for name in ["s3", "lst-123", "figure-eight"] {
        let Some(tri) = named_triangulation(name) else { continue };
        group.bench_with_input(BenchmarkId::new("quad", name), &tri, |b, tri| {
            b.iter(|| {
                let list = NormalSurfaceList::enumerate(tri, Coords::Quad, which, None);
                std::hint::black_box(list.map(|l| l.len()).unwrap_or(0))
            })
        });
    }
    group.finish();
}

fn bench_angles(c: &mut Criterion) {
    let mut group = c.benchmark_group("angles");
    for name in ["gieseking", "figure-eight", "twisted-kxi"] {
        let Some(tri) = named_triangulation(name) else { continue };
        for taut in [false, true] {
            let id = if taut { "taut" } else { "vertex" };
            group.bench_with_input(BenchmarkId::new(id, name), &tri, |b, tri| {
                b.iter(|| {
                    let list = AngleStructureList::enumerate(tri, taut, None);
                    std::hint::black_box(list.map(|l| l.len()).unwrap_or(0))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_vertex, bench_fundamental, bench_angles);
criterion_main!(benches);
