//! Criterion benchmarks for tableau construction and single-node LPs.
//! Random closed gluings of growing size; seeds are fixed.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use normsurf::api::{
    random_triangulation, BanNone, Coords, InitialTableau, NoConstraint, RandomGluingCfg,
    SlotPolicy,
};

fn bench_tableau(c: &mut Criterion) {
    let mut group = c.benchmark_group("tableau");
    for &size in &[1usize, 2, 4, 8] {
        let cfg = RandomGluingCfg {
            size,
            boundary_faces: 0,
            connected: true,
        };
        for coords in [Coords::Standard, Coords::Quad, Coords::AnQuadOct] {
            group.bench_with_input(BenchmarkId::new(coords.key(), size), &size, |b, _| {
                b.iter_batched(
                    || random_triangulation(cfg, 17 + size as u64),
                    |tri| {
                        let tab = InitialTableau::new(&tri, coords, &NoConstraint, &BanNone);
                        let slots = tab
                            .as_ref()
                            .map(|t| t.slots(SlotPolicy::Embedded).len())
                            .unwrap_or(0);
                        std::hint::black_box((tab.map(|t| t.rank()).unwrap_or(0), slots))
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_tableau);
criterion_main!(benches);
