//! Performance benchmarks for the layout pipeline.
//!
//! Run with: `cargo bench --bench pipeline`
//!
//! ## Workloads
//!
//! | Workload | Shape | Notes |
//! |----------|-------|-------|
//! | Fan | wide ranks, many comrades | Stresses clustering and slots |
//! | Lattice | diamonds everywhere | Stresses hierarchy merging |
//! | Export | fingerprint only | Canonical serialization + xxh64 |

use criterion::{
    black_box, criterion_group, criterion_main,
    BenchmarkId, Criterion, Throughput,
};

use lts_layout::{LayoutConfig, LayoutEngine, Lts, RankStyle};

/// Layered graph: each of `depth` layers has `width` states, every state
/// links to two states of the next layer and to its right-hand neighbour.
fn make_fan(width: u32, depth: u32) -> Lts {
    let n = 1 + width * depth;
    let mut edges = Vec::new();
    for w in 0..width {
        edges.push((0, 1 + w));
    }
    for d in 0..depth {
        let base = 1 + d * width;
        for w in 0..width {
            let s = base + w;
            edges.push((s, base + (w + 1) % width));
            if d + 1 < depth {
                let next = base + width;
                edges.push((s, next + w));
                edges.push((s, next + (w + 1) % width));
            }
        }
    }
    Lts::from_transitions(n as usize, edges.into_iter().map(|(a, b)| (a, b, "t")))
        .expect("generated edges are in range")
}

/// Grid of `side × side` states with right and down transitions, plus a
/// reset transition from the last state back to the first.
fn make_lattice(side: u32) -> Lts {
    let idx = |r: u32, c: u32| r * side + c;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                edges.push((idx(r, c), idx(r, c + 1)));
            }
            if r + 1 < side {
                edges.push((idx(r, c), idx(r + 1, c)));
            }
        }
    }
    edges.push((idx(side - 1, side - 1), 0));
    Lts::from_transitions((side * side) as usize, edges.into_iter().map(|(a, b)| (a, b, "t")))
        .expect("generated edges are in range")
}

/// Benchmark the full pipeline on fan graphs.
fn bench_fan(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan");

    for width in [4, 16, 64] {
        let lts = make_fan(width, 8);

        group.throughput(Throughput::Elements(lts.num_states() as u64));
        group.bench_with_input(BenchmarkId::new("width", width), &lts, |b, lts| {
            let mut engine = LayoutEngine::default();
            b.iter(|| {
                let layout = engine.apply(black_box(lts)).expect("layout succeeds");
                layout.num_clusters()
            })
        });
    }

    group.finish();
}

/// Benchmark both ranking policies on lattices.
fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice");

    for side in [8, 16, 32] {
        let lts = make_lattice(side);

        for style in [RankStyle::Iterative, RankStyle::Cyclic] {
            group.throughput(Throughput::Elements(lts.num_states() as u64));
            group.bench_with_input(
                BenchmarkId::new(style.to_string(), side),
                &lts,
                |b, lts| {
                    let mut engine = LayoutEngine::new(LayoutConfig::default().with_rank_style(style));
                    b.iter(|| {
                        let layout = engine.apply(black_box(lts)).expect("layout succeeds");
                        layout.num_ranks()
                    })
                },
            );
        }
    }

    group.finish();
}

/// Benchmark geometry refresh without re-ranking.
fn bench_refresh_geometry(c: &mut Criterion) {
    let lts = make_fan(32, 8);
    let mut engine = LayoutEngine::default();
    engine.apply(&lts).expect("layout succeeds");

    c.bench_function("refresh_geometry", |b| {
        b.iter(|| {
            engine.refresh_geometry().expect("default config validates");
            black_box(engine.layout().num_clusters())
        })
    });
}

/// Benchmark export and fingerprinting.
fn bench_export(c: &mut Criterion) {
    let lts = make_lattice(16);
    let mut engine = LayoutEngine::default();
    engine.apply(&lts).expect("layout succeeds");

    c.bench_function("export", |b| {
        b.iter(|| {
            let export = engine.export(black_box(&lts));
            export.layout_id
        })
    });
}

criterion_group!(
    benches,
    bench_fan,
    bench_lattice,
    bench_refresh_geometry,
    bench_export,
);
criterion_main!(benches);
