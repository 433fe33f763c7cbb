//! Benchmarks for operator assembly on triangulated grids of varying size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dec::dual::{DualComplex, SubdivisionRule};
use dec::operators::{self, HodgeKind};
use dec::primal::PrimalComplex;
use dec::Dim;

/// An `n x n` grid of unit squares, each split into two triangles.
fn grid(n: usize) -> PrimalComplex {
    let mut p = PrimalComplex::new_2d();
    let mut ids = vec![vec![0usize; n + 1]; n + 1];
    for i in 0..=n {
        for j in 0..=n {
            let v = p.add_vertices(1)[0];
            p.set_point(v, vec![i as f64, j as f64]);
            ids[i][j] = v;
        }
    }
    for i in 0..n {
        for j in 0..n {
            let (a, b, c, d) = (ids[i][j], ids[i + 1][j], ids[i + 1][j + 1], ids[i][j + 1]);
            p.glue_triangle(a, b, c).unwrap();
            p.glue_triangle(a, c, d).unwrap();
        }
    }
    p
}

fn hodge_star_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hodge_star");

    for n in [4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("diagonal", n), n, |b, &n| {
            let primal = grid(n);
            let mut dual = DualComplex::build(&primal);
            dual.subdivide_duals(SubdivisionRule::Barycenter).unwrap();

            b.iter(|| {
                let star = operators::hodge_star(&dual, Dim::One, HodgeKind::Diagonal).unwrap();
                black_box(star);
            });
        });
    }

    group.finish();
}

fn laplacian_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("laplacian");

    for n in [4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("vertex", n), n, |b, &n| {
            let primal = grid(n);
            let mut dual = DualComplex::build(&primal);
            dual.subdivide_duals(SubdivisionRule::Barycenter).unwrap();

            b.iter(|| {
                let lap =
                    operators::laplacian(&primal, &dual, Dim::Zero, HodgeKind::Diagonal).unwrap();
                black_box(lap);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, hodge_star_benchmark, laplacian_benchmark);
criterion_main!(benches);
