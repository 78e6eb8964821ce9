use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use nulimits::cross_section::average_interaction_length;
use nulimits::datasets::VeffDataset;
use nulimits::energy_grid::EnergyGrid;
use nulimits::events::{expected_events, PowerLawFlux};
use nulimits::limit::compute_limit;

/// Interaction length across the full fit range.
fn bench_interaction_length(c: &mut Criterion) {
    let grid = EnergyGrid::log_spaced(1e4, 1e12, 1_000).unwrap();

    c.bench_function("cross_section/average_interaction_length_1000", |b| {
        b.iter(|| {
            grid.energies()
                .iter()
                .map(|e| average_interaction_length(black_box(*e)).unwrap())
                .sum::<f64>()
        })
    });
}

fn bench_limit(c: &mut Criterion) {
    let smt = VeffDataset::SmtMartin.table().unwrap();

    c.bench_function("limit/smt_martin", |b| {
        b.iter(|| {
            compute_limit(
                black_box(smt.energies()),
                black_box(smt.veffs()),
                35.0,
                10.0,
                2.44,
            )
            .unwrap()
        })
    });
}

/// Event counts integrate the flux over each bin, so cost grows with the grid size.
fn bench_expected_events(c: &mut Criterion) {
    let model = PowerLawFlux::icecube_thrumu();
    let mut group = c.benchmark_group("expected_events");

    for n in [9usize, 33, 129] {
        let grid = EnergyGrid::log_spaced(1e7, 1e11, n).unwrap();
        let veffs: Vec<f64> = grid.energies().iter().map(|e| (e / 1e7).sqrt()).collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                expected_events(
                    &model,
                    black_box(grid.energies()),
                    black_box(&veffs),
                    35.0,
                    10.0,
                    2.44,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_interaction_length,
    bench_limit,
    bench_expected_events
);
criterion_main!(benches);
