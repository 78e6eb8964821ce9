mod common;

use approx::assert_relative_eq;
use nulimits::{
    constants::CM2_PER_M2,
    energy_grid::EnergyGrid,
    events::{
        expected_events, expected_events_with, total_expected_events, FluxModel, PowerLawFlux,
        TabulatedFlux,
    },
    exposure::ExposureConfig,
    limit::compute_limit,
};

use crate::common::{flat_limit_veffs, smt_energies, SMT_VEFFS};

#[test]
fn flat_flux_tracks_veff_growth() {
    let flat = |_energy: f64| 1e-18;

    let counts = expected_events(&flat, &smt_energies(), &SMT_VEFFS, 1.0, 1.0, 2.44).unwrap();
    assert!(counts.iter().all(|c| c.is_finite() && *c > 0.0));
    assert!(counts.windows(2).all(|w| w[1] > w[0]));

    // two decades, four bins per decade
    let grid = EnergyGrid::log_spaced(1e7, 1e9, 9).unwrap();
    let veffs = [0.01, 0.03, 0.1, 0.3, 1.0, 2.0, 4.0, 7.0, 10.0];
    let counts = expected_events(&flat, grid.energies(), &veffs, 1.0, 1.0, 2.44).unwrap();
    assert!(counts.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn limit_as_flux_gives_sup_per_bin() {
    let grid = EnergyGrid::log_spaced(1e7, 1e11, 9).unwrap();
    let energies = grid.energies();
    let veffs = flat_limit_veffs(energies);
    let sup = 2.44;

    let limits = compute_limit(energies, &veffs, 1.0, 1.0, sup).unwrap();
    for limit in &limits {
        assert_relative_eq!(*limit, limits[0], max_relative = 1e-9);
    }

    // limits are per m², models per cm²
    let per_cm2: Vec<f64> = limits.iter().map(|l| l / CM2_PER_M2).collect();
    let model = TabulatedFlux::new(energies, &per_cm2).unwrap();

    let counts = expected_events(&model, energies, &veffs, 1.0, 1.0, sup).unwrap();
    let last = counts.len() - 1;
    for count in &counts[1..last] {
        assert_relative_eq!(count / sup, 1.0, max_relative = 1e-6);
    }
    // half of each edge bin lies outside the tabulated range
    assert!((counts[0] / sup - 0.5).abs() < 0.02);
    assert!((counts[last] / sup - 0.5).abs() < 0.02);
}

#[test]
fn counts_follow_exposure_linearly() {
    let model = PowerLawFlux::icecube_thrumu();
    let energies = smt_energies();

    let one = expected_events(&model, &energies, &SMT_VEFFS, 1.0, 1.0, 2.44).unwrap();
    let config = ExposureConfig::default().with_stations(35.0).with_years(10.0);
    let array = expected_events_with(&model, &energies, &SMT_VEFFS, &config).unwrap();
    for (a, b) in one.iter().zip(&array) {
        assert_relative_eq!(*b, 350.0 * a, max_relative = 1e-10);
    }

    let total = total_expected_events(&model, &energies, &SMT_VEFFS, &config).unwrap();
    assert_relative_eq!(total, array.iter().sum::<f64>(), max_relative = 1e-12);
}

#[test]
fn steeper_spectrum_yields_fewer_events() {
    let energies = smt_energies();
    let config = ExposureConfig::default();
    let hard = PowerLawFlux::icecube_thrumu();
    let soft = PowerLawFlux::icecube_combined();

    // same flux at the lowest grid point
    let pivot = energies[0];
    let soft = PowerLawFlux::new(soft.flux(pivot), pivot, soft.index);
    let hard = PowerLawFlux::new(hard.flux(pivot), pivot, hard.index);

    let n_hard = total_expected_events(&hard, &energies, &SMT_VEFFS, &config).unwrap();
    let n_soft = total_expected_events(&soft, &energies, &SMT_VEFFS, &config).unwrap();
    assert!(n_soft < n_hard);
}
