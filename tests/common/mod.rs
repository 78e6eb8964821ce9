#![allow(dead_code)]

use approx::assert_relative_eq;
use nulimits::cross_section::average_interaction_length;

/// Energies (GeV) of the single-station SMT simulation: 1e7 to 1e11 GeV, two per decade.
pub fn smt_energies() -> Vec<f64> {
    (32..=40).map(|x| 10f64.powf(x as f64 / 2.0) / 1e9).collect()
}

/// Single-station SMT effective volumes in km³·sr on [`smt_energies`].
pub const SMT_VEFFS: [f64; 9] = [
    1.108e-03, 3.112e-02, 2.030e-01, 7.434e-01, 2.642e+00, 7.020e+00, 1.664e+01, 4.001e+01,
    7.632e+01,
];

/// Limits (m⁻² s⁻¹ sr⁻¹ GeV⁻¹) for [`SMT_VEFFS`], one station, one year, sup = 2.44, ice.
pub const SMT_LIMITS: [f64; 9] = [
    4.099025305149966e-14,
    2.901717196860489e-16,
    9.099769706391637e-18,
    5.205535210563695e-19,
    3.130934165999868e-20,
    2.562759969543354e-21,
    2.387050012252203e-22,
    2.2210013943659892e-23,
    2.6354868242211666e-24,
];

pub fn assert_slices_close(actual: &[f64], expected: &[f64], max_relative: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, max_relative = max_relative);
    }
}

/// Effective volumes that make the limit flat on `energies`: `veff ∝ λ(E) / E`.
pub fn flat_limit_veffs(energies: &[f64]) -> Vec<f64> {
    let reference = average_interaction_length(energies[0]).unwrap() / energies[0];
    energies
        .iter()
        .map(|e| average_interaction_length(*e).unwrap() / e / reference)
        .collect()
}

/// Published E²Φ limit (GeV cm⁻² s⁻¹ sr⁻¹, one bin per decade) of the deep hi/lo trigger with the
/// 2024 station livetimes and one allowed event, on log10(E/eV) = 16.5, 17.0, ..., 20.0.
pub const RNOG_TODAY: [f64; 8] = [
    6.792e-06, 1.409e-06, 5.108e-07, 2.584e-07, 1.814e-07, 1.619e-07, 1.325e-07, 1.691e-07,
];
