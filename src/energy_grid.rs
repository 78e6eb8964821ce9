//! # Log-uniform energy grids
//!
//! A sensitivity curve is evaluated on a grid of energies (GeV) that is evenly spaced in
//! `log10(E)`. The common step defines the number of **bins per decade** used to normalize a
//! limit to a differential flux, and the half-step defines the integration window of the
//! event-count calculation.
//!
//! [`EnergyGrid::new`] rejects grids that are too short, contain non-positive or non-finite
//! energies, are not strictly increasing, or whose log10 steps are not uniform within
//! `|d − d0| ≤ LOG_STEP_ATOL + LOG_STEP_RTOL·|d0|`.
use itertools::Itertools;

use crate::{
    constants::{GeV, LOG_STEP_ATOL, LOG_STEP_RTOL},
    nulimits_errors::NuLimitsError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyGrid {
    energies: Vec<GeV>,
    log_step: f64,
}

impl EnergyGrid {
    /// Validate a list of energies (GeV) and build a grid from it.
    ///
    /// Arguments
    /// -----------------
    /// * `energies`: at least two positive, strictly increasing, log10-uniform energies in GeV.
    ///
    /// Return
    /// ----------
    /// * The grid, or a shape error naming the first offending index or gap.
    pub fn new(energies: Vec<GeV>) -> Result<Self, NuLimitsError> {
        if energies.len() < 2 {
            return Err(NuLimitsError::GridTooShort(energies.len()));
        }

        if let Some((index, &energy)) = energies
            .iter()
            .enumerate()
            .find(|(_, e)| !(e.is_finite() && **e > 0.0))
        {
            return Err(NuLimitsError::NonPositiveEnergy { index, energy });
        }

        let steps: Vec<f64> = energies
            .iter()
            .map(|e| e.log10())
            .tuple_windows()
            .map(|(a, b)| b - a)
            .collect();

        if let Some(index) = steps.iter().position(|d| *d <= 0.0) {
            return Err(NuLimitsError::NotIncreasing(index + 1));
        }

        let expected = steps[0];
        for (index, step) in steps.iter().enumerate().skip(1) {
            if (step - expected).abs() > LOG_STEP_ATOL + LOG_STEP_RTOL * expected.abs() {
                return Err(NuLimitsError::NonUniformLogSpacing {
                    index,
                    step: *step,
                    expected,
                });
            }
        }

        Ok(EnergyGrid {
            energies,
            log_step: expected,
        })
    }

    /// Build a grid from log10 energies expressed in another unit.
    ///
    /// `scale` converts `10^x` into GeV, e.g. `1e-9` for log10(E/eV).
    pub fn from_log10(log_energies: &[f64], scale: f64) -> Result<Self, NuLimitsError> {
        EnergyGrid::new(
            log_energies
                .iter()
                .map(|x| 10f64.powf(*x) * scale)
                .collect(),
        )
    }

    /// `points` energies from `start` to `stop` (GeV, both included), evenly spaced in log10.
    pub fn log_spaced(start: GeV, stop: GeV, points: usize) -> Result<Self, NuLimitsError> {
        if points < 2 {
            return Err(NuLimitsError::GridTooShort(points));
        }
        let (lo, hi) = (start.log10(), stop.log10());
        let step = (hi - lo) / (points - 1) as f64;
        EnergyGrid::new(
            (0..points)
                .map(|i| 10f64.powf(lo + step * i as f64))
                .collect(),
        )
    }

    pub fn energies(&self) -> &[GeV] {
        &self.energies
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Common log10 spacing of the grid.
    pub fn log_step(&self) -> f64 {
        self.log_step
    }

    pub fn bins_per_decade(&self) -> f64 {
        1.0 / self.log_step
    }

    pub fn log10_energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.energies.iter().map(|e| e.log10())
    }

    pub fn into_energies(self) -> Vec<GeV> {
        self.energies
    }
}

impl TryFrom<&[GeV]> for EnergyGrid {
    type Error = NuLimitsError;

    fn try_from(energies: &[GeV]) -> Result<Self, Self::Error> {
        EnergyGrid::new(energies.to_vec())
    }
}
