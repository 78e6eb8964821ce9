//! # Expected event counts
//!
//! Forward calculation: given a flux model, the number of events a detector would record in
//! each energy bin. For a grid point with log10 energy `x` and grid step `s`, the flux is
//! averaged over `[x − s/2, x + s/2]` in log10 energy with a 101-sample trapezoid rule, then
//! compared with the limit computed on the same grid and exposure:
//!
//! ```text
//! counts(E) = ⟨Φ⟩(E) / limit(E) · sup
//! ```
//!
//! so that a flux sitting exactly on the limit yields `sup` events per bin.
//!
//! Flux models return Φ(E) in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹ for E in GeV. Any closure
//! `Fn(f64) -> f64` is a model; [`PowerLawFlux`] and [`TabulatedFlux`] cover the usual cases.
use crate::{
    constants::{GeV, Km3Sr, ModelFlux, Years, BIN_SAMPLES, CM2_PER_M2, EV_PER_GEV},
    exposure::{ExposureConfig, YearlyExposure},
    flux_table::FluxTable,
    limit::{checked_grid, grid_limits},
    nulimits_errors::NuLimitsError,
};

/// A differential neutrino flux, Φ(E) in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹ with E in GeV.
pub trait FluxModel {
    fn flux(&self, energy: GeV) -> ModelFlux;
}

impl<F> FluxModel for F
where
    F: Fn(GeV) -> ModelFlux,
{
    fn flux(&self, energy: GeV) -> ModelFlux {
        self(energy)
    }
}

/// `Φ(E) = normalization · (E / pivot)^index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFlux {
    /// Φ at the pivot energy, cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹
    pub normalization: ModelFlux,
    pub pivot: GeV,
    pub index: f64,
}

/// 100 TeV, the pivot of the IceCube astrophysical fits
const ICECUBE_PIVOT: GeV = 1e5;

impl PowerLawFlux {
    pub fn new(normalization: ModelFlux, pivot: GeV, index: f64) -> Self {
        PowerLawFlux {
            normalization,
            pivot,
            index,
        }
    }

    /// Per-flavor fit quoted per eV at a 100 TeV pivot.
    fn icecube_per_ev(norm_per_ev: f64, index: f64) -> Self {
        PowerLawFlux::new(norm_per_ev * EV_PER_GEV, ICECUBE_PIVOT, index)
    }

    /// IceCube through-going muons, 3.03e-27 eV⁻¹ cm⁻² s⁻¹ sr⁻¹ at 100 TeV, index −2.19.
    pub fn icecube_thrumu() -> Self {
        PowerLawFlux::icecube_per_ev(3.03e-27, -2.19)
    }

    /// IceCube combined analysis, 6.7e-27 eV⁻¹ cm⁻² s⁻¹ sr⁻¹ at 100 TeV, index −2.50.
    pub fn icecube_combined() -> Self {
        PowerLawFlux::icecube_per_ev(6.7e-27, -2.50)
    }

    /// IceCube fit with 4.32e-27 eV⁻¹ cm⁻² s⁻¹ sr⁻¹ at 100 TeV, index −2.37.
    pub fn icecube_soft() -> Self {
        PowerLawFlux::icecube_per_ev(4.32e-27, -2.37)
    }

    /// All-flavor IceCube parameterization `3 · offset · (E / 100 TeV)^slope · 1e-18`.
    ///
    /// `offset = 1.01, slope = −2.19` is the through-going muon best fit,
    /// `offset = 2.46, slope = −2.92` the HESE best fit.
    pub fn icecube_all_flavor(offset: f64, slope: f64) -> Self {
        PowerLawFlux::new(3.0 * offset * 1e-18, ICECUBE_PIVOT, slope)
    }
}

impl FluxModel for PowerLawFlux {
    fn flux(&self, energy: GeV) -> ModelFlux {
        self.normalization * (energy / self.pivot).powf(self.index)
    }
}

/// Flux interpolated linearly in `log10 Φ` versus `log10 E`; zero outside the tabulated energies.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedFlux {
    log_energies: Vec<f64>,
    log_fluxes: Vec<f64>,
}

impl TabulatedFlux {
    /// Arguments
    /// -----------------
    /// * `energies`: strictly increasing positive energies in GeV (at least two).
    /// * `fluxes`: Φ in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹; non-positive values read as no flux.
    pub fn new(energies: &[GeV], fluxes: &[ModelFlux]) -> Result<Self, NuLimitsError> {
        if energies.len() != fluxes.len() {
            return Err(NuLimitsError::LengthMismatch {
                energies: energies.len(),
                veffs: fluxes.len(),
            });
        }
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
        if let Some(index) = energies.windows(2).position(|w| w[1] <= w[0]) {
            return Err(NuLimitsError::NotIncreasing(index + 1));
        }

        Ok(TabulatedFlux {
            log_energies: energies.iter().map(|e| e.log10()).collect(),
            log_fluxes: fluxes
                .iter()
                .map(|f| if *f > 0.0 { f.log10() } else { f64::NEG_INFINITY })
                .collect(),
        })
    }

    /// Build from `E²Φ` values in GeV·cm⁻²·s⁻¹·sr⁻¹.
    pub fn from_e2_flux(energies: &[GeV], e2_fluxes: &[f64]) -> Result<Self, NuLimitsError> {
        let fluxes: Vec<ModelFlux> = energies
            .iter()
            .zip(e2_fluxes)
            .map(|(e, f)| f / (e * e))
            .collect();
        TabulatedFlux::new(energies, &fluxes)
    }

    pub fn from_flux_table(table: &FluxTable) -> Result<Self, NuLimitsError> {
        TabulatedFlux::new(table.energies(), &table.differential_fluxes())
    }
}

impl FluxModel for TabulatedFlux {
    fn flux(&self, energy: GeV) -> ModelFlux {
        let x = energy.log10();
        let (first, last) = match (self.log_energies.first(), self.log_energies.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if !(first..=last).contains(&x) {
            return 0.0;
        }

        let upper = self
            .log_energies
            .partition_point(|le| *le < x)
            .clamp(1, self.log_energies.len() - 1);
        let (x0, x1) = (self.log_energies[upper - 1], self.log_energies[upper]);
        let (y0, y1) = (self.log_fluxes[upper - 1], self.log_fluxes[upper]);
        if !(y0.is_finite() && y1.is_finite()) {
            return 0.0;
        }

        let t = (x - x0) / (x1 - x0);
        10f64.powf(y0 + t * (y1 - y0))
    }
}

/// Trapezoid rule over `(x, y)` samples.
fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

/// Mean of the flux over one log10-energy bin centred on `log_energy`.
fn bin_mean_flux<M: FluxModel + ?Sized>(model: &M, log_energy: f64, step: f64) -> ModelFlux {
    let lo = log_energy - step / 2.0;
    let spacing = step / (BIN_SAMPLES - 1) as f64;
    let xs: Vec<f64> = (0..BIN_SAMPLES).map(|i| lo + spacing * i as f64).collect();
    let ys: Vec<ModelFlux> = xs.iter().map(|x| model.flux(10f64.powf(*x))).collect();
    trapezoid(&xs, &ys) / step
}

/// Expected number of events per energy bin for `model`, in ice with the default cross-section.
///
/// Arguments
/// -----------------
/// * `model`: flux model, Φ in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹.
/// * `energies`: log-uniform energies in GeV.
/// * `veffs`: effective volumes in km³·sr.
/// * `stations`, `years`, `sup`: exposure, as for [`crate::limit::compute_limit`].
pub fn expected_events<M: FluxModel + ?Sized>(
    model: &M,
    energies: &[GeV],
    veffs: &[Km3Sr],
    stations: f64,
    years: Years,
    sup: f64,
) -> Result<Vec<f64>, NuLimitsError> {
    expected_events_with(
        model,
        energies,
        veffs,
        &ExposureConfig::new(stations, years, sup),
    )
}

/// Same as [`expected_events`] with density and cross-section taken from `config`.
pub fn expected_events_with<M: FluxModel + ?Sized>(
    model: &M,
    energies: &[GeV],
    veffs: &[Km3Sr],
    config: &ExposureConfig,
) -> Result<Vec<f64>, NuLimitsError> {
    let grid = checked_grid(energies, veffs, config)?;
    let limits = grid_limits(&grid, veffs, config)?;
    let step = grid.log_step();

    Ok(grid
        .log10_energies()
        .zip(limits)
        .map(|(log_energy, limit)| {
            let mean_flux = bin_mean_flux(model, log_energy, step) * CM2_PER_M2;
            mean_flux / limit * config.sup
        })
        .collect())
}

/// Total expected number of events over all bins.
pub fn total_expected_events<M: FluxModel + ?Sized>(
    model: &M,
    energies: &[GeV],
    veffs: &[Km3Sr],
    config: &ExposureConfig,
) -> Result<f64, NuLimitsError> {
    Ok(expected_events_with(model, energies, veffs, config)?
        .iter()
        .sum())
}

/// Total expected number of events accumulated by the end of each year of `schedule`.
///
/// Exposures already include stations and livetime; only density, cross-section and `sup` are
/// taken from `config`.
pub fn expected_events_by_year<M: FluxModel + ?Sized>(
    model: &M,
    schedule: &YearlyExposure,
    config: &ExposureConfig,
) -> Result<Vec<(i32, f64)>, NuLimitsError> {
    let unit = ExposureConfig {
        stations: 1.0,
        years: 1.0,
        ..*config
    };
    schedule
        .iter()
        .map(|(year, exposures)| {
            let count = total_expected_events(model, schedule.energies(), exposures, &unit)?;
            Ok((year, count))
        })
        .collect()
}
