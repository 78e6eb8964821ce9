//! # Sensitivity limits
//!
//! Inverse calculation: from an effective volume per energy to the differential flux that
//! would produce `sup` expected events in each energy bin over the exposure,
//!
//! ```text
//! limit(E) = sup / (A_eff(E) · stations · T) · bins_per_decade / ln(10) / E
//! ```
//!
//! in m⁻²·s⁻¹·sr⁻¹·GeV⁻¹. The energies must form a log-uniform grid (see
//! [`EnergyGrid`]); its step defines the bin width.
//!
//! Degenerate volumes are not errors: a zero volume (or a zero livetime) gives an infinite limit,
//! a negative or NaN volume gives NaN. Those bins are kept as they are and reported with
//! `log::warn!`.
use std::f64::consts::LN_10;

use crate::{
    constants::{GeV, Km3Sr, LimitFlux, Years, CM2_PER_M2},
    energy_grid::EnergyGrid,
    exposure::{effective_area, total_effective_area, ExposureConfig},
    flux_table::{check_energy_power, PlotSeries},
    nulimits_errors::NuLimitsError,
};

/// Check the inputs shared by the limit and event-count calculations.
pub(crate) fn checked_grid(
    energies: &[GeV],
    veffs: &[Km3Sr],
    config: &ExposureConfig,
) -> Result<EnergyGrid, NuLimitsError> {
    if energies.len() != veffs.len() {
        return Err(NuLimitsError::LengthMismatch {
            energies: energies.len(),
            veffs: veffs.len(),
        });
    }
    config.validate()?;
    EnergyGrid::try_from(energies)
}

/// Limit on an already validated grid.
pub(crate) fn grid_limits(
    grid: &EnergyGrid,
    veffs: &[Km3Sr],
    config: &ExposureConfig,
) -> Result<Vec<LimitFlux>, NuLimitsError> {
    let bins_per_decade = grid.bins_per_decade();

    grid.energies()
        .iter()
        .zip(veffs)
        .enumerate()
        .map(|(index, (&energy, &veff))| {
            let area = effective_area(veff, energy, config.density, &config.cross_section)?;
            let area_time = total_effective_area(area, config.stations, config.years);
            // a negative volume has no physical limit
            let limit = if veff < 0.0 {
                f64::NAN
            } else {
                config.sup / area_time * bins_per_decade / LN_10 / energy
            };
            if !limit.is_finite() {
                log::warn!(
                    "degenerate limit at index {index} (E = {energy:e} GeV, veff = {veff} km3sr, \
                     years = {}): {limit}",
                    config.years
                );
            }
            Ok(limit)
        })
        .collect()
}

/// Differential flux limit (m⁻²·s⁻¹·sr⁻¹·GeV⁻¹) in ice with the default cross-section.
///
/// Arguments
/// -----------------
/// * `energies`: log-uniform energies in GeV.
/// * `veffs`: effective volumes in km³·sr, one per energy.
/// * `stations`: number of stations.
/// * `years`: livetime per station in years.
/// * `sup`: allowed number of signal events.
///
/// Return
/// ----------
/// * One limit per energy, or a shape/domain error.
pub fn compute_limit(
    energies: &[GeV],
    veffs: &[Km3Sr],
    stations: f64,
    years: Years,
    sup: f64,
) -> Result<Vec<LimitFlux>, NuLimitsError> {
    compute_limit_with(energies, veffs, &ExposureConfig::new(stations, years, sup))
}

/// Same as [`compute_limit`] with density and cross-section taken from `config`.
pub fn compute_limit_with(
    energies: &[GeV],
    veffs: &[Km3Sr],
    config: &ExposureConfig,
) -> Result<Vec<LimitFlux>, NuLimitsError> {
    LimitCurve::compute(energies, veffs, config).map(LimitCurve::into_limits)
}

/// A limit together with the grid it was computed on.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitCurve {
    energies: Vec<GeV>,
    limits: Vec<LimitFlux>,
    bins_per_decade: f64,
}

impl LimitCurve {
    pub fn compute(
        energies: &[GeV],
        veffs: &[Km3Sr],
        config: &ExposureConfig,
    ) -> Result<Self, NuLimitsError> {
        let grid = checked_grid(energies, veffs, config)?;
        let limits = grid_limits(&grid, veffs, config)?;
        Ok(LimitCurve {
            bins_per_decade: grid.bins_per_decade(),
            energies: grid.into_energies(),
            limits,
        })
    }

    pub fn energies(&self) -> &[GeV] {
        &self.energies
    }

    /// Limits in m⁻²·s⁻¹·sr⁻¹·GeV⁻¹.
    pub fn limits(&self) -> &[LimitFlux] {
        &self.limits
    }

    pub fn bins_per_decade(&self) -> f64 {
        self.bins_per_decade
    }

    pub fn into_limits(self) -> Vec<LimitFlux> {
        self.limits
    }

    /// Convert to `E^e_power Φ` in `GeV^(e_power-1) cm^-2 s^-1 sr^-1`, rebinned to
    /// `target_bins_per_decade` so that it can be drawn with published limits.
    pub fn to_plot_units(
        &self,
        e_power: i32,
        target_bins_per_decade: f64,
    ) -> Result<PlotSeries, NuLimitsError> {
        check_energy_power(e_power)?;
        let binning = target_bins_per_decade / self.bins_per_decade;
        let values = self
            .energies
            .iter()
            .zip(&self.limits)
            .map(|(e, limit)| limit * e.powi(e_power) / CM2_PER_M2 * binning)
            .collect();
        Ok(PlotSeries {
            energies: self.energies.clone(),
            values,
            band_min: None,
            band_max: None,
        })
    }
}
