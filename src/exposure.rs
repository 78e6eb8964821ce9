//! # Effective area and exposure
//!
//! Conversion of an effective volume into an effective area, and of an effective area into an
//! exposure (area × time). This is the single piece of geometry shared by the limit
//! ([`crate::limit`]) and event-count ([`crate::events`]) calculations; both go through
//! [`effective_area`] with the same [`ExposureConfig`], so the energy → interaction-length mapping
//! cannot differ between them.
//!
//! ## Units
//! -----------------
//! * volume: km³·sr (full solid angle included)
//! * energy: GeV
//! * density: g/cm³, converted to nucleons/km³ with `× 1e15`
//! * area: m²·sr; area-time: m²·sr·s
//!
//! ## Projection
//! -----------------
//! [`project_exposure`] accumulates a time-integrated exposure (km³·sr·yr) from the livetime
//! already on disk plus an assumed future livetime, the way proposal figures are built. The
//! result is a [`VeffTable`] that is fed to [`crate::limit::compute_limit`] with `years = 1`.
//!
//! [`YearlyExposure`] holds the same kind of accumulated exposure, tabulated at the end of each
//! calendar year of a deployment schedule.
use std::fs::File;

use camino::Utf8Path;
use hifitime::Duration;
use serde::Deserialize;

use crate::{
    constants::{
        GeV, GramPerCm3, Km3Sr, Km3SrYr, M2Sr, M2SrSec, Years, CM2_PER_M2, G_CM3_TO_G_KM3,
        ICE_DENSITY, SECONDS_PER_YEAR, SUP_FELDMAN_COUSINS,
    },
    cross_section::CrossSectionModel,
    nulimits_errors::NuLimitsError,
    tables::VeffTable,
    time::duration_to_years,
};

/// Scalar parameters of one sensitivity calculation.
///
/// Fields
/// -----------------
/// * `stations`: number of detector stations (fractional equivalents allowed), > 0.
/// * `years`: livetime per station in years, ≥ 0; each year counts [`SECONDS_PER_YEAR`].
/// * `sup`: allowed number of signal events (2.44 Feldman–Cousins, 2.3 Neyman), > 0.
/// * `density`: target density in g/cm³, > 0.
/// * `cross_section`: energy → interaction-length model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    pub stations: f64,
    pub years: Years,
    pub sup: f64,
    pub density: GramPerCm3,
    pub cross_section: CrossSectionModel,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        ExposureConfig {
            stations: 1.0,
            years: 1.0,
            sup: SUP_FELDMAN_COUSINS,
            density: ICE_DENSITY,
            cross_section: CrossSectionModel::Ctw2011,
        }
    }
}

impl ExposureConfig {
    pub fn new(stations: f64, years: Years, sup: f64) -> Self {
        ExposureConfig {
            stations,
            years,
            sup,
            ..Default::default()
        }
    }

    pub fn with_stations(mut self, stations: f64) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_years(mut self, years: Years) -> Self {
        self.years = years;
        self
    }

    /// Use an accumulated livetime instead of a number of years.
    pub fn with_livetime(mut self, livetime: Duration) -> Self {
        self.years = duration_to_years(livetime);
        self
    }

    pub fn with_sup(mut self, sup: f64) -> Self {
        self.sup = sup;
        self
    }

    pub fn with_density(mut self, density: GramPerCm3) -> Self {
        self.density = density;
        self
    }

    pub fn with_cross_section(mut self, model: CrossSectionModel) -> Self {
        self.cross_section = model;
        self
    }

    /// Load a configuration from a JSON file; missing fields keep their defaults.
    pub fn from_json(path: &Utf8Path) -> Result<Self, NuLimitsError> {
        let file = File::open(path)?;
        let config: ExposureConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), NuLimitsError> {
        if !(self.stations.is_finite() && self.stations > 0.0) {
            return Err(NuLimitsError::InvalidExposure(format!(
                "stations must be positive, got {}",
                self.stations
            )));
        }
        if !(self.years.is_finite() && self.years >= 0.0) {
            return Err(NuLimitsError::InvalidExposure(format!(
                "years must be non-negative, got {}",
                self.years
            )));
        }
        if !(self.sup.is_finite() && self.sup > 0.0) {
            return Err(NuLimitsError::InvalidExposure(format!(
                "sup must be positive, got {}",
                self.sup
            )));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(NuLimitsError::InvalidExposure(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        Ok(())
    }
}

/// Convert an effective volume into an effective area at one energy.
///
/// `area = volume × (density × 1e15) / λ_avg(E) × 1e-4`
///
/// Arguments
/// -----------------
/// * `volume`: effective volume in km³·sr.
/// * `energy_gev`: neutrino energy in GeV.
/// * `density`: target density in g/cm³.
/// * `model`: cross-section model giving the interaction length.
///
/// Return
/// ----------
/// * The effective area in m²·sr, or a domain error from the cross-section model.
pub fn effective_area(
    volume: Km3Sr,
    energy_gev: GeV,
    density: GramPerCm3,
    model: &CrossSectionModel,
) -> Result<M2Sr, NuLimitsError> {
    let int_len = model.average_interaction_length(energy_gev)?;
    let nucleons_per_km3 = density * G_CM3_TO_G_KM3;
    Ok(volume * nucleons_per_km3 / int_len / CM2_PER_M2)
}

/// Effective area integrated over stations and livetime, in m²·sr·s.
pub fn total_effective_area(area: M2Sr, stations: f64, years: Years) -> M2SrSec {
    area * stations * (years * SECONDS_PER_YEAR)
}

/// Livetime assumptions used to extend an exposure into the future.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Additional station-years of operation
    pub additional_years: Years,
    /// Fraction of the calendar time spent taking good data
    pub uptime_fraction: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            additional_years: 0.0,
            uptime_fraction: 0.45,
        }
    }
}

/// Accumulate the exposure of data already recorded and of an assumed future run.
///
/// `exposure(E) = existing(E) × existing_livetime + additional(E) × additional_years × uptime`
///
/// Arguments
/// -----------------
/// * `existing`: effective volume of the configuration that recorded the data on disk.
/// * `existing_livetime`: livetime summed over all stations.
/// * `additional`: effective volume assumed for the future run, on the same energies.
/// * `projection`: additional station-years and uptime fraction.
///
/// Return
/// ----------
/// * A [`VeffTable`] whose values are exposures in km³·sr·yr.
pub fn project_exposure(
    existing: &VeffTable,
    existing_livetime: Duration,
    additional: &VeffTable,
    projection: &ProjectionConfig,
) -> Result<VeffTable, NuLimitsError> {
    if !(projection.additional_years.is_finite() && projection.additional_years >= 0.0) {
        return Err(NuLimitsError::InvalidExposure(format!(
            "additional years must be non-negative, got {}",
            projection.additional_years
        )));
    }
    if !(0.0..=1.0).contains(&projection.uptime_fraction) {
        return Err(NuLimitsError::InvalidExposure(format!(
            "uptime fraction must be in [0, 1], got {}",
            projection.uptime_fraction
        )));
    }
    if !existing.same_energies(additional) {
        return Err(NuLimitsError::InvalidExposure(
            "existing and additional effective volumes use different energies".into(),
        ));
    }
    if projection.additional_years > 0.0 && projection.uptime_fraction == 0.0 {
        log::warn!("projection adds station-years with zero uptime; no exposure is added");
    }

    let existing_years = duration_to_years(existing_livetime);
    let future_years = projection.additional_years * projection.uptime_fraction;

    let exposures = existing
        .veffs()
        .iter()
        .zip(additional.veffs())
        .map(|(v_now, v_next)| v_now * existing_years + v_next * future_years)
        .collect();

    VeffTable::new(existing.energies().to_vec(), exposures)
}

/// Accumulated exposure at the end of each year, in km³·sr·yr on a shared energy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyExposure {
    energies: Vec<GeV>,
    rows: Vec<(i32, Vec<Km3SrYr>)>,
}

impl YearlyExposure {
    /// Build a schedule from one exposure row per year.
    ///
    /// Every row must have one value per energy and the years must be strictly increasing.
    pub fn new(energies: Vec<GeV>, rows: Vec<(i32, Vec<Km3SrYr>)>) -> Result<Self, NuLimitsError> {
        for (_, exposures) in &rows {
            if exposures.len() != energies.len() {
                return Err(NuLimitsError::LengthMismatch {
                    energies: energies.len(),
                    veffs: exposures.len(),
                });
            }
        }
        if let Some(pair) = rows.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(NuLimitsError::InvalidValue(format!(
                "year {} listed after {}",
                pair[1].0, pair[0].0
            )));
        }
        Ok(YearlyExposure { energies, rows })
    }

    pub fn energies(&self) -> &[GeV] {
        &self.energies
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|(year, _)| *year)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[Km3SrYr])> + '_ {
        self.rows
            .iter()
            .map(|(year, exposures)| (*year, exposures.as_slice()))
    }

    /// Exposure accumulated by the end of `year`, `None` outside the schedule.
    pub fn exposure(&self, year: i32) -> Option<&[Km3SrYr]> {
        self.iter()
            .find(|(y, _)| *y == year)
            .map(|(_, exposures)| exposures)
    }

    /// Exposure of `year` as a table, to be used with one station and `years = 1`.
    pub fn table(&self, year: i32) -> Result<VeffTable, NuLimitsError> {
        let exposures = self
            .exposure(year)
            .ok_or(NuLimitsError::UnknownYear(year))?;
        VeffTable::new(self.energies.clone(), exposures.to_vec())
    }
}
