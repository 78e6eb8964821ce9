//! # Constants and unit type aliases for nulimits
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the `nulimits` library. Every other module reads its numbers from
//! here, so the same constant never exists in two copies.
//!
//! ## Overview
//!
//! - Physical constants (Avogadro's number)
//! - Unit conversions (GeV ↔ eV, m² ↔ cm², g/cm³ ↔ nucleons/km³, years ↔ seconds)
//! - Two year lengths: Julian years for exposures, 365-day years for recorded livetimes
//! - Statistical upper-limit multipliers for zero-background searches
//! - Numeric tolerances for energy-grid validation and bin integration
//! - Type aliases naming the unit carried by an `f64`
//!
//! ## Canonical units
//!
//! | Quantity                    | Unit                          | Alias            |
//! |-----------------------------|-------------------------------|------------------|
//! | Energy                      | GeV                           | [`GeV`]          |
//! | Effective volume            | km³·sr                        | [`Km3Sr`]        |
//! | Effective area              | m²·sr                         | [`M2Sr`]         |
//! | Limit flux                  | m⁻²·s⁻¹·sr⁻¹·GeV⁻¹            | [`LimitFlux`]    |
//! | Model flux                  | cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹           | [`ModelFlux`]    |

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Avogadro constant in mol⁻¹ (CODATA 2018, exact)
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Electron-volts in one GeV
pub const EV_PER_GEV: f64 = 1e9;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Seconds in a Julian year, used when an exposure in years is turned into seconds
pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * SECONDS_PER_DAY;

/// Days per year when a recorded livetime is expressed in years (no leap day).
///
/// Run logs count livetime in days and published curves divide by 365; an exposure in years is
/// then turned back into seconds with [`SECONDS_PER_YEAR`].
pub const LIVETIME_DAYS_PER_YEAR: f64 = 365.0;

/// Seconds in a livetime year
pub const SECONDS_PER_LIVETIME_YEAR: f64 = LIVETIME_DAYS_PER_YEAR * SECONDS_PER_DAY;

/// Square centimeters in one square meter
pub const CM2_PER_M2: f64 = 1e4;

/// g/cm³ → g/km³, i.e. nucleons per km³ at unit atomic mass (per mole)
pub const G_CM3_TO_G_KM3: f64 = 1e15;

/// Solid angle of the full sky in steradians
pub const FULL_SKY_SR: f64 = 4.0 * std::f64::consts::PI;

/// Density of glacial ice in g/cm³
pub const ICE_DENSITY: GramPerCm3 = 0.92;

// -------------------------------------------------------------------------------------------------
// Upper-limit multipliers (zero observed events, zero background)
// -------------------------------------------------------------------------------------------------

/// Feldman–Cousins 90% CL upper limit
pub const SUP_FELDMAN_COUSINS: f64 = 2.44;

/// Neyman 90% CL upper limit
pub const SUP_NEYMAN: f64 = 2.3;

// -------------------------------------------------------------------------------------------------
// Numeric tolerances
// -------------------------------------------------------------------------------------------------

/// Relative tolerance on the log10 spacing of an energy grid
pub const LOG_STEP_RTOL: f64 = 1e-5;

/// Absolute tolerance on the log10 spacing of an energy grid
pub const LOG_STEP_ATOL: f64 = 1e-8;

/// Number of log-energy samples used to average a flux model over one bin
pub const BIN_SAMPLES: usize = 101;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Energy in GeV
pub type GeV = f64;
/// Cross-section in cm²
pub type SquareCentimeter = f64;
/// Interaction length as returned by the cross-section model, `1 / (N_A σ)`
pub type InteractionLength = f64;
/// Effective volume times solid angle, km³·sr
pub type Km3Sr = f64;
/// Effective area times solid angle, m²·sr
pub type M2Sr = f64;
/// Effective area times solid angle times time, m²·sr·s
pub type M2SrSec = f64;
/// Density in g/cm³
pub type GramPerCm3 = f64;
/// Livetime in years; an exposure year lasts [`SECONDS_PER_YEAR`]
pub type Years = f64;
/// Time-integrated exposure, km³·sr·yr
pub type Km3SrYr = f64;
/// Differential flux in m⁻²·s⁻¹·sr⁻¹·GeV⁻¹ (output of the limit calculation)
pub type LimitFlux = f64;
/// Differential flux in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹ (output of a flux model)
pub type ModelFlux = f64;
