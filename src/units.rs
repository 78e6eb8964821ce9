//! Unit tokens accepted in data-file headers, and their factors to the canonical units
//! (GeV, cm, s, sr, km³·sr).
//!
//! Compound flux units such as `GeV cm^-2 s^-1 sr^-1` are split into `unit^power` tokens; each
//! token is matched with [`UNIT_TOKEN`].
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    constants::{GeV, FULL_SKY_SR, SECONDS_PER_DAY, SECONDS_PER_LIVETIME_YEAR, SECONDS_PER_YEAR},
    nulimits_errors::NuLimitsError,
};

/// `unit` or `unit^power`, with optional surrounding brackets
static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[?([A-Za-z0-9]+?)(?:\^\(?(-?\d+(?:\.\d+)?)\)?)?\]?$").expect("valid regex")
});

/// Factor converting an energy unit to GeV.
pub fn energy_to_gev(unit: &str) -> Result<f64, NuLimitsError> {
    match unit {
        "eV" => Ok(1e-9),
        "keV" => Ok(1e-6),
        "MeV" => Ok(1e-3),
        "GeV" => Ok(1.0),
        "TeV" => Ok(1e3),
        "PeV" => Ok(1e6),
        "EeV" => Ok(1e9),
        _ => Err(NuLimitsError::InvalidUnit(unit.to_string())),
    }
}

/// Convert energies, or log10 energies when `log10` is set, from `unit` to GeV.
pub fn energies_to_gev(values: &[f64], unit: &str, log10: bool) -> Result<Vec<GeV>, NuLimitsError> {
    let factor = energy_to_gev(unit)?;
    Ok(values
        .iter()
        .map(|v| if log10 { 10f64.powf(*v) } else { *v } * factor)
        .collect())
}

/// Factor converting a length unit to cm.
pub fn length_to_cm(unit: &str) -> Result<f64, NuLimitsError> {
    match unit {
        "mm" => Ok(1e-1),
        "cm" => Ok(1.0),
        "m" => Ok(1e2),
        "km" => Ok(1e5),
        _ => Err(NuLimitsError::InvalidUnit(unit.to_string())),
    }
}

/// Factor converting a time unit to seconds.
pub fn time_to_s(unit: &str) -> Result<f64, NuLimitsError> {
    match unit {
        "ns" => Ok(1e-9),
        "us" => Ok(1e-6),
        "ms" => Ok(1e-3),
        "s" => Ok(1.0),
        "min" => Ok(60.0),
        "hr" => Ok(3600.0),
        "day" => Ok(SECONDS_PER_DAY),
        "yr" => Ok(SECONDS_PER_LIVETIME_YEAR),
        _ => Err(NuLimitsError::InvalidUnit(unit.to_string())),
    }
}

/// Factor converting an effective-volume unit to km³·sr.
///
/// Units without a solid-angle factor are volumes averaged over the sky and are multiplied
/// by 4π.
pub fn volume_to_km3sr(unit: &str) -> Result<f64, NuLimitsError> {
    let compact: String = unit
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '^' && *c != '*' && *c != '.')
        .collect();
    match compact.as_str() {
        "km3sr" => Ok(1.0),
        "km3" => Ok(FULL_SKY_SR),
        "m3sr" => Ok(1e-9),
        "m3" => Ok(1e-9 * FULL_SKY_SR),
        "cm3sr" => Ok(1e-15),
        "cm3" => Ok(1e-15 * FULL_SKY_SR),
        _ => Err(NuLimitsError::InvalidUnit(unit.to_string())),
    }
}

/// Factor converting a time-integrated exposure `<volume> <time>` (e.g. `cm3 sr s`) to km³·sr·yr.
///
/// The year is [`SECONDS_PER_YEAR`] long, so that the exposure is turned back into the same
/// number of seconds by [`crate::exposure::total_effective_area`].
pub fn exposure_to_km3sr_yr(unit: &str) -> Result<f64, NuLimitsError> {
    let (volume, time) = unit
        .trim()
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| NuLimitsError::InvalidUnit(unit.to_string()))?;
    Ok(volume_to_km3sr(volume)? * time_to_s(time)? / SECONDS_PER_YEAR)
}

/// Split `unit^power` into its unit and power (power defaults to 1).
pub fn split_unit_token(token: &str) -> Result<(String, f64), NuLimitsError> {
    let caps = UNIT_TOKEN
        .captures(token.trim())
        .ok_or_else(|| NuLimitsError::InvalidUnit(token.to_string()))?;
    let unit = caps[1].to_string();
    let power = match caps.get(2) {
        Some(p) => p
            .as_str()
            .parse::<f64>()
            .map_err(|_| NuLimitsError::InvalidUnit(token.to_string()))?,
        None => 1.0,
    };
    Ok((unit, power))
}

/// Parsed compound flux unit.
///
/// `factor` converts values to GeV^energy_power · cm⁻² · s⁻¹ · sr⁻¹.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxUnit {
    pub factor: f64,
    pub energy_power: f64,
}

/// Parse a flux unit such as `GeV cm^-2 s^-1 sr^-1` or `eV^-1 m^-2 s^-1 sr^-1`.
///
/// Areas must appear to the power −2, time and solid angle to the power −1.
pub fn parse_flux_unit(tokens: &[&str]) -> Result<FluxUnit, NuLimitsError> {
    let mut factor = 1.0;
    let mut energy_power = 0.0;
    for token in tokens {
        let (unit, power) = split_unit_token(token)?;
        if unit.ends_with("eV") {
            energy_power = power;
            factor *= energy_to_gev(&unit)?.powf(power);
        } else if unit.ends_with('m') {
            if power != -2.0 {
                return Err(NuLimitsError::InvalidUnit(format!(
                    "expected [{token}] to be to the -2 power"
                )));
            }
            factor *= length_to_cm(&unit)?.powf(power);
        } else if unit == "sr" {
            if power != -1.0 {
                return Err(NuLimitsError::InvalidUnit(format!(
                    "expected [{token}] to be to the -1 power"
                )));
            }
        } else {
            if power != -1.0 {
                return Err(NuLimitsError::InvalidUnit(format!(
                    "expected [{token}] to be to the -1 power"
                )));
            }
            factor *= time_to_s(&unit)?.powf(power);
        }
    }
    Ok(FluxUnit {
        factor,
        energy_power,
    })
}
