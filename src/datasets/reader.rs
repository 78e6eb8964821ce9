//! nom parsers for the embedded `.veff`, `.livetime` and `.exposure` files.
//!
//! Both formats are line based; lines starting with `!` are comments.
//!
//! ```text
//! ! title
//! energy: log10 eV
//! veff: km3
//! stations: 35
//! 16.0     1.4207e-2
//! ```
//!
//! ```text
//! s11: 375
//! ```
//!
//! ```text
//! energy: log10 eV
//! exposure: cm3 sr s
//! energies: 16.5 17.0
//! 2024: 8.591e+20 8.472e+21
//! ```
use hifitime::Duration;
use nom::{
    bytes::complete::{take_while1, tag_no_case},
    character::complete::{char, space0, space1},
    combinator::{all_consuming, opt, rest},
    multi::separated_list1,
    number::complete::double,
    sequence::{preceded, separated_pair, terminated},
    IResult, Parser,
};

use crate::{
    exposure::YearlyExposure,
    nulimits_errors::NuLimitsError,
    tables::VeffTable,
    time::days,
    units::{energies_to_gev, exposure_to_km3sr_yr},
};

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_while1(is_key_char), (char(':'), space0), rest).parse(input)
}

fn parse_pair(input: &str) -> IResult<&str, (f64, f64)> {
    all_consuming(terminated(separated_pair(double, space1, double), space0)).parse(input)
}

fn parse_livetime_line(input: &str) -> IResult<&str, (&str, f64)> {
    all_consuming(terminated(
        separated_pair(take_while1(is_key_char), (char(':'), space0), double),
        space0,
    ))
    .parse(input)
}

fn parse_values(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(separated_list1(space1, double), space0)).parse(input)
}

/// `log10 <unit>` or `<unit>`
fn parse_energy_unit(input: &str) -> IResult<&str, (bool, &str)> {
    (
        opt(terminated(tag_no_case("log10"), space1)).map(|log| log.is_some()),
        preceded(space0, rest),
    )
        .parse(input)
}

fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('!'))
}

/// Parse a `.veff` file into a table in GeV and km³·sr per station.
pub(super) fn parse_veff_file(content: &str) -> Result<VeffTable, NuLimitsError> {
    let mut energy_unit = None;
    let mut veff_unit = None;
    let mut stations = 1.0;
    let mut energies = Vec::new();
    let mut veffs = Vec::new();

    for line in content_lines(content) {
        if let Ok((_, (energy, veff))) = parse_pair(line) {
            energies.push(energy);
            veffs.push(veff);
            continue;
        }

        let (_, (key, value)) =
            parse_key_value(line).map_err(|_| NuLimitsError::NomParsingError(line.to_string()))?;
        match key {
            "energy" => {
                let (_, unit) = parse_energy_unit(value)
                    .map_err(|_| NuLimitsError::NomParsingError(line.to_string()))?;
                energy_unit = Some(unit);
            }
            "veff" => veff_unit = Some(value.trim()),
            "stations" => {
                stations = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| NuLimitsError::InvalidValue(value.to_string()))?
            }
            _ => return Err(NuLimitsError::NomParsingError(line.to_string())),
        }
    }

    let (log10_energy, energy_unit) =
        energy_unit.ok_or_else(|| NuLimitsError::MissingColumn("energy".into()))?;
    let veff_unit = veff_unit.ok_or_else(|| NuLimitsError::MissingColumn("veff".into()))?;

    let table = VeffTable::from_units(&energies, energy_unit, log10_energy, &veffs, veff_unit)?;
    Ok(table.scaled(1.0 / stations))
}

/// Parse a `.livetime` file: one `name: days` entry per line.
pub(super) fn parse_livetime_file(content: &str) -> Result<Vec<(String, Duration)>, NuLimitsError> {
    content_lines(content)
        .map(|line| {
            parse_livetime_line(line)
                .map(|(_, (key, value))| (key.to_string(), days(value)))
                .map_err(|_| NuLimitsError::NomParsingError(line.to_string()))
        })
        .collect()
}

/// Parse an `.exposure` file: a header with units and the energy grid, then one
/// `year: exposures...` row per year.
pub(super) fn parse_exposure_file(content: &str) -> Result<YearlyExposure, NuLimitsError> {
    let mut energy_unit = None;
    let mut exposure_unit = None;
    let mut energies = None;
    let mut rows = Vec::new();

    for line in content_lines(content) {
        let parse_error = || NuLimitsError::NomParsingError(line.to_string());
        let (_, (key, value)) = parse_key_value(line).map_err(|_| parse_error())?;
        match key {
            "energy" => energy_unit = Some(parse_energy_unit(value).map_err(|_| parse_error())?.1),
            "exposure" => exposure_unit = Some(value.trim()),
            "energies" => energies = Some(parse_values(value).map_err(|_| parse_error())?.1),
            year => {
                let year = year.parse::<i32>().map_err(|_| parse_error())?;
                let (_, exposures) = parse_values(value).map_err(|_| parse_error())?;
                rows.push((year, exposures));
            }
        }
    }

    let (log10_energy, energy_unit) =
        energy_unit.ok_or_else(|| NuLimitsError::MissingColumn("energy".into()))?;
    let exposure_unit =
        exposure_unit.ok_or_else(|| NuLimitsError::MissingColumn("exposure".into()))?;
    let energies = energies.ok_or_else(|| NuLimitsError::MissingColumn("energies".into()))?;

    let factor = exposure_to_km3sr_yr(exposure_unit)?;
    let rows = rows
        .into_iter()
        .map(|(year, exposures)| (year, exposures.iter().map(|e| e * factor).collect()))
        .collect();
    YearlyExposure::new(energies_to_gev(&energies, energy_unit, log10_energy)?, rows)
}

#[cfg(test)]
mod reader_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::Unit;
    use std::f64::consts::PI;

    #[test]
    fn test_parse_energy_unit() {
        assert_eq!(parse_energy_unit("log10 eV").unwrap().1, (true, "eV"));
        assert_eq!(parse_energy_unit("GeV").unwrap().1, (false, "GeV"));
    }

    #[test]
    fn test_parse_veff_file() {
        let content = "! test\nenergy: log10 eV\nveff: km3\nstations: 2\n16.0 1.0\n17.0   4.0\n";
        let table = parse_veff_file(content).unwrap();
        assert_relative_eq!(table.energies()[0], 1e7, max_relative = 1e-12);
        assert_relative_eq!(table.energies()[1], 1e8, max_relative = 1e-12);
        assert_relative_eq!(table.veffs()[1], 2.0 * 4.0 * PI, max_relative = 1e-12);
    }

    #[test]
    fn test_parse_veff_file_errors() {
        assert_eq!(
            parse_veff_file("veff: km3\n16.0 1.0\n").unwrap_err(),
            NuLimitsError::MissingColumn("energy".into())
        );
        assert_eq!(
            parse_veff_file("energy: eV\nveff: km3\ncolor: blue\n").unwrap_err(),
            NuLimitsError::NomParsingError("color: blue".into())
        );
        assert_eq!(
            parse_veff_file("energy: eV\nveff: km3\n1e16 1.0 2.0\n").unwrap_err(),
            NuLimitsError::NomParsingError("1e16 1.0 2.0".into())
        );
    }

    #[test]
    fn test_parse_livetime_file() {
        let entries = parse_livetime_file("! days\ns11: 375\ns14: 0\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "s11");
        assert_relative_eq!(entries[0].1.to_unit(Unit::Day), 375.0, max_relative = 1e-12);
        assert_eq!(entries[1].1.to_seconds(), 0.0);

        assert!(parse_livetime_file("s11 375\n").is_err());
    }

    #[test]
    fn test_parse_exposure_file() {
        let content = "! yearly\nenergy: log10 eV\nexposure: km3 sr yr\nenergies: 16.0 17.0\n\
                       2024: 1.0 2.0\n2025:  3.0   4.0\n";
        let schedule = parse_exposure_file(content).unwrap();
        assert_relative_eq!(schedule.energies()[1], 1e8, max_relative = 1e-12);
        assert_eq!(schedule.years().collect::<Vec<_>>(), vec![2024, 2025]);
        // file years have 365 days
        assert_relative_eq!(
            schedule.exposure(2025).unwrap()[1],
            4.0 * 365.0 / 365.25,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_parse_exposure_file_errors() {
        assert_eq!(
            parse_exposure_file("energy: eV\nenergies: 1e16\n2024: 1.0\n").unwrap_err(),
            NuLimitsError::MissingColumn("exposure".into())
        );
        assert_eq!(
            parse_exposure_file("energy: eV\nexposure: cm3 sr s\nenergies: 1e16\nlast: 1.0\n")
                .unwrap_err(),
            NuLimitsError::NomParsingError("last: 1.0".into())
        );
        assert_eq!(
            parse_exposure_file("energy: eV\nexposure: cm3 sr s\nenergies: 1e16\n2024: 1.0 x\n")
                .unwrap_err(),
            NuLimitsError::NomParsingError("2024: 1.0 x".into())
        );
        assert!(matches!(
            parse_exposure_file("energy: eV\nexposure: cm3 sr s\nenergies: 1e16 1e17\n2024: 1.0\n"),
            Err(NuLimitsError::LengthMismatch { .. })
        ));
    }
}
