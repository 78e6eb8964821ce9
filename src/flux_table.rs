//! # Published flux and limit tables
//!
//! Reader for the plain-text tables in which experiments publish their limits and models
//! publish their predicted fluxes. A table is a `#` header followed by whitespace separated
//! numeric rows:
//!
//! ```text
//! # data type: differential limit
//! # bins per decade: 1
//! # columns:
//! # energy [eV]
//! # flux [GeV cm^-2 s^-1 sr^-1]
//! 1e17   3.1e-8
//! 1e18   9.4e-9
//! ```
//!
//! Header lines after `columns` describe the data columns in order. A description starting with
//! `energy` names the energy column, `flux` (but not `flux band`) the central values, and
//! descriptions containing `minimum` / `maximum` the band edges. Units in brackets are
//! converted to GeV and cm at load time; the power of energy carried by the flux unit is kept
//! in [`FluxTable::energy_power`] (1 for `E²Φ` tables in `GeV cm^-2 s^-1 sr^-1`, −1 for
//! differential fluxes).
use std::fs;

use camino::Utf8Path;
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt, rest},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::{
    constants::{GeV, ModelFlux},
    nulimits_errors::NuLimitsError,
    units::{energy_to_gev, parse_flux_unit},
};

#[derive(Debug, PartialEq)]
enum HeaderLine<'a> {
    DataType(&'a str),
    BinsPerDecade(f64),
    ColumnsStart,
    Column(&'a str),
}

fn parse_header_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    alt((
        map(
            preceded((tag_no_case("data type:"), space0), rest),
            |s: &str| HeaderLine::DataType(s.trim()),
        ),
        map(
            preceded(
                (tag_no_case("bins per decade"), opt(char(':')), space0),
                double,
            ),
            HeaderLine::BinsPerDecade,
        ),
        map((tag_no_case("column"), rest), |_| HeaderLine::ColumnsStart),
        map(rest, |s: &str| HeaderLine::Column(s.trim())),
    ))
    .parse(input)
}

fn parse_row(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list1(space1, double), space0)).parse(input)
}

/// Series ready to be drawn on an `E^p Φ` plot, in GeV and `GeV^(p-1) cm^-2 s^-1 sr^-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub energies: Vec<GeV>,
    pub values: Vec<f64>,
    pub band_min: Option<Vec<f64>>,
    pub band_max: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluxTable {
    data_type: String,
    bins_per_decade: Option<f64>,
    energy_power: f64,
    energies: Vec<GeV>,
    fluxes: Vec<f64>,
    band_min: Option<Vec<f64>>,
    band_max: Option<Vec<f64>>,
}

#[derive(Default)]
struct ColumnLayout {
    energy: Option<(usize, f64)>,
    flux: Option<(usize, f64, f64)>,
    minimum: Option<usize>,
    maximum: Option<usize>,
}

impl ColumnLayout {
    fn describe(&mut self, index: usize, description: &str) -> Result<(), NuLimitsError> {
        let words: Vec<&str> = description.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Ok(());
        };
        let first = first.to_lowercase();

        if first == "energy" {
            let unit = words
                .get(1)
                .map(|w| w.trim_start_matches('[').trim_end_matches(']'))
                .ok_or_else(|| NuLimitsError::InvalidUnit(description.to_string()))?;
            self.energy = Some((index, energy_to_gev(unit)?));
        } else if first == "flux" && words.get(1).map(|w| w.to_lowercase()) != Some("band".into())
        {
            let unit = parse_flux_unit(&words[1..])?;
            self.flux = Some((index, unit.factor, unit.energy_power));
        } else if words.contains(&"minimum") {
            self.minimum = Some(index);
        } else if words.contains(&"maximum") {
            self.maximum = Some(index);
        }
        Ok(())
    }
}

fn column(rows: &[Vec<f64>], index: usize, factor: f64) -> Result<Vec<f64>, NuLimitsError> {
    rows.iter()
        .map(|row| {
            row.get(index).map(|v| v * factor).ok_or_else(|| {
                NuLimitsError::MissingColumn(format!("column {index} in row {row:?}"))
            })
        })
        .collect()
}

impl FluxTable {
    /// Parse a table from its text content.
    pub fn parse(content: &str) -> Result<Self, NuLimitsError> {
        let mut data_type = String::new();
        let mut bins_per_decade = None;
        let mut layout = ColumnLayout::default();
        let mut next_column = 0;
        let mut rows = Vec::new();

        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

        for line in lines.by_ref() {
            let Some(header) = line.strip_prefix('#') else {
                rows.push(parse_data_line(line)?);
                break;
            };
            let header = header.trim_start_matches('#').trim();
            if header.is_empty() {
                continue;
            }
            let index = next_column;
            next_column += 1;

            let (_, parsed) = parse_header_line(header)
                .map_err(|_| NuLimitsError::NomParsingError(line.to_string()))?;
            match parsed {
                HeaderLine::DataType(kind) => data_type = kind.to_lowercase(),
                HeaderLine::BinsPerDecade(bpd) => bins_per_decade = Some(bpd),
                HeaderLine::ColumnsStart => next_column = 0,
                HeaderLine::Column(description) => layout.describe(index, description)?,
            }
        }

        for line in lines.filter(|l| !l.starts_with('#')) {
            rows.push(parse_data_line(line)?);
        }

        let (energy_col, energy_factor) = layout
            .energy
            .ok_or_else(|| NuLimitsError::MissingColumn("energy [<unit>]".into()))?;
        let (flux_col, flux_factor, energy_power) = layout
            .flux
            .ok_or_else(|| NuLimitsError::MissingColumn("flux [<unit>]".into()))?;

        Ok(FluxTable {
            data_type,
            bins_per_decade,
            energy_power,
            energies: column(&rows, energy_col, energy_factor)?,
            fluxes: column(&rows, flux_col, flux_factor)?,
            band_min: layout
                .minimum
                .map(|i| column(&rows, i, flux_factor))
                .transpose()?,
            band_max: layout
                .maximum
                .map(|i| column(&rows, i, flux_factor))
                .transpose()?,
        })
    }

    pub fn from_file(path: &Utf8Path) -> Result<Self, NuLimitsError> {
        let content = fs::read_to_string(path)?;
        FluxTable::parse(&content)
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Whether the table holds an experimental limit (rescaled by binning when plotted).
    pub fn is_limit(&self) -> bool {
        self.data_type.contains("limit")
    }

    pub fn bins_per_decade(&self) -> Option<f64> {
        self.bins_per_decade
    }

    /// Power of GeV in the flux unit (`GeV^p cm^-2 s^-1 sr^-1`).
    pub fn energy_power(&self) -> f64 {
        self.energy_power
    }

    pub fn energies(&self) -> &[GeV] {
        &self.energies
    }

    /// Flux column in `GeV^energy_power cm^-2 s^-1 sr^-1`.
    pub fn fluxes(&self) -> &[f64] {
        &self.fluxes
    }

    pub fn band_min(&self) -> Option<&[f64]> {
        self.band_min.as_deref()
    }

    pub fn band_max(&self) -> Option<&[f64]> {
        self.band_max.as_deref()
    }

    /// Differential flux Φ(E) in cm⁻²·s⁻¹·sr⁻¹·GeV⁻¹.
    pub fn differential_fluxes(&self) -> Vec<ModelFlux> {
        self.energies
            .iter()
            .zip(&self.fluxes)
            .map(|(e, f)| f / e.powf(self.energy_power + 1.0))
            .collect()
    }

    /// Rescale the table for an `E^e_power Φ` plot drawn with `target_bins_per_decade`.
    ///
    /// Limits are multiplied by `target_bins_per_decade / bins_per_decade`; model fluxes are not
    /// binned and keep their values.
    pub fn to_plot_units(
        &self,
        e_power: i32,
        target_bins_per_decade: f64,
    ) -> Result<PlotSeries, NuLimitsError> {
        check_energy_power(e_power)?;

        let binning = if self.is_limit() {
            let bpd = self.bins_per_decade.ok_or_else(|| {
                NuLimitsError::MissingColumn(format!(
                    "bins per decade for {} table",
                    self.data_type
                ))
            })?;
            target_bins_per_decade / bpd
        } else {
            1.0
        };

        let power = e_power as f64 - 1.0 - self.energy_power;
        let rescale = |values: &[f64]| -> Vec<f64> {
            self.energies
                .iter()
                .zip(values)
                .map(|(e, v)| v * e.powf(power) * binning)
                .collect()
        };

        Ok(PlotSeries {
            energies: self.energies.clone(),
            values: rescale(&self.fluxes),
            band_min: self.band_min.as_deref().map(rescale),
            band_max: self.band_max.as_deref().map(rescale),
        })
    }
}

fn parse_data_line(line: &str) -> Result<Vec<f64>, NuLimitsError> {
    parse_row(line)
        .map(|(_, row)| row)
        .map_err(|_| NuLimitsError::NomParsingError(line.to_string()))
}

pub(crate) fn check_energy_power(e_power: i32) -> Result<(), NuLimitsError> {
    match e_power {
        1 | 2 => Ok(()),
        _ => Err(NuLimitsError::InvalidEnergyPower(e_power)),
    }
}

#[cfg(test)]
mod flux_table_test {
    use super::*;
    use approx::assert_relative_eq;

    const LIMIT_TABLE: &str = "\
# data type: differential limit
# bins per decade: 1

# columns:
# energy [eV]
# flux [GeV cm^-2 s^-1 sr^-1]
1e17   4e-8
1e18   1e-8
1e19   2e-8
";

    const MODEL_TABLE: &str = "\
# data type: model
# columns
# energy [GeV]
# flux [GeV^-1 m^-2 s^-1 sr^-1]
# flux band minimum
# flux band maximum
1e8  1e-20  5e-21  2e-20
1e9  1e-23  5e-24  2e-23
";

    #[test]
    fn test_parse_header_line() {
        assert_eq!(
            parse_header_line("data type: Differential Limit").unwrap().1,
            HeaderLine::DataType("Differential Limit")
        );
        assert_eq!(
            parse_header_line("bins per decade: 2").unwrap().1,
            HeaderLine::BinsPerDecade(2.0)
        );
        assert_eq!(
            parse_header_line("columns:").unwrap().1,
            HeaderLine::ColumnsStart
        );
        assert_eq!(
            parse_header_line("energy [eV]").unwrap().1,
            HeaderLine::Column("energy [eV]")
        );
    }

    #[test]
    fn test_parse_limit_table() {
        let table = FluxTable::parse(LIMIT_TABLE).unwrap();
        assert!(table.is_limit());
        assert_eq!(table.bins_per_decade(), Some(1.0));
        assert_eq!(table.energy_power(), 1.0);
        assert_relative_eq!(table.energies()[0], 1e8, max_relative = 1e-12);
        assert_eq!(table.fluxes(), &[4e-8, 1e-8, 2e-8]);
        assert!(table.band_min().is_none());

        let phi = table.differential_fluxes();
        assert_relative_eq!(phi[1], 1e-8 / 1e18, max_relative = 1e-12);
    }

    #[test]
    fn test_parse_model_table_with_band() {
        let table = FluxTable::parse(MODEL_TABLE).unwrap();
        assert!(!table.is_limit());
        assert_eq!(table.energy_power(), -1.0);
        // m^-2 → cm^-2
        assert_relative_eq!(table.fluxes()[0], 1e-24, max_relative = 1e-12);
        assert_relative_eq!(table.band_min().unwrap()[1], 5e-28, max_relative = 1e-12);
        assert_relative_eq!(table.band_max().unwrap()[1], 2e-27, max_relative = 1e-12);
    }

    #[test]
    fn test_plot_units() {
        let table = FluxTable::parse(LIMIT_TABLE).unwrap();

        // already E²Φ, only the binning changes
        let e2 = table.to_plot_units(2, 2.0).unwrap();
        assert_relative_eq!(e2.values[0], 8e-8, max_relative = 1e-12);

        let e1 = table.to_plot_units(1, 1.0).unwrap();
        assert_relative_eq!(e1.values[1], 1e-8 / 1e9, max_relative = 1e-12);

        let model = FluxTable::parse(MODEL_TABLE).unwrap();
        let e2 = model.to_plot_units(2, 10.0).unwrap();
        assert_relative_eq!(e2.values[0], 1e-24 * 1e16, max_relative = 1e-12);
        assert_relative_eq!(
            e2.band_max.unwrap()[0],
            2e-24 * 1e16,
            max_relative = 1e-12
        );

        assert_eq!(
            table.to_plot_units(3, 1.0).unwrap_err(),
            NuLimitsError::InvalidEnergyPower(3)
        );
    }

    #[test]
    fn test_parse_errors() {
        let no_flux = "# columns\n# energy [eV]\n1e17\n";
        assert_eq!(
            FluxTable::parse(no_flux).unwrap_err(),
            NuLimitsError::MissingColumn("flux [<unit>]".into())
        );

        let bad_row = "# columns\n# energy [eV]\n# flux [GeV cm^-2 s^-1 sr^-1]\n1e17 abc\n";
        assert_eq!(
            FluxTable::parse(bad_row).unwrap_err(),
            NuLimitsError::NomParsingError("1e17 abc".into())
        );

        let bad_unit = "# columns\n# energy [ergs]\n# flux [GeV cm^-2 s^-1 sr^-1]\n1 1\n";
        assert_eq!(
            FluxTable::parse(bad_unit).unwrap_err(),
            NuLimitsError::InvalidUnit("ergs".into())
        );

        let short_row = "# columns\n# energy [eV]\n# flux [GeV cm^-2 s^-1 sr^-1]\n1e17\n";
        assert!(matches!(
            FluxTable::parse(short_row).unwrap_err(),
            NuLimitsError::MissingColumn(_)
        ));
    }
}
