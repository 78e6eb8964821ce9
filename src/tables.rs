//! # Effective-volume tables
//!
//! [`VeffTable`] pairs an energy list (GeV) with effective volumes (km³·sr, full solid angle
//! included). Tables come from the embedded datasets ([`crate::datasets`]) or from files:
//!
//! * **CSV** – one header row naming the columns with their units, e.g.
//!   `log10 energy [eV], veff [km3]` or `energy [GeV], veff [km3 sr]`.
//! * **JSON** – `{"energy": [...], "veff": [...], "energy_unit": "eV", "veff_unit": "km3"}`;
//!   units default to GeV and km³·sr, `"log10_energy": true` marks log10 energies.
//!
//! Units are converted once, at load time; everything downstream sees GeV and km³·sr.
use std::fs::File;

use camino::Utf8Path;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::{
    constants::{GeV, Km3Sr},
    energy_grid::EnergyGrid,
    nulimits_errors::NuLimitsError,
    units::{energies_to_gev, volume_to_km3sr},
};

static ENERGY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(log10\s*)?(?:energy|e)\s*\[\s*([A-Za-z]+)\s*\]\s*$").expect("valid regex")
});

static VEFF_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*veff\s*\[\s*([^\]]+?)\s*\]\s*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct VeffTable {
    energies: Vec<GeV>,
    veffs: Vec<Km3Sr>,
}

impl VeffTable {
    /// Build a table from energies (GeV) and effective volumes (km³·sr) of equal length.
    pub fn new(energies: Vec<GeV>, veffs: Vec<Km3Sr>) -> Result<Self, NuLimitsError> {
        if energies.len() != veffs.len() {
            return Err(NuLimitsError::LengthMismatch {
                energies: energies.len(),
                veffs: veffs.len(),
            });
        }
        Ok(VeffTable { energies, veffs })
    }

    /// Build a table from values in arbitrary units.
    ///
    /// Arguments
    /// -----------------
    /// * `energies`: energies, or log10 energies when `log10_energy` is set.
    /// * `energy_unit`: unit of `10^x` or `x` (eV, GeV, ...).
    /// * `veffs`: volumes in `veff_unit` (km3sr, km3, ...).
    pub fn from_units(
        energies: &[f64],
        energy_unit: &str,
        log10_energy: bool,
        veffs: &[f64],
        veff_unit: &str,
    ) -> Result<Self, NuLimitsError> {
        let energies = energies_to_gev(energies, energy_unit, log10_energy)?;
        let v_factor = volume_to_km3sr(veff_unit)?;
        VeffTable::new(energies, veffs.iter().map(|v| v * v_factor).collect())
    }

    /// Read a CSV table whose header names the energy and veff columns with units.
    pub fn from_csv(path: &Utf8Path) -> Result<Self, NuLimitsError> {
        let file = File::open(path)?;
        VeffTable::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, NuLimitsError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let headers = reader.headers()?.clone();

        let (energy_col, log10_energy, energy_unit) = headers
            .iter()
            .enumerate()
            .find_map(|(i, h)| {
                ENERGY_HEADER
                    .captures(h)
                    .map(|c| (i, c.get(1).is_some(), c[2].to_string()))
            })
            .ok_or_else(|| NuLimitsError::MissingColumn("energy [<unit>]".into()))?;

        let (veff_col, veff_unit) = headers
            .iter()
            .enumerate()
            .find_map(|(i, h)| VEFF_HEADER.captures(h).map(|c| (i, c[1].to_string())))
            .ok_or_else(|| NuLimitsError::MissingColumn("veff [<unit>]".into()))?;

        let mut energies = Vec::new();
        let mut veffs = Vec::new();
        for record in reader.records() {
            let record = record?;
            energies.push(parse_field(record.get(energy_col))?);
            veffs.push(parse_field(record.get(veff_col))?);
        }

        VeffTable::from_units(&energies, &energy_unit, log10_energy, &veffs, &veff_unit)
    }

    /// Read a JSON table (see the module documentation for the schema).
    pub fn from_json(path: &Utf8Path) -> Result<Self, NuLimitsError> {
        let file = File::open(path)?;
        let raw: JsonVeffTable = serde_json::from_reader(std::io::BufReader::new(file))?;
        raw.into_table()
    }

    pub fn from_json_str(json: &str) -> Result<Self, NuLimitsError> {
        let raw: JsonVeffTable = serde_json::from_str(json)?;
        raw.into_table()
    }

    pub fn energies(&self) -> &[GeV] {
        &self.energies
    }

    pub fn veffs(&self) -> &[Km3Sr] {
        &self.veffs
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Validate the energies as a log-uniform grid.
    pub fn grid(&self) -> Result<EnergyGrid, NuLimitsError> {
        EnergyGrid::new(self.energies.clone())
    }

    /// Multiply every volume by `factor` (e.g. a number of stations or a livetime).
    pub fn scaled(&self, factor: f64) -> VeffTable {
        VeffTable {
            energies: self.energies.clone(),
            veffs: self.veffs.iter().map(|v| v * factor).collect(),
        }
    }

    /// Whether both tables share the same energies, up to float rounding.
    pub fn same_energies(&self, other: &VeffTable) -> bool {
        self.energies.len() == other.energies.len()
            && self
                .energies
                .iter()
                .zip(&other.energies)
                .all(|(a, b)| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()))
    }
}

fn parse_field(field: Option<&str>) -> Result<f64, NuLimitsError> {
    let field = field.ok_or_else(|| NuLimitsError::InvalidValue("missing field".into()))?;
    field
        .parse::<f64>()
        .map_err(|_| NuLimitsError::InvalidValue(field.to_string()))
}

fn default_energy_unit() -> String {
    "GeV".to_string()
}

fn default_veff_unit() -> String {
    "km3sr".to_string()
}

#[derive(Debug, Deserialize)]
struct JsonVeffTable {
    energy: Vec<f64>,
    veff: Vec<f64>,
    #[serde(default = "default_energy_unit")]
    energy_unit: String,
    #[serde(default = "default_veff_unit")]
    veff_unit: String,
    #[serde(default)]
    log10_energy: bool,
}

impl JsonVeffTable {
    fn into_table(self) -> Result<VeffTable, NuLimitsError> {
        VeffTable::from_units(
            &self.energy,
            &self.energy_unit,
            self.log10_energy,
            &self.veff,
            &self.veff_unit,
        )
    }
}

#[cfg(test)]
mod tables_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            VeffTable::new(vec![1.0, 2.0], vec![1.0]).unwrap_err(),
            NuLimitsError::LengthMismatch {
                energies: 2,
                veffs: 1
            }
        );
    }

    #[test]
    fn test_csv_log10_ev_km3() {
        let csv = "log10 energy [eV], veff [km3]\n16.0, 1.0\n16.5, 2.0\n17.0, 4.0\n";
        let table = VeffTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_relative_eq!(table.energies()[0], 1e7, max_relative = 1e-12);
        assert_relative_eq!(table.energies()[2], 1e8, max_relative = 1e-12);
        assert_relative_eq!(table.veffs()[1], 2.0 * 4.0 * PI, max_relative = 1e-12);
        assert!(table.grid().is_ok());
    }

    #[test]
    fn test_csv_extra_columns_and_comments() {
        let csv = "# single station\nindex,energy [GeV],veff [km3 sr],note\n0,1e7,0.5,a\n1,1e8,1.5,b\n";
        let table = VeffTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.energies(), &[1e7, 1e8]);
        assert_eq!(table.veffs(), &[0.5, 1.5]);
    }

    #[test]
    fn test_csv_errors() {
        let csv = "energy [GeV], volume\n1e7, 0.5\n";
        assert_eq!(
            VeffTable::from_csv_reader(csv.as_bytes()).unwrap_err(),
            NuLimitsError::MissingColumn("veff [<unit>]".into())
        );

        let csv = "energy [GeV], veff [km3sr]\n1e7, lots\n";
        assert_eq!(
            VeffTable::from_csv_reader(csv.as_bytes()).unwrap_err(),
            NuLimitsError::InvalidValue("lots".into())
        );

        let csv = "energy [furlong], veff [km3sr]\n1e7, 1\n";
        assert_eq!(
            VeffTable::from_csv_reader(csv.as_bytes()).unwrap_err(),
            NuLimitsError::InvalidUnit("furlong".into())
        );
    }

    #[test]
    fn test_json_table() {
        let json = r#"{"energy": [1e16, 1e17], "veff": [0.1, 0.2], "energy_unit": "eV"}"#;
        let table = VeffTable::from_json_str(json).unwrap();
        assert_relative_eq!(table.energies()[1], 1e8, max_relative = 1e-12);
        assert_eq!(table.veffs(), &[0.1, 0.2]);

        let json = r#"{"energy": [1e7], "veff": [0.1, 0.2]}"#;
        assert!(matches!(
            VeffTable::from_json_str(json).unwrap_err(),
            NuLimitsError::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_scaled_and_same_energies() {
        let table = VeffTable::new(vec![1e7, 1e8], vec![1.0, 2.0]).unwrap();
        let scaled = table.scaled(8.0);
        assert_eq!(scaled.veffs(), &[8.0, 16.0]);
        assert!(table.same_energies(&scaled));

        let shifted = VeffTable::new(vec![1e7, 2e8], vec![1.0, 2.0]).unwrap();
        assert!(!table.same_energies(&shifted));
    }
}
