//! # Built-in effective volumes and livetimes
//!
//! Published single-station effective volumes and accumulated livetimes, embedded in the crate
//! and parsed on first use. Each table is parsed once per process and shared afterwards.
//!
//! ## Effective volumes
//!
//! [`VeffDataset`] names one table per trigger configuration:
//!
//! | Name | Source | Energies (log10 eV) |
//! |------|--------|---------------------|
//! | `hilo`, `pa`, `didaq` | 2025 review simulations | 16.0 – 21.0 |
//! | `wp`, `deep_high_low_1Hz`, `simple_threshold_*` | 2025 proposal | 16.5 – 20.0 |
//! | `SMT_Martin` | 2024 proposal, single-station simulation | 16.0 – 20.0 |
//! | `SMT` | 2024 proposal, estimate | 17.0 – 20.0 |
//! | `PA` | white-paper 35-station array, per station | 16.0 – 20.0 |
//! | `arasim` | ARA station at 200 m | 16.5 – 20.0 |
//! | `SMT_2023` | 2023 single-station SMT | 16.0 – 20.0 |
//!
//! Every table is returned in GeV and km³·sr per station, ready for
//! [`compute_limit`](crate::limit::compute_limit):
//!
//! ```rust
//! use nulimits::{datasets::VeffDataset, limit::compute_limit};
//!
//! let smt = VeffDataset::SmtMartin.table().unwrap();
//! let limits = compute_limit(smt.energies(), smt.veffs(), 8.0, 1.0, 2.44).unwrap();
//! assert_eq!(limits.len(), smt.len());
//! ```
//!
//! ## Livetimes
//!
//! [`LivetimeTable`] holds the accumulated livetime per station (`Rnog2024`) or per trigger
//! (`Rnog2025`), as [`hifitime::Duration`].
//!
//! ## Exposure schedules
//!
//! [`ExposureSchedule`] holds the exposure accumulated by the end of each year of a deployment
//! plan, in km³·sr·yr on the 16.5 – 20.0 grid. `Rnog2025` covers 2024 – 2040 with the deep hi/lo
//! trigger.
mod reader;

use std::str::FromStr;

use hifitime::Duration;
use once_cell::sync::OnceCell;

use crate::{
    constants::Years, exposure::YearlyExposure, nulimits_errors::NuLimitsError,
    tables::VeffTable, time::duration_to_years, time::total_livetime,
};
use reader::{parse_exposure_file, parse_livetime_file, parse_veff_file};

static HILO: &str = include_str!("data/hilo.veff");
static PA: &str = include_str!("data/pa.veff");
static DIDAQ: &str = include_str!("data/didaq.veff");
static WP: &str = include_str!("data/wp.veff");
static DEEP_HIGH_LOW_1HZ: &str = include_str!("data/deep_high_low_1Hz.veff");
static SIMPLE_THRESHOLD_2: &str = include_str!("data/simple_threshold_2.veff");
static SIMPLE_THRESHOLD_2_5: &str = include_str!("data/simple_threshold_2.5.veff");
static SIMPLE_THRESHOLD_2_5_DOWNSAMPLED: &str =
    include_str!("data/simple_threshold_2.5_downsampled.veff");
static SIMPLE_THRESHOLD_3_DOWNSAMPLED: &str =
    include_str!("data/simple_threshold_3_downsampled.veff");
static SMT_MARTIN: &str = include_str!("data/smt_martin.veff");
static SMT: &str = include_str!("data/smt.veff");
static PA_WHITE_PAPER: &str = include_str!("data/pa_white_paper.veff");
static ARASIM: &str = include_str!("data/arasim.veff");
static SMT_2023: &str = include_str!("data/smt_2023.veff");

static RNOG_2024: &str = include_str!("data/rnog_2024.livetime");
static RNOG_2025: &str = include_str!("data/rnog_2025.livetime");

static RNOG_2025_YEARLY: &str = include_str!("data/rnog_2025_yearly.exposure");

const DATASET_COUNT: usize = 14;

static VEFF_TABLES: [OnceCell<VeffTable>; DATASET_COUNT] =
    [const { OnceCell::new() }; DATASET_COUNT];

static LIVETIMES: [OnceCell<Vec<(String, Duration)>>; 2] = [const { OnceCell::new() }; 2];

static SCHEDULES: [OnceCell<YearlyExposure>; 1] = [const { OnceCell::new() }; 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeffDataset {
    Hilo,
    Pa,
    Didaq,
    Wp,
    DeepHighLow1Hz,
    SimpleThreshold2,
    SimpleThreshold2p5,
    SimpleThreshold2p5Downsampled,
    SimpleThreshold3Downsampled,
    SmtMartin,
    Smt,
    PaWhitePaper,
    AraSim,
    Smt2023,
}

impl VeffDataset {
    pub const ALL: [VeffDataset; DATASET_COUNT] = [
        VeffDataset::Hilo,
        VeffDataset::Pa,
        VeffDataset::Didaq,
        VeffDataset::Wp,
        VeffDataset::DeepHighLow1Hz,
        VeffDataset::SimpleThreshold2,
        VeffDataset::SimpleThreshold2p5,
        VeffDataset::SimpleThreshold2p5Downsampled,
        VeffDataset::SimpleThreshold3Downsampled,
        VeffDataset::SmtMartin,
        VeffDataset::Smt,
        VeffDataset::PaWhitePaper,
        VeffDataset::AraSim,
        VeffDataset::Smt2023,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VeffDataset::Hilo => "hilo",
            VeffDataset::Pa => "pa",
            VeffDataset::Didaq => "didaq",
            VeffDataset::Wp => "wp",
            VeffDataset::DeepHighLow1Hz => "deep_high_low_1Hz",
            VeffDataset::SimpleThreshold2 => "simple_threshold_2",
            VeffDataset::SimpleThreshold2p5 => "simple_threshold_2.5",
            VeffDataset::SimpleThreshold2p5Downsampled => "simple_threshold_2.5_downsampled",
            VeffDataset::SimpleThreshold3Downsampled => "simple_threshold_3_downsampled",
            VeffDataset::SmtMartin => "SMT_Martin",
            VeffDataset::Smt => "SMT",
            VeffDataset::PaWhitePaper => "PA",
            VeffDataset::AraSim => "arasim",
            VeffDataset::Smt2023 => "SMT_2023",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            VeffDataset::Hilo => HILO,
            VeffDataset::Pa => PA,
            VeffDataset::Didaq => DIDAQ,
            VeffDataset::Wp => WP,
            VeffDataset::DeepHighLow1Hz => DEEP_HIGH_LOW_1HZ,
            VeffDataset::SimpleThreshold2 => SIMPLE_THRESHOLD_2,
            VeffDataset::SimpleThreshold2p5 => SIMPLE_THRESHOLD_2_5,
            VeffDataset::SimpleThreshold2p5Downsampled => SIMPLE_THRESHOLD_2_5_DOWNSAMPLED,
            VeffDataset::SimpleThreshold3Downsampled => SIMPLE_THRESHOLD_3_DOWNSAMPLED,
            VeffDataset::SmtMartin => SMT_MARTIN,
            VeffDataset::Smt => SMT,
            VeffDataset::PaWhitePaper => PA_WHITE_PAPER,
            VeffDataset::AraSim => ARASIM,
            VeffDataset::Smt2023 => SMT_2023,
        }
    }

    /// Effective volume of one station, in GeV and km³·sr.
    ///
    /// The embedded file is parsed on the first call and cached for the lifetime of the process.
    ///
    /// Return
    /// ----------
    /// * The cached table, or a parsing error if the embedded file is malformed.
    pub fn table(&self) -> Result<&'static VeffTable, NuLimitsError> {
        VEFF_TABLES[*self as usize].get_or_try_init(|| {
            log::debug!("parsing effective volume dataset {}", self.name());
            parse_veff_file(self.source())
        })
    }
}

impl FromStr for VeffDataset {
    type Err = NuLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VeffDataset::ALL
            .into_iter()
            .find(|dataset| dataset.name() == s)
            .ok_or_else(|| NuLimitsError::UnknownDataset(s.to_string()))
    }
}

impl std::fmt::Display for VeffDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LivetimeTable {
    /// Per-station livetime of the first eight stations, 2024
    Rnog2024,
    /// Per-trigger livetime: hi/lo from 2021-2024, phased array from 2025
    Rnog2025,
}

impl LivetimeTable {
    fn source(&self) -> &'static str {
        match self {
            LivetimeTable::Rnog2024 => RNOG_2024,
            LivetimeTable::Rnog2025 => RNOG_2025,
        }
    }

    /// All `(name, livetime)` entries, in file order.
    pub fn entries(&self) -> Result<&'static [(String, Duration)], NuLimitsError> {
        LIVETIMES[*self as usize]
            .get_or_try_init(|| {
                log::debug!("parsing livetime table {self:?}");
                parse_livetime_file(self.source())
            })
            .map(Vec::as_slice)
    }

    /// Livetime of a single entry (`s11`, `hilo`, ...), `None` if the entry does not exist.
    pub fn get(&self, name: &str) -> Result<Option<Duration>, NuLimitsError> {
        Ok(self
            .entries()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, livetime)| *livetime))
    }

    pub fn total(&self) -> Result<Duration, NuLimitsError> {
        Ok(total_livetime(
            self.entries()?.iter().map(|(_, livetime)| *livetime),
        ))
    }

    /// Summed livetime in 365-day years.
    pub fn total_years(&self) -> Result<Years, NuLimitsError> {
        Ok(duration_to_years(self.total()?))
    }
}

impl FromStr for LivetimeTable {
    type Err = NuLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rnog_2024" | "2024" => Ok(LivetimeTable::Rnog2024),
            "rnog_2025" | "2025" => Ok(LivetimeTable::Rnog2025),
            _ => Err(NuLimitsError::UnknownLivetimeTable(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureSchedule {
    /// Deep hi/lo trigger, stations added as planned in the 2025 review
    Rnog2025,
}

impl ExposureSchedule {
    fn source(&self) -> &'static str {
        match self {
            ExposureSchedule::Rnog2025 => RNOG_2025_YEARLY,
        }
    }

    /// Accumulated exposure per year, in GeV and km³·sr·yr.
    pub fn table(&self) -> Result<&'static YearlyExposure, NuLimitsError> {
        SCHEDULES[*self as usize].get_or_try_init(|| {
            log::debug!("parsing exposure schedule {self:?}");
            parse_exposure_file(self.source())
        })
    }
}

impl FromStr for ExposureSchedule {
    type Err = NuLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rnog_2025" | "2025" => Ok(ExposureSchedule::Rnog2025),
            _ => Err(NuLimitsError::UnknownDataset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod datasets_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::Unit;
    use std::f64::consts::PI;

    #[test]
    fn test_all_datasets_parse_on_log_uniform_grids() {
        for dataset in VeffDataset::ALL {
            let table = dataset.table().unwrap();
            assert!(table.len() >= 4, "{dataset}");
            assert!(table.veffs().iter().all(|v| *v > 0.0), "{dataset}");
            assert!(table.grid().is_ok(), "{dataset}");
        }
    }

    #[test]
    fn test_dataset_names_round_trip() {
        for dataset in VeffDataset::ALL {
            assert_eq!(dataset.name().parse::<VeffDataset>().unwrap(), dataset);
        }
        assert_eq!(
            "smt".parse::<VeffDataset>().unwrap_err(),
            NuLimitsError::UnknownDataset("smt".into())
        );
    }

    #[test]
    fn test_dataset_units() {
        // km3 tables carry the full solid angle
        let hilo = VeffDataset::Hilo.table().unwrap();
        assert_relative_eq!(hilo.energies()[0], 1e7, max_relative = 1e-12);
        assert_relative_eq!(
            hilo.veffs()[0],
            5.07161981726308e-5 * 4.0 * PI,
            max_relative = 1e-12
        );

        let smt = VeffDataset::SmtMartin.table().unwrap();
        assert_eq!(smt.veffs()[4], 2.642);

        // white-paper array divided among its 35 stations
        let pa = VeffDataset::PaWhitePaper.table().unwrap();
        assert_relative_eq!(
            pa.veffs()[0],
            1.4207e-2 / 35.0 * 4.0 * PI,
            max_relative = 1e-12
        );

        let smt_2023 = VeffDataset::Smt2023.table().unwrap();
        assert_relative_eq!(smt_2023.energies()[8], 1e11, max_relative = 1e-12);
    }

    #[test]
    fn test_table_is_cached() {
        let first = VeffDataset::Didaq.table().unwrap();
        let second = VeffDataset::Didaq.table().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_livetime_tables() {
        let rnog_2024 = LivetimeTable::Rnog2024;
        assert_eq!(rnog_2024.entries().unwrap().len(), 8);
        assert_relative_eq!(
            rnog_2024.total().unwrap().to_unit(Unit::Day),
            2031.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            rnog_2024.get("s13").unwrap().unwrap().to_unit(Unit::Day),
            333.0,
            max_relative = 1e-12
        );
        assert_eq!(rnog_2024.get("s99").unwrap(), None);

        let rnog_2025: LivetimeTable = "2025".parse().unwrap();
        assert_relative_eq!(
            rnog_2025.total_years().unwrap(),
            (3073.61 + 1165.12) / 365.0,
            max_relative = 1e-12
        );
        assert!("2026".parse::<LivetimeTable>().is_err());
    }

    #[test]
    fn test_exposure_schedule() {
        let schedule: ExposureSchedule = "rnog_2025".parse().unwrap();
        let yearly = schedule.table().unwrap();
        assert_eq!(yearly.years().collect::<Vec<_>>(), (2024..=2040).collect::<Vec<_>>());
        assert_relative_eq!(yearly.energies()[0], 10f64.powf(7.5), max_relative = 1e-12);
        assert_relative_eq!(yearly.energies()[7], 1e11, max_relative = 1e-12);

        // 2024 is the deep hi/lo volume times the 2031 station-days of the first eight stations
        let deep = VeffDataset::DeepHighLow1Hz.table().unwrap();
        assert_eq!(deep.energies().len(), yearly.energies().len());
        let station_years = 2031.0 / 365.25;
        for (exposure, veff) in yearly.exposure(2024).unwrap().iter().zip(deep.veffs()) {
            assert_relative_eq!(*exposure, veff * station_years, max_relative = 3e-4);
        }

        for ((_, before), (_, after)) in yearly.iter().zip(yearly.iter().skip(1)) {
            assert!(before.iter().zip(after).all(|(b, a)| a > b));
        }
        assert!("rnog_2040".parse::<ExposureSchedule>().is_err());
    }
}
