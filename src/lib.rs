//! Neutrino flux sensitivity for in-ice radio detectors: cross-sections, effective areas,
//! differential flux limits and expected event counts.
pub mod constants;
pub mod cross_section;
pub mod datasets;
pub mod energy_grid;
pub mod events;
pub mod exposure;
pub mod flux_table;
pub mod limit;
pub mod nulimits_errors;
pub mod tables;
pub mod time;
mod units;
