//! Print the differential limit of the embedded RNO-G datasets as an `E² Φ` table.
//!
//! ```text
//! cargo run --example rnog_limit_table                 # hi/lo and phased array, 2025 livetime
//! cargo run --example rnog_limit_table -- SMT 35 10    # one dataset, 35 stations, 10 years
//! ```
use std::env;

use nulimits::datasets::{LivetimeTable, VeffDataset};
use nulimits::exposure::{project_exposure, ExposureConfig, ProjectionConfig};
use nulimits::limit::LimitCurve;
use nulimits::nulimits_errors::NuLimitsError;

/// Print one `energy  E²Φ` row per grid point, in GeV and GeV cm⁻² s⁻¹ sr⁻¹.
fn print_curve(title: &str, curve: &LimitCurve) -> Result<(), NuLimitsError> {
    let plot = curve.to_plot_units(2, 1.0)?;
    println!("# {title}");
    println!("# {:>12}  {:>12}", "E [GeV]", "E2 flux");
    for (energy, value) in plot.energies.iter().zip(&plot.values) {
        println!("  {energy:>12.3e}  {value:>12.3e}");
    }
    println!();
    Ok(())
}

fn single_dataset(name: &str, stations: f64, years: f64) -> Result<(), NuLimitsError> {
    let dataset: VeffDataset = name.parse()?;
    let table = dataset.table()?;
    let config = ExposureConfig::default()
        .with_stations(stations)
        .with_years(years);
    let curve = LimitCurve::compute(table.energies(), table.veffs(), &config)?;
    print_curve(
        &format!("{dataset}: {stations} stations, {years} years"),
        &curve,
    )
}

/// Today's RNO-G limit from the accumulated livetime of both triggers, and a 35 station projection.
fn rnog_summary() -> Result<(), NuLimitsError> {
    let livetimes = LivetimeTable::Rnog2025;
    let hilo = VeffDataset::Hilo.table()?;
    let pa = VeffDataset::Pa.table()?;
    let missing = |name: &str| NuLimitsError::UnknownDataset(format!("livetime entry {name}"));
    let hilo_livetime = livetimes.get("hilo")?.ok_or_else(|| missing("hilo"))?;
    let pa_livetime = livetimes.get("pa")?.ok_or_else(|| missing("pa"))?;

    println!(
        "# accumulated livetime: {:.2} station-years",
        livetimes.total_years()?
    );

    let today = project_exposure(hilo, hilo_livetime, pa, &ProjectionConfig::default())?;
    let pa_today = project_exposure(pa, pa_livetime, pa, &ProjectionConfig::default())?;
    let exposure: Vec<f64> = today
        .veffs()
        .iter()
        .zip(pa_today.veffs())
        .map(|(a, b)| a + b)
        .collect();
    // exposures already hold the livetime: one station, one year
    let unit = ExposureConfig::default();
    print_curve(
        "RNO-G today",
        &LimitCurve::compute(hilo.energies(), &exposure, &unit)?,
    )?;

    let projection = ProjectionConfig {
        additional_years: 35.0 * 5.0,
        ..Default::default()
    };
    let future = project_exposure(hilo, hilo_livetime, pa, &projection)?;
    print_curve(
        "RNO-G, 35 stations for 5 more years",
        &LimitCurve::compute(future.energies(), future.veffs(), &unit)?,
    )
}

fn main() -> Result<(), NuLimitsError> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => rnog_summary(),
        [name, stations, years] => {
            let parse = |s: &str| {
                s.parse::<f64>()
                    .map_err(|_| NuLimitsError::InvalidValue(s.to_string()))
            };
            single_dataset(name, parse(stations)?, parse(years)?)
        }
        _ => {
            eprintln!("usage: rnog_limit_table [<dataset> <stations> <years>]");
            for dataset in VeffDataset::ALL {
                eprintln!("  {dataset}");
            }
            Ok(())
        }
    }
}
