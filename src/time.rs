use hifitime::{Duration, Unit};

use crate::constants::{Years, LIVETIME_DAYS_PER_YEAR};

/// Convert a livetime into years of [`LIVETIME_DAYS_PER_YEAR`] days.
///
/// Argument
/// --------
/// * `livetime`: an accumulated livetime
///
/// Return
/// ------
/// * the livetime in 365-day years
pub fn duration_to_years(livetime: Duration) -> Years {
    livetime.to_unit(Unit::Day) / LIVETIME_DAYS_PER_YEAR
}

/// Convert 365-day years into a [`Duration`].
pub fn years_to_duration(years: Years) -> Duration {
    Unit::Day * (years * LIVETIME_DAYS_PER_YEAR)
}

/// Livetime given in days, as recorded in station run logs.
pub fn days(days: f64) -> Duration {
    Unit::Day * days
}

/// Sum a sequence of livetimes.
pub fn total_livetime<I>(livetimes: I) -> Duration
where
    I: IntoIterator<Item = Duration>,
{
    livetimes
        .into_iter()
        .fold(Duration::ZERO, |acc, livetime| acc + livetime)
}
