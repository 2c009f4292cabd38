use tracing::debug;

use crate::analyzers::types::{SeriesStats, YearSeries};
use crate::analyzers::utility::{mean, round_to, stddev};

/// Mean, population standard deviation, max and min over the present values.
///
/// Missing years are skipped rather than read as zero. An all-missing
/// series yields `None` for every statistic.
pub fn describe(series: &YearSeries) -> SeriesStats {
    let (years, values): (Vec<i32>, Vec<f64>) = series
        .iter()
        .filter_map(|(year, value)| value.map(|v| (*year, v)))
        .unzip();

    if values.is_empty() {
        return SeriesStats::default();
    }

    let avg = mean(&values);
    let sd = stddev(&values, avg);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    SeriesStats {
        mean: Some(round_to(avg, 3)),
        std: Some(round_to(sd, 3)),
        max: Some(max),
        min: Some(min),
        years,
        values,
    }
}

/// Same as [`describe`] with the given years removed first.
pub fn describe_excluding(series: &YearSeries, excluded_years: &[i32]) -> SeriesStats {
    let kept: YearSeries = series
        .iter()
        .filter(|(year, _)| !excluded_years.contains(year))
        .map(|(year, value)| (*year, *value))
        .collect();
    describe(&kept)
}

fn at(series: &YearSeries, year: i32) -> Option<f64> {
    series.get(&year).copied().flatten()
}

fn recognized_at(
    liabilities: &YearSeries,
    cash: &YearSeries,
    dividends: &YearSeries,
    year: i32,
) -> Option<f64> {
    let prev = year - 1;
    let liability_change = at(liabilities, prev)? - at(liabilities, year)?;
    let cash_change = at(cash, year)? - at(cash, prev)?;
    Some(round_to(liability_change + cash_change + at(dividends, prev)?, 3))
}

/// Recognized value for each year in `years`:
///
/// `(liabilities[y-1] - liabilities[y]) + (cash[y] - cash[y-1]) + dividends[y-1]`
///
/// The first year has no prior year and is always `None`, as is any year
/// where one of the five inputs is missing.
pub fn recognized_values(
    liabilities: &YearSeries,
    cash: &YearSeries,
    dividends: &YearSeries,
    years: &[i32],
) -> YearSeries {
    let mut out = YearSeries::new();
    let first = years.iter().copied().min();

    for &year in years {
        if Some(year) == first {
            out.insert(year, None);
            continue;
        }

        let value = recognized_at(liabilities, cash, dividends, year);

        if value.is_none() {
            debug!(year, "Recognized value undefined, inputs incomplete");
        }
        out.insert(year, value);
    }

    out
}
