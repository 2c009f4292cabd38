use tracing::debug;

use crate::analyzers::extract::field_series;
use crate::analyzers::statistics::{describe, describe_excluding, recognized_values};
use crate::analyzers::types::{RecognizedValue, Valuation, ValuationEstimate};
use crate::analyzers::utility::round_to;
use crate::config::FieldNames;
use crate::model::Dataset;

/// Builds the recognized-value series and its plain and adjusted statistics.
pub fn recognized_value(
    dataset: &Dataset,
    fields: &FieldNames,
    excluded_years: &[i32],
) -> RecognizedValue {
    let series = recognized_values(
        &field_series(dataset, &fields.liabilities),
        &field_series(dataset, &fields.cash),
        &field_series(dataset, &fields.dividends),
        &dataset.year_keys(),
    );

    RecognizedValue {
        stats: describe(&series),
        adjusted: describe_excluding(&series, excluded_years),
        excluded_years: excluded_years.to_vec(),
        series,
    }
}

/// Capitalizes the recognized-value means at `rate`.
///
/// Returns `None` without a positive rate.
pub fn estimate(recognized: &RecognizedValue, rate: Option<f64>) -> Option<ValuationEstimate> {
    let rate = rate.filter(|r| *r > 0.0)?;
    let capitalize = |mean: Option<f64>| mean.map(|m| round_to(m / rate, 3));

    Some(ValuationEstimate {
        expected_rate: rate,
        value_at_mean: capitalize(recognized.stats.mean),
        value_at_adjusted_mean: capitalize(recognized.adjusted.mean),
    })
}

#[tracing::instrument(skip_all)]
pub fn build_valuation(dataset: &Dataset, fields: &FieldNames, excluded_years: &[i32]) -> Valuation {
    let recognized = recognized_value(dataset, fields, excluded_years);
    let estimate = estimate(&recognized, dataset.expected_rate());
    debug!(has_estimate = estimate.is_some(), "Valuation computed");

    Valuation {
        recognized,
        estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dataset;

    fn dataset() -> Dataset {
        parse_dataset(
            br#"{
                "expected_rate": 10,
                "2018": {"total_liabilities": 100, "cash": 10, "dividends": 2},
                "2019": {"total_liabilities": 90, "cash": 12, "dividends": 2},
                "2020": {"total_liabilities": 95, "cash": 40, "dividends": 3},
                "2021": {"total_liabilities": 85, "cash": 41, "dividends": "NA"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_recognized_value_series() {
        let rv = recognized_value(&dataset(), &FieldNames::default(), &[2020]);

        assert_eq!(rv.series[&2018], None);
        // (100 - 90) + (12 - 10) + 2
        assert_eq!(rv.series[&2019], Some(14.0));
        // (90 - 95) + (40 - 12) + 2
        assert_eq!(rv.series[&2020], Some(25.0));
        // (95 - 85) + (41 - 40) + 3
        assert_eq!(rv.series[&2021], Some(14.0));

        assert_eq!(rv.stats.mean, Some(17.667));
        assert_eq!(rv.adjusted.mean, Some(14.0));
        assert_eq!(rv.adjusted.std, Some(0.0));
    }

    #[test]
    fn test_estimate_uses_percent_rate() {
        let v = build_valuation(&dataset(), &FieldNames::default(), &[2020]);
        let est = v.estimate.unwrap();

        assert_eq!(est.expected_rate, 0.1);
        assert_eq!(est.value_at_adjusted_mean, Some(140.0));
    }

    #[test]
    fn test_no_estimate_without_rate() {
        let rv = recognized_value(&dataset(), &FieldNames::default(), &[]);
        assert!(estimate(&rv, None).is_none());
        assert!(estimate(&rv, Some(0.0)).is_none());
    }
}
