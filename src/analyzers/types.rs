//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A year-indexed numeric series. Years may be absent or hold `None`.
pub type YearSeries = BTreeMap<i32, Option<f64>>;

/// Descriptive statistics over the present values of a [`YearSeries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    /// Years that contributed a value, ascending.
    pub years: Vec<i32>,
    /// Present values in year order.
    pub values: Vec<f64>,
}

/// Bottom-up revenue estimate for one year compared against the reported figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearReconciliation {
    pub subsidiary_revenues: BTreeMap<String, f64>,
    pub theoretical_operating_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_operating_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_diff: Option<f64>,
}

/// Year-over-year recognized value with plain and adjusted statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedValue {
    pub series: YearSeries,
    pub stats: SeriesStats,
    pub excluded_years: Vec<i32>,
    pub adjusted: SeriesStats,
}

/// Perpetuity valuation from the recognized-value baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationEstimate {
    pub expected_rate: f64,
    pub value_at_mean: Option<f64>,
    pub value_at_adjusted_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub recognized: RecognizedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<ValuationEstimate>,
}

/// A raw series together with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribedSeries {
    pub series: YearSeries,
    pub stats: SeriesStats,
}

/// Complete result of one analysis run. Disabled stages are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub years: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_output: Option<BTreeMap<String, DescribedSeries>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financials: Option<BTreeMap<String, DescribedSeries>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<BTreeMap<i32, YearReconciliation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<Valuation>,
}

impl AnalysisReport {
    /// Raw series keyed by name, for tabular output and charts.
    pub fn series(section: &BTreeMap<String, DescribedSeries>) -> BTreeMap<String, YearSeries> {
        section
            .iter()
            .map(|(name, d)| (name.clone(), d.series.clone()))
            .collect()
    }
}
