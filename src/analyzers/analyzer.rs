use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

use crate::analyzers::extract::{field_series, generation_history};
use crate::analyzers::reconcile::reconcile;
use crate::analyzers::statistics::describe;
use crate::analyzers::types::{AnalysisReport, DescribedSeries, YearSeries};
use crate::analyzers::valuation::build_valuation;
use crate::config::AnalysisConfig;
use crate::model::Dataset;

fn described(series: BTreeMap<String, YearSeries>) -> BTreeMap<String, DescribedSeries> {
    series
        .into_iter()
        .map(|(name, series)| {
            let stats = describe(&series);
            (name, DescribedSeries { series, stats })
        })
        .collect()
}

/// Runs every stage enabled in `config` over the dataset.
#[tracing::instrument(skip_all, fields(years = dataset.years.len()))]
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> AnalysisReport {
    let fields = &config.fields;

    let generation_output = config.generation.enabled.then(|| {
        described(generation_history(dataset, fields, &config.generation))
    });

    let financials = config.financials.enabled.then(|| {
        described(
            config
                .financials
                .series
                .iter()
                .map(|field| (field.clone(), field_series(dataset, field)))
                .collect(),
        )
    });

    let reconciliation = config
        .reconcile
        .enabled
        .then(|| reconcile(dataset, fields, config.reconcile.shareholding_threshold));

    let valuation = config
        .valuation
        .enabled
        .then(|| build_valuation(dataset, fields, &config.valuation.excluded_years));

    info!(
        generation = generation_output.as_ref().map(BTreeMap::len),
        financials = financials.as_ref().map(BTreeMap::len),
        reconciled_years = reconciliation.as_ref().map(BTreeMap::len),
        "Analysis complete"
    );

    AnalysisReport {
        generated_at: Utc::now(),
        currency: dataset.currency(),
        years: dataset.year_keys(),
        generation_output,
        financials,
        reconciliation,
        valuation,
    }
}
