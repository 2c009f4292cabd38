//! Bottom-up revenue reconciliation.
//!
//! For every year, each consolidated subsidiary's stations are summed as
//! generation x unit price and the total is compared with the reported
//! operating revenue. A year with any incomplete station is dropped whole.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::analyzers::types::YearReconciliation;
use crate::analyzers::utility::round_to;
use crate::config::FieldNames;
use crate::model::{Dataset, Node, YearRecord};
use crate::stations::stations;

/// Reconciles every year of the dataset.
///
/// Years missing from the result were skipped: either a station under a
/// consolidated subsidiary was incomplete or the year had no subsidiaries.
#[tracing::instrument(skip_all, fields(threshold = shareholding_threshold))]
pub fn reconcile(
    dataset: &Dataset,
    fields: &FieldNames,
    shareholding_threshold: f64,
) -> BTreeMap<i32, YearReconciliation> {
    let out: BTreeMap<_, _> = dataset
        .records()
        .filter_map(|record| {
            reconcile_year(record, fields, shareholding_threshold).map(|r| (record.year, r))
        })
        .collect();

    info!(
        years = dataset.years.len(),
        reconciled = out.len(),
        "Revenue reconciliation complete"
    );
    out
}

/// Reconciles one year, or `None` if the year must be skipped.
pub fn reconcile_year(
    record: &YearRecord,
    fields: &FieldNames,
    shareholding_threshold: f64,
) -> Option<YearReconciliation> {
    let year = record.year;
    let Some(subsidiaries) = record.subsidiaries(&fields.subsidiaries) else {
        debug!(year, "No subsidiaries, skipping year");
        return None;
    };

    let mut subsidiary_revenues = BTreeMap::new();

    for (name, node) in subsidiaries.children() {
        if !is_consolidated(node, fields, shareholding_threshold) {
            debug!(year, subsidiary = name, "Below shareholding threshold, excluded");
            continue;
        }

        let revenue = subsidiary_revenue(year, name, node, fields)?;
        subsidiary_revenues.insert(name.to_string(), revenue);
    }

    let theoretical = round_to(subsidiary_revenues.values().sum::<f64>(), 3);
    let actual = record.number(&fields.operating_revenue);
    let difference = actual.map(|a| round_to(theoretical - a, 3));
    let pct_diff = match (actual, difference) {
        (Some(a), Some(d)) if a != 0.0 => Some(round_to(d / a * 100.0, 2)),
        _ => None,
    };

    Some(YearReconciliation {
        subsidiary_revenues,
        theoretical_operating_revenue: theoretical,
        actual_operating_revenue: actual,
        difference,
        pct_diff,
    })
}

/// A subsidiary without a ratio is consolidated; one strictly below the threshold is not.
pub fn is_consolidated(node: &Node, fields: &FieldNames, threshold: f64) -> bool {
    match node.number(&fields.shareholding) {
        Some(ratio) => ratio >= threshold,
        None => true,
    }
}

/// Sum of generation x price over the subsidiary's stations, 3 decimals.
///
/// No stations gives 0.0. Any station lacking a numeric price or
/// generation gives `None`.
fn subsidiary_revenue(year: i32, name: &str, node: &Node, fields: &FieldNames) -> Option<f64> {
    let mut total = 0.0;

    for station in stations(name, node, fields) {
        match station.revenue() {
            Some(revenue) => total += revenue,
            None => {
                warn!(
                    year,
                    subsidiary = name,
                    station = %station.name,
                    generation = ?station.generation,
                    unit_price = ?station.unit_price,
                    "Incomplete station, skipping year"
                );
                return None;
            }
        }
    }

    Some(round_to(total, 3))
}
