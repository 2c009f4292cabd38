//! Raw series pulled straight out of the year records.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::analyzers::types::YearSeries;
use crate::config::{FieldNames, GenerationConfig};
use crate::model::{Dataset, Scalar};

/// A top-level year field across every year of the dataset.
///
/// Every year gets an entry; missing and non-numeric values are `None`.
pub fn field_series(dataset: &Dataset, field: &str) -> YearSeries {
    dataset
        .records()
        .map(|record| {
            let value = match record.fields.scalar(field) {
                Scalar::Number(v) => Some(v),
                Scalar::Missing => None,
                Scalar::Text(raw) => {
                    warn!(year = record.year, field, raw = %raw, "Non-numeric value, omitting");
                    None
                }
            };
            (record.year, value)
        })
        .collect()
}

/// Generation output per top-level subsidiary, read from the subsidiary's
/// own generation field.
///
/// Only years with a numeric value are recorded. The shareholding gate is
/// applied only when the config asks for it.
#[tracing::instrument(skip_all)]
pub fn generation_history(
    dataset: &Dataset,
    fields: &FieldNames,
    config: &GenerationConfig,
) -> BTreeMap<String, YearSeries> {
    let mut history: BTreeMap<String, YearSeries> = BTreeMap::new();

    for record in dataset.records() {
        let Some(subsidiaries) = record.subsidiaries(&fields.subsidiaries) else {
            continue;
        };

        for (name, node) in subsidiaries.children() {
            if !config.subsidiaries.is_empty() && !config.subsidiaries.iter().any(|s| s == name) {
                continue;
            }

            if config.apply_shareholding_gate {
                if let Some(ratio) = node.number(&fields.shareholding) {
                    if ratio < config.shareholding_threshold {
                        debug!(year = record.year, subsidiary = name, ratio, "Below shareholding gate");
                        continue;
                    }
                }
            }

            match node.scalar(&fields.generation) {
                Scalar::Number(v) => {
                    history.entry(name.to_string()).or_default().insert(record.year, Some(v));
                }
                Scalar::Missing => {}
                Scalar::Text(raw) => {
                    warn!(year = record.year, subsidiary = name, raw = %raw, "Non-numeric generation output, omitting");
                }
            }
        }
    }

    debug!(subsidiaries = history.len(), "Generation history extracted");
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dataset;

    fn dataset() -> Dataset {
        parse_dataset(
            br#"{
                "expected_rate": 0.06,
                "2019": {
                    "cash": 10,
                    "subsidiaries": {
                        "puding": {"generation_output": 12.5, "shareholding_ratio": 51},
                        "yinzidu": {"generation_output": "NA", "shareholding_ratio": 30}
                    }
                },
                "2020": {
                    "cash": "NA",
                    "subsidiaries": {
                        "puding": {"generation_output": 13.0, "shareholding_ratio": 51},
                        "yinzidu": {"generation_output": 4.0, "shareholding_ratio": 30}
                    }
                },
                "2021": {"cash": "unknown"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_field_series_covers_every_year() {
        let series = field_series(&dataset(), "cash");
        assert_eq!(series.len(), 3);
        assert_eq!(series[&2019], Some(10.0));
        assert_eq!(series[&2020], None);
        assert_eq!(series[&2021], None);
    }

    #[test]
    fn test_generation_history_skips_missing_points() {
        let history =
            generation_history(&dataset(), &FieldNames::default(), &GenerationConfig::default());

        assert_eq!(history["puding"].len(), 2);
        assert_eq!(history["yinzidu"].len(), 1);
        assert_eq!(history["yinzidu"][&2020], Some(4.0));
    }

    #[test]
    fn test_generation_history_name_filter() {
        let config = GenerationConfig {
            subsidiaries: vec!["puding".into()],
            ..Default::default()
        };
        let history = generation_history(&dataset(), &FieldNames::default(), &config);
        assert_eq!(history.keys().collect::<Vec<_>>(), vec!["puding"]);
    }

    #[test]
    fn test_generation_history_gate_is_optional() {
        let config = GenerationConfig {
            apply_shareholding_gate: true,
            ..Default::default()
        };
        let history = generation_history(&dataset(), &FieldNames::default(), &config);
        assert!(!history.contains_key("yinzidu"));
        assert!(history.contains_key("puding"));
    }
}
