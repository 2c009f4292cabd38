use genco_analyzer::analyzers::analyzer::analyze;
use genco_analyzer::analyzers::reconcile::reconcile;
use genco_analyzer::analyzers::utility::round_to;
use genco_analyzer::config::{AnalysisConfig, FieldNames};
use genco_analyzer::output::series_csv;
use genco_analyzer::parser::parse_dataset;

fn fixture() -> genco_analyzer::model::Dataset {
    let bytes = include_bytes!("fixtures/sample_company.json");
    parse_dataset(bytes).expect("Failed to parse fixture")
}

#[test]
fn test_full_pipeline() {
    let dataset = fixture();
    let report = analyze(&dataset, &AnalysisConfig::default());

    assert_eq!(report.years, vec![2018, 2019, 2020, 2021]);
    assert_eq!(report.currency.as_deref(), Some("CNY"));

    let serialized = serde_json::to_value(&report).unwrap();
    assert!(serialized["reconciliation"]["2019"].is_object());
    assert!(serialized["reconciliation"].get("2018").is_none());
}

#[test]
fn test_reconciliation_against_fixture() {
    let dataset = fixture();
    let out = reconcile(&dataset, &FieldNames::default(), 50.0);

    // 2018 has an NA unit price under puding
    assert_eq!(out.keys().copied().collect::<Vec<_>>(), vec![2019, 2020, 2021]);

    let y2019 = &out[&2019];
    assert_eq!(y2019.subsidiary_revenues["puding"], 96.0);
    assert_eq!(y2019.subsidiary_revenues["yinzidu"], 52.5);
    assert!(!y2019.subsidiary_revenues.contains_key("dahuaqiao"));
    assert_eq!(y2019.theoretical_operating_revenue, 148.5);
    assert_eq!(y2019.difference, Some(38.5));
    assert_eq!(y2019.pct_diff, Some(35.0));

    let y2020 = &out[&2020];
    assert_eq!(y2020.subsidiary_revenues["guangzhao"], 0.0);
    assert_eq!(y2020.theoretical_operating_revenue, 51.0);
    assert_eq!(y2020.pct_diff, None);

    let y2021 = &out[&2021];
    assert_eq!(y2021.actual_operating_revenue, None);
    assert_eq!(y2021.difference, None);

    for year in out.values() {
        let sum: f64 = year.subsidiary_revenues.values().sum();
        assert_eq!(year.theoretical_operating_revenue, round_to(sum, 3));
    }
}

#[test]
fn test_generation_and_valuation_against_fixture() {
    let dataset = fixture();
    let report = analyze(&dataset, &AnalysisConfig::default());

    let generation = report.generation_output.unwrap();
    assert_eq!(generation["puding"].stats.years, vec![2018, 2019, 2021]);
    assert_eq!(generation["puding"].stats.mean, Some(320.0));
    assert!(!generation.contains_key("guangzhao"));

    let valuation = report.valuation.unwrap();
    let rv = &valuation.recognized.series;
    assert_eq!(rv[&2018], None);
    // (900 - 860) + (60 - 50) + 20
    assert_eq!(rv[&2019], Some(70.0));
    assert_eq!(rv[&2020], None);
    assert_eq!(rv[&2021], None);

    let estimate = valuation.estimate.unwrap();
    assert_eq!(estimate.expected_rate, 0.08);
    assert_eq!(estimate.value_at_mean, Some(875.0));
}

#[test]
fn test_financial_series_csv() {
    let dataset = fixture();
    let report = analyze(&dataset, &AnalysisConfig::default());
    let financials = report.financials.unwrap();

    let series = genco_analyzer::analyzers::types::AnalysisReport::series(&financials);
    let body = String::from_utf8(series_csv(&series).unwrap()).unwrap();
    let header = body.lines().next().unwrap();

    assert!(header.starts_with("year,"));
    assert!(header.contains("net_profit_attributable_to_parent"));
    assert_eq!(body.lines().count(), 5);
}
