//! Output formatting and persistence for analysis reports.
//!
//! Supports pretty-printing, JSON files, and CSV series tables, each
//! optionally gzip-compressed.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::{AnalysisReport, YearSeries};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AnalysisReport) {
    debug!("{:#?}", report);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `bytes` to `path`, or to `path` + `.gz` compressed when `gzip` is set.
///
/// Returns the path actually written.
pub fn write_bytes(path: &Path, bytes: &[u8], gzip: bool) -> Result<PathBuf> {
    let (body, target) = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        let compressed = encoder.finish()?;

        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        (compressed, PathBuf::from(name))
    } else {
        (bytes.to_vec(), path.to_path_buf())
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, body).with_context(|| format!("failed to write {}", target.display()))?;
    debug!(path = %target.display(), gzip, "Output written");

    Ok(target)
}

/// Serializes a value as pretty JSON to a file.
pub fn write_json(path: &Path, value: &impl Serialize, gzip: bool) -> Result<PathBuf> {
    let body = serde_json::to_vec_pretty(value)?;
    write_bytes(path, &body, gzip)
}

/// Renders named year series as a CSV table: one row per year, one column
/// per series. Missing values are empty cells.
pub fn series_csv(series: &BTreeMap<String, YearSeries>) -> Result<Vec<u8>> {
    let years: BTreeSet<i32> = series.values().flat_map(|s| s.keys().copied()).collect();

    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buf);

        let mut header = vec!["year".to_string()];
        header.extend(series.keys().cloned());
        writer.write_record(&header)?;

        for year in years {
            let mut row = vec![year.to_string()];
            row.extend(series.values().map(|s| match s.get(&year).copied().flatten() {
                Some(v) => v.to_string(),
                None => String::new(),
            }));
            writer.write_record(&row)?;
        }

        writer.flush()?;
    }

    Ok(buf)
}

pub fn write_series_csv(
    path: &Path,
    series: &BTreeMap<String, YearSeries>,
    gzip: bool,
) -> Result<PathBuf> {
    let body = series_csv(series)?;
    write_bytes(path, &body, gzip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn empty_report() -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now(),
            currency: None,
            years: vec![],
            generation_output: None,
            financials: None,
            reconciliation: None,
            valuation: None,
        }
    }

    fn sample_series() -> BTreeMap<String, YearSeries> {
        let mut series = BTreeMap::new();
        series.insert(
            "cash".to_string(),
            [(2019, Some(1.5)), (2020, None)].into_iter().collect(),
        );
        series.insert("debt".to_string(), [(2021, Some(3.0))].into_iter().collect());
        series
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&empty_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&empty_report()).unwrap();
    }

    #[test]
    fn test_series_csv_layout() {
        let body = String::from_utf8(series_csv(&sample_series()).unwrap()).unwrap();
        let lines: Vec<_> = body.lines().collect();

        assert_eq!(lines, vec!["year,cash,debt", "2019,1.5,", "2020,,", "2021,,3"]);
    }

    #[test]
    fn test_write_json_plain() {
        let path = temp_path("genco_analyzer_test_report.json");
        let _ = fs::remove_file(&path);

        let written = write_json(&path, &sample_series(), false).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"cash\""));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_series_csv_gzip() {
        let path = temp_path("genco_analyzer_test_series.csv");
        let written = write_series_csv(&path, &sample_series(), true).unwrap();
        assert!(written.to_string_lossy().ends_with(".csv.gz"));

        let mut decoded = String::new();
        GzDecoder::new(fs::File::open(&written).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.starts_with("year,cash,debt"));

        fs::remove_file(&written).unwrap();
    }
}
