//! Analysis configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "fields": { "unit_price": "on_grid_price" },
//!   "reconcile": { "shareholding_threshold": 50.0 },
//!   "generation": { "subsidiaries": ["puding", "yinzidu"] },
//!   "valuation": { "excluded_years": [2020, 2021] }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the fields read from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub generation: String,
    pub unit_price: String,
    pub operating_revenue: String,
    pub liabilities: String,
    pub cash: String,
    pub dividends: String,
    pub shareholding: String,
    pub subsidiaries: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            generation: "generation_output".into(),
            unit_price: "unit_price".into(),
            operating_revenue: "operating_revenue".into(),
            liabilities: "total_liabilities".into(),
            cash: "cash".into(),
            dividends: "dividends".into(),
            shareholding: "shareholding_ratio".into(),
            subsidiaries: "subsidiaries".into(),
        }
    }
}

/// Subsidiaries owned below this percentage are not consolidated.
pub const DEFAULT_SHAREHOLDING_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub enabled: bool,
    pub shareholding_threshold: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shareholding_threshold: DEFAULT_SHAREHOLDING_THRESHOLD,
        }
    }
}

/// Generation output history. The shareholding gate here is independent
/// of the one used for revenue reconciliation and is off by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub enabled: bool,
    /// Subsidiaries to extract. Empty means all of them.
    pub subsidiaries: Vec<String>,
    pub apply_shareholding_gate: bool,
    pub shareholding_threshold: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            subsidiaries: Vec::new(),
            apply_shareholding_gate: false,
            shareholding_threshold: DEFAULT_SHAREHOLDING_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialsConfig {
    pub enabled: bool,
    /// Top-level year fields to describe.
    pub series: Vec<String>,
}

impl Default for FinancialsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            series: [
                "operating_revenue",
                "total_liabilities",
                "cash",
                "dividends",
                "net_profit",
                "net_profit_attributable_to_parent",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub enabled: bool,
    /// Years dropped from the recognized-value baseline for the adjusted figures.
    pub excluded_years: Vec<i32>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excluded_years: vec![2020, 2021],
        }
    }
}

/// Everything [`crate::analyzers::analyzer::analyze`] needs to know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub fields: FieldNames,
    pub generation: GenerationConfig,
    pub financials: FinancialsConfig,
    pub reconcile: ReconcileConfig,
    pub valuation: ValuationConfig,
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
