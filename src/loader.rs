use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::model::Dataset;
use crate::parser::parse_dataset;

/// Reads the raw bytes of an input document.
#[tracing::instrument(skip_all, fields(source = %path.display()))]
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(bytes = bytes.len(), "Source read");
    Ok(bytes)
}

/// Reads and parses a dataset file. Missing or malformed files are fatal.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let bytes = read_source(path)?;
    let dataset =
        parse_dataset(&bytes).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(years = dataset.years.len(), "Dataset loaded");
    Ok(dataset)
}
