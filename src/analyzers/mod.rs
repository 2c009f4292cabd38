//! Financial and operational analysis over a loaded dataset.
//!
//! Raw series are pulled from the year records, revenue is rebuilt bottom-up
//! from stations and reconciled against the reported figure, and descriptive
//! statistics and a recognized-value valuation are computed.

pub mod analyzer;
pub mod extract;
pub mod reconcile;
pub mod statistics;
pub mod types;
pub mod utility;
pub mod valuation;
