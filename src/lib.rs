pub mod analyzers;
pub mod chart;
pub mod config;
pub mod loader;
pub mod model;
pub mod output;
pub mod parser;
pub mod stations;
