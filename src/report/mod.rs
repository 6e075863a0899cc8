//! Report input and output: the JSON model, chart data, score bands and CSV export.

pub mod charts;
pub mod export;
pub mod model;
pub mod score;
