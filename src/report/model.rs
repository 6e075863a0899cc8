//! Report data model as embedded in the generated HTML report.

use crate::core::items::{ColumnKind, NodeCard};
use crate::error::{AppError, ReportError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub cluster_name: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub tabs: Vec<ReportTab>,
    #[serde(default)]
    pub node_cards: Vec<NodeCard>,
    #[serde(default)]
    pub metrics: Vec<MetricPanel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTab {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<FindingsSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingsSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub open: bool,
    pub headers: Vec<String>,
    /// Column index (as a string key) to column kind
    #[serde(default)]
    pub column_kinds: HashMap<String, ColumnKind>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Per-row sizing profile, parallel to `rows`
    #[serde(default)]
    pub row_profiles: Vec<Option<String>>,
}

impl FindingsSection {
    /// Column kind overrides keyed by column index; unparsable keys are dropped.
    pub fn column_kind_overrides(&self) -> HashMap<usize, ColumnKind> {
        self.column_kinds
            .iter()
            .filter_map(|(key, kind)| match key.parse::<usize>() {
                Ok(column) => Some((column, *kind)),
                Err(_) => {
                    log::warn!(
                        "Section {}: ignoring column kind for non-numeric column '{}'",
                        self.id,
                        key
                    );
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Line,
    Gauge,
    Sparkline,
}

/// A chart panel. `values` holds the raw chart data, either as JSON or as a
/// JSON-encoded string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPanel {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub kind: MetricKind,
    #[serde(default)]
    pub values: serde_json::Value,
}

impl Report {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self, AppError> {
        let report: Report = serde_json::from_str(content).map_err(|e| ReportError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        log::debug!(
            "Loaded report for {} with {} tabs and {} node cards",
            report.cluster_name,
            report.tabs.len(),
            report.node_cards.len()
        );
        Ok(report)
    }
}
