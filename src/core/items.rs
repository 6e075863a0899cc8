//! Item sources for the pager/sorter.
//!
//! Findings-table rows and node cards are both "row-like": an ordered list of
//! items whose text can be extracted per column. [`ItemSource`] is the single
//! interface the sort and pagination engine works against.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Semantics of a column, used to pick the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Severity,
    Status,
}

impl ColumnKind {
    /// Infer a column kind from its header label.
    pub fn infer(header: &str) -> Self {
        match header.trim().to_ascii_lowercase().as_str() {
            "severity" | "priority" => ColumnKind::Severity,
            "status" | "result" => ColumnKind::Status,
            _ => ColumnKind::Text,
        }
    }
}

/// Row-like collection addressed by item index and column index.
pub trait ItemSource {
    /// Number of items (visible or not).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of addressable columns.
    fn column_count(&self) -> usize;

    /// Header label for a column.
    fn column_label(&self, column: usize) -> Option<Cow<'_, str>>;

    /// Column semantics for sorting.
    fn column_kind(&self, column: usize) -> ColumnKind;

    /// Text of one item at one column. This is the extraction hook used for
    /// sorting, filtering and rendering.
    fn item_text(&self, index: usize, column: usize) -> Option<Cow<'_, str>>;

    /// Explicit numeric sort key for an item/column pair, if any.
    fn sort_key(&self, _index: usize, _column: usize) -> Option<i64> {
        None
    }

    /// Categorical value used by the sizing-profile filter.
    fn category(&self, _index: usize) -> Option<&str> {
        None
    }

    fn is_visible(&self, index: usize) -> bool;

    fn set_visible(&mut self, index: usize, visible: bool);

    /// Reorder items so that new position `i` holds old item `order[i]`.
    fn reorder(&mut self, order: &[usize]);
}

/// One findings-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
    pub visible: bool,
    pub sort_keys: HashMap<usize, i64>,
    pub sizing_profile: Option<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            visible: true,
            sort_keys: HashMap::new(),
            sizing_profile: None,
        }
    }

    pub fn from_strs(cells: &[&str]) -> Self {
        Self::new(cells.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_sort_key(mut self, column: usize, key: i64) -> Self {
        self.sort_keys.insert(column, key);
        self
    }

    pub fn with_sizing_profile(mut self, profile: Option<String>) -> Self {
        self.sizing_profile = profile;
        self
    }
}

/// A findings table: header labels, column kinds and rows.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Row>,
}

impl RowTable {
    /// Build a table, inferring column kinds from the header labels.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let kinds = headers.iter().map(|h| ColumnKind::infer(h)).collect();
        Self {
            headers,
            kinds,
            rows,
        }
    }

    /// Override column kinds; entries beyond the header count are ignored.
    pub fn with_column_kinds(mut self, overrides: &HashMap<usize, ColumnKind>) -> Self {
        for (&column, &kind) in overrides {
            if let Some(slot) = self.kinds.get_mut(column) {
                *slot = kind;
            }
        }
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

impl ItemSource for RowTable {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn column_label(&self, column: usize) -> Option<Cow<'_, str>> {
        self.headers.get(column).map(|h| Cow::Borrowed(h.as_str()))
    }

    fn column_kind(&self, column: usize) -> ColumnKind {
        self.kinds.get(column).copied().unwrap_or_default()
    }

    fn item_text(&self, index: usize, column: usize) -> Option<Cow<'_, str>> {
        self.rows
            .get(index)
            .and_then(|row| row.cells.get(column))
            .map(|cell| Cow::Borrowed(cell.trim()))
    }

    fn sort_key(&self, index: usize, column: usize) -> Option<i64> {
        self.rows
            .get(index)
            .and_then(|row| row.sort_keys.get(&column).copied())
    }

    fn category(&self, index: usize) -> Option<&str> {
        self.rows
            .get(index)
            .and_then(|row| row.sizing_profile.as_deref())
    }

    fn is_visible(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(|row| row.visible)
    }

    fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(row) = self.rows.get_mut(index) {
            row.visible = visible;
        }
    }

    fn reorder(&mut self, order: &[usize]) {
        let mut taken: Vec<Option<Row>> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(Some)
            .collect();
        self.rows = order.iter().filter_map(|&i| taken[i].take()).collect();
        // Anything the permutation missed keeps its relative order at the end.
        self.rows.extend(taken.into_iter().flatten());
    }
}

/// Node summary card as shown on the nodes tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCard {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disk_percent: f64,
    #[serde(default)]
    pub pod_count: u32,
    #[serde(default)]
    pub sizing_profile: Option<String>,
    #[serde(default)]
    pub cpu_trend: Vec<f64>,
    #[serde(skip, default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

const NODE_CARD_COLUMNS: [&str; 7] = [
    "Node", "Status", "CPU %", "Memory %", "Disk %", "Pods", "Profile",
];

/// Grid of node cards.
#[derive(Debug, Clone, Default)]
pub struct NodeCardGrid {
    cards: Vec<NodeCard>,
}

impl NodeCardGrid {
    pub fn new(cards: Vec<NodeCard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[NodeCard] {
        &self.cards
    }
}

impl ItemSource for NodeCardGrid {
    fn len(&self) -> usize {
        self.cards.len()
    }

    fn column_count(&self) -> usize {
        NODE_CARD_COLUMNS.len()
    }

    fn column_label(&self, column: usize) -> Option<Cow<'_, str>> {
        NODE_CARD_COLUMNS.get(column).map(|label| Cow::Borrowed(*label))
    }

    fn column_kind(&self, column: usize) -> ColumnKind {
        match column {
            1 => ColumnKind::Status,
            _ => ColumnKind::Text,
        }
    }

    fn item_text(&self, index: usize, column: usize) -> Option<Cow<'_, str>> {
        let card = self.cards.get(index)?;
        let text = match column {
            0 => Cow::Borrowed(card.name.as_str()),
            1 => Cow::Borrowed(card.status.as_str()),
            2 => Cow::Owned(format!("{:.1}", card.cpu_percent)),
            3 => Cow::Owned(format!("{:.1}", card.memory_percent)),
            4 => Cow::Owned(format!("{:.1}", card.disk_percent)),
            5 => Cow::Owned(card.pod_count.to_string()),
            6 => Cow::Borrowed(card.sizing_profile.as_deref().unwrap_or("")),
            _ => return None,
        };
        Some(text)
    }

    fn category(&self, index: usize) -> Option<&str> {
        self.cards
            .get(index)
            .and_then(|card| card.sizing_profile.as_deref())
    }

    fn is_visible(&self, index: usize) -> bool {
        self.cards.get(index).is_some_and(|card| card.visible)
    }

    fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(card) = self.cards.get_mut(index) {
            card.visible = visible;
        }
    }

    fn reorder(&mut self, order: &[usize]) {
        let mut taken: Vec<Option<NodeCard>> = std::mem::take(&mut self.cards)
            .into_iter()
            .map(Some)
            .collect();
        self.cards = order.iter().filter_map(|&i| taken[i].take()).collect();
        self.cards.extend(taken.into_iter().flatten());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, cpu: f64) -> NodeCard {
        NodeCard {
            name: name.to_string(),
            status: "Ready".to_string(),
            cpu_percent: cpu,
            memory_percent: 40.0,
            disk_percent: 10.0,
            pod_count: 12,
            sizing_profile: Some("balanced".to_string()),
            cpu_trend: vec![],
            visible: true,
        }
    }

    #[test]
    fn test_column_kind_inference() {
        assert_eq!(ColumnKind::infer("Severity"), ColumnKind::Severity);
        assert_eq!(ColumnKind::infer(" status "), ColumnKind::Status);
        assert_eq!(ColumnKind::infer("Namespace"), ColumnKind::Text);
    }

    #[test]
    fn test_row_table_text_is_trimmed() {
        let table = RowTable::new(
            vec!["Check".to_string(), "Severity".to_string()],
            vec![Row::from_strs(&["  Ready  ", "High"])],
        );
        assert_eq!(table.item_text(0, 0).as_deref(), Some("Ready"));
        assert_eq!(table.item_text(0, 5), None);
        assert_eq!(table.column_kind(1), ColumnKind::Severity);
    }

    #[test]
    fn test_column_kind_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(0, ColumnKind::Status);
        overrides.insert(9, ColumnKind::Severity);
        let table = RowTable::new(vec!["Outcome".to_string()], vec![])
            .with_column_kinds(&overrides);
        assert_eq!(table.column_kind(0), ColumnKind::Status);
        assert_eq!(table.column_kind(9), ColumnKind::Text);
    }

    #[test]
    fn test_reorder_applies_permutation() {
        let mut table = RowTable::new(
            vec!["Name".to_string()],
            vec![
                Row::from_strs(&["a"]),
                Row::from_strs(&["b"]),
                Row::from_strs(&["c"]),
            ],
        );
        table.reorder(&[2, 0, 1]);
        let names: Vec<&str> = table.rows().iter().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_node_card_fields_as_columns() {
        let grid = NodeCardGrid::new(vec![card("node-a", 12.345)]);
        assert_eq!(grid.column_count(), 7);
        assert_eq!(grid.item_text(0, 0).as_deref(), Some("node-a"));
        assert_eq!(grid.item_text(0, 2).as_deref(), Some("12.3"));
        assert_eq!(grid.item_text(0, 5).as_deref(), Some("12"));
        assert_eq!(grid.category(0), Some("balanced"));
        assert_eq!(grid.column_kind(1), ColumnKind::Status);
    }

    #[test]
    fn test_node_card_deserializes_visible() {
        let card: NodeCard =
            serde_json::from_str(r#"{"name":"n1","status":"Ready"}"#).expect("valid card json");
        assert!(card.visible);
        assert_eq!(card.pod_count, 0);
    }
}
