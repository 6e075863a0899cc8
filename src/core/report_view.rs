//! Whole-report view state: tabs, the node-card grid and printing mode.

use super::items::{NodeCardGrid, Row, RowTable};
use super::pagination::PagerConfig;
use super::section::SectionView;
use crate::error::ReportError;
use crate::report::charts::{ChartOutcome, load_panel};
use crate::report::model::{FindingsSection, MetricPanel, Report};

pub struct TabView {
    pub id: String,
    pub title: String,
    pub sections: Vec<SectionView<RowTable>>,
}

/// Pager settings for both kinds of item sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub tables: PagerConfig,
    pub cards: PagerConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tables: PagerConfig::table_rows(),
            cards: PagerConfig::node_cards(),
        }
    }
}

pub struct ReportView {
    pub cluster_name: String,
    pub generated_at: Option<String>,
    pub score: Option<f64>,
    tabs: Vec<TabView>,
    active_tab: usize,
    node_grid: SectionView<NodeCardGrid>,
    charts: Vec<(MetricPanel, ChartOutcome)>,
    printing: bool,
    warnings: Vec<String>,
}

/// Build one findings table. Problems are reported as warnings and the
/// offending rows are skipped or padded.
fn build_table(section: &FindingsSection, warnings: &mut Vec<String>) -> Option<RowTable> {
    if section.headers.is_empty() {
        let message = format!("⚠️ Section {} has no columns and was skipped", section.id);
        log::error!("Section {} has no header row", section.id);
        warnings.push(message);
        return None;
    }

    let columns = section.headers.len();
    let mut rows = Vec::with_capacity(section.rows.len());
    for (index, cells) in section.rows.iter().enumerate() {
        if cells.is_empty() {
            log::debug!("Section {}: skipping empty row {}", section.id, index);
            continue;
        }
        let mut cells = cells.clone();
        if cells.len() != columns {
            log::warn!(
                "Section {}: row {} has {} cells, expected {}",
                section.id,
                index,
                cells.len(),
                columns
            );
            warnings.push(format!(
                "⚠️ Section {}: row {} has {} cells instead of {}",
                section.id,
                index + 1,
                cells.len(),
                columns
            ));
            cells.resize(columns, String::new());
        }
        let profile = section.row_profiles.get(index).cloned().flatten();
        rows.push(Row::new(cells).with_sizing_profile(profile));
    }

    Some(
        RowTable::new(section.headers.clone(), rows)
            .with_column_kinds(&section.column_kind_overrides()),
    )
}

impl ReportView {
    pub fn new(report: Report, config: &ViewConfig) -> Self {
        let mut warnings = Vec::new();

        let tabs: Vec<TabView> = report
            .tabs
            .iter()
            .map(|tab| {
                let sections = tab
                    .sections
                    .iter()
                    .filter_map(|section| {
                        let table = build_table(section, &mut warnings)?;
                        let mut view = SectionView::new(
                            section.id.clone(),
                            section.title.clone(),
                            table,
                            config.tables.clone(),
                        );
                        if section.open {
                            view.open();
                        }
                        Some(view)
                    })
                    .collect();
                TabView {
                    id: tab.id.clone(),
                    title: tab.title.clone(),
                    sections,
                }
            })
            .collect();

        let mut node_grid = SectionView::new(
            "nodeCards",
            "Nodes",
            NodeCardGrid::new(report.node_cards),
            config.cards.clone(),
        );
        node_grid.open();

        let charts = report
            .metrics
            .into_iter()
            .map(|panel| {
                let outcome = load_panel(&panel);
                (panel, outcome)
            })
            .collect();

        Self {
            cluster_name: report.cluster_name,
            generated_at: report.generated_at,
            score: report.score,
            tabs,
            active_tab: 0,
            node_grid,
            charts,
            printing: false,
            warnings,
        }
    }

    pub fn tabs(&self) -> &[TabView] {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut [TabView] {
        &mut self.tabs
    }

    pub fn active_tab_index(&self) -> usize {
        self.active_tab
    }

    pub fn active_tab(&self) -> Option<&TabView> {
        self.tabs.get(self.active_tab)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut TabView> {
        self.tabs.get_mut(self.active_tab)
    }

    /// Activate the tab with `id` and refresh its open sections.
    pub fn switch_tab(&mut self, id: &str) -> Result<(), ReportError> {
        let index = self
            .tabs
            .iter()
            .position(|tab| tab.id == id)
            .ok_or_else(|| ReportError::TabNotFound { id: id.to_string() })?;
        self.activate(index);
        Ok(())
    }

    /// Activate the next (`forward`) or previous tab, wrapping around.
    pub fn cycle_tab(&mut self, forward: bool) {
        if self.tabs.is_empty() {
            return;
        }
        let count = self.tabs.len();
        let index = if forward {
            (self.active_tab + 1) % count
        } else {
            (self.active_tab + count - 1) % count
        };
        self.activate(index);
    }

    fn activate(&mut self, index: usize) {
        self.active_tab = index;
        let printing = self.printing;
        if let Some(tab) = self.tabs.get_mut(index) {
            for section in tab.sections.iter_mut().filter(|s| s.is_open()) {
                section.render(printing);
            }
            log::debug!("Switched to tab {}", tab.id);
        }
    }

    pub fn find_section(&self, id: &str) -> Result<&SectionView<RowTable>, ReportError> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.sections.iter())
            .find(|section| section.id() == id)
            .ok_or_else(|| ReportError::SectionNotFound { id: id.to_string() })
    }

    pub fn find_section_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut SectionView<RowTable>, ReportError> {
        self.tabs
            .iter_mut()
            .flat_map(|tab| tab.sections.iter_mut())
            .find(|section| section.id() == id)
            .ok_or_else(|| ReportError::SectionNotFound { id: id.to_string() })
    }

    pub fn all_sections(&self) -> impl Iterator<Item = &SectionView<RowTable>> {
        self.tabs.iter().flat_map(|tab| tab.sections.iter())
    }

    pub fn node_grid(&self) -> &SectionView<NodeCardGrid> {
        &self.node_grid
    }

    pub fn node_grid_mut(&mut self) -> &mut SectionView<NodeCardGrid> {
        &mut self.node_grid
    }

    pub fn charts(&self) -> &[(MetricPanel, ChartOutcome)] {
        &self.charts
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn is_printing(&self) -> bool {
        self.printing
    }

    /// Enter printing mode: every section renders expanded and unpaginated.
    pub fn begin_print(&mut self) {
        if !self.printing {
            log::info!("Preparing print: expanding sections and removing pagination");
            self.printing = true;
        }
    }

    /// Leave printing mode; open sections go back to their retained pages.
    pub fn end_print(&mut self) {
        if self.printing {
            self.printing = false;
            for section in self
                .tabs
                .iter_mut()
                .flat_map(|tab| tab.sections.iter_mut())
                .filter(|section| section.is_open())
            {
                section.render(false);
            }
            log::info!("Print finished, pagination restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::items::ItemSource;
    use crate::core::pagination::PageRequest;

    fn report() -> Report {
        let rows: Vec<Vec<String>> = (0..15)
            .map(|i| {
                vec![
                    format!("POD{:03}", i),
                    format!("pod {}", i),
                    ["High", "Medium", "Low"][i % 3].to_string(),
                ]
            })
            .collect();
        let json = serde_json::json!({
            "cluster_name": "prod-east",
            "tabs": [
                {"id": "summary", "title": "Summary", "sections": []},
                {"id": "pods", "title": "Pods", "sections": [
                    {"id": "podIssues", "title": "Show Findings", "open": true,
                     "headers": ["ID", "Pod", "Severity"], "rows": rows},
                    {"id": "broken", "title": "Show Findings", "headers": [], "rows": []},
                    {"id": "ragged", "title": "Show Findings", "headers": ["A", "B"],
                     "rows": [["only-one"], [], ["x", "y"]]}
                ]}
            ],
            "node_cards": [{"name": "n1", "status": "Ready"}],
            "metrics": [{"id": "cpu", "label": "CPU", "kind": "line", "values": "oops"}]
        });
        serde_json::from_value(json).expect("test report is valid")
    }

    #[test]
    fn test_sections_are_guarded_independently() {
        let view = ReportView::new(report(), &ViewConfig::default());
        let pods = &view.tabs()[1];
        assert_eq!(pods.sections.len(), 2);
        assert!(view.find_section("broken").is_err());

        let ragged = view.find_section("ragged").expect("ragged section kept");
        assert_eq!(ragged.source().rows().len(), 2);
        assert_eq!(ragged.source().rows()[0].cells, vec!["only-one", ""]);

        assert!(view.warnings().iter().any(|w| w.contains("broken")));
        assert!(view.warnings().iter().any(|w| w.contains("ragged")));
        assert_eq!(view.charts()[0].1.warning(), Some("⚠️ Failed to render CPU"));
    }

    #[test]
    fn test_switch_tab() {
        let mut view = ReportView::new(report(), &ViewConfig::default());
        assert_eq!(view.active_tab_index(), 0);
        view.switch_tab("pods").expect("pods tab exists");
        assert_eq!(view.active_tab().map(|t| t.id.as_str()), Some("pods"));
        assert!(matches!(
            view.switch_tab("events"),
            Err(ReportError::TabNotFound { .. })
        ));
        assert_eq!(view.active_tab_index(), 1);

        view.cycle_tab(true);
        assert_eq!(view.active_tab_index(), 0);
        view.cycle_tab(false);
        assert_eq!(view.active_tab_index(), 1);
    }

    #[test]
    fn test_print_round_trip_restores_pages() {
        let mut view = ReportView::new(report(), &ViewConfig::default());
        let section = view.find_section_mut("podIssues").expect("section exists");
        section.on_change_page(PageRequest::Next);
        assert_eq!(section.render(false).items.len(), 5);

        view.begin_print();
        assert!(view.is_printing());
        let printing = view.is_printing();
        let section = view.find_section_mut("podIssues").expect("section exists");
        assert_eq!(section.render(printing).items.len(), 15);

        view.end_print();
        let section = view.find_section("podIssues").expect("section exists");
        assert_eq!(section.page_state().current_page, 2);
        assert!(section.source().is_visible(14));
        assert!(!section.source().is_visible(0));
    }

    #[test]
    fn test_node_grid_is_open() {
        let view = ReportView::new(report(), &ViewConfig::default());
        assert!(view.node_grid().is_open());
        assert_eq!(view.node_grid().source().cards().len(), 1);
    }
}
