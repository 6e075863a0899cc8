use crate::core::items::{ColumnKind, ItemSource, NodeCardGrid, RowTable};
use crate::core::pagination::{PageControl, PaginationControls};
use crate::core::report_view::ReportView;
use crate::core::section::{SectionPage, SectionView};
use crate::core::sort::severity_rank;
use crate::error::AppError;
use crate::report::charts::{ChartOutcome, render_chart, sparkline};
use crate::report::model::MetricPanel;
use crate::report::score::{ScoreBand, score_bar};
use crate::utils::text::truncate_with_ellipsis;
use comfy_table::{Attribute, Cell, Color, Table, presets};
use crossterm::terminal;

/// Widest a single cell may get before it is cut with "..."
const MAX_CELL_WIDTH: usize = 60;

/// Formatter and utilities for table display
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

const MIN_WIDTH: usize = 40;
const MAX_WIDTH: usize = 200;

impl TableDisplay {
    /// Create a new TableDisplay instance
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    /// Detect terminal width
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(MIN_WIDTH, MAX_WIDTH)),
            Err(_) => Some(80),
        }
    }

    /// Create a TableDisplay instance with maximum width setting, clamped like
    /// the detected terminal width
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width.clamp(MIN_WIDTH, MAX_WIDTH));
        self
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        if !self.use_colors {
            table.force_no_tty();
        }
        table
    }

    fn configure_table_width(&self, table: &mut Table) {
        let terminal_width = self.max_width.unwrap_or(80).clamp(MIN_WIDTH, MAX_WIDTH);
        // borders and padding
        let available_width = if terminal_width > 20 {
            terminal_width - 6
        } else {
            terminal_width.max(40)
        };
        table.set_width(available_width as u16);
    }

    fn header_cell(&self, label: &str) -> Cell {
        if self.use_colors {
            Cell::new(label)
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan)
        } else {
            Cell::new(label)
        }
    }

    /// Cell colored by its column semantics
    fn value_cell(&self, kind: ColumnKind, text: &str) -> Cell {
        let cell = Cell::new(truncate_with_ellipsis(text, MAX_CELL_WIDTH));
        if !self.use_colors {
            return cell;
        }
        match kind {
            ColumnKind::Severity => match severity_rank(text) {
                3 => cell.fg(Color::Red).add_attribute(Attribute::Bold),
                2 => cell.fg(Color::Yellow),
                1 => cell.fg(Color::Blue),
                _ => cell,
            },
            ColumnKind::Status => {
                if text.contains("FAIL") {
                    cell.fg(Color::Red)
                } else if text.contains("PASS") || text.contains("Ready") {
                    cell.fg(Color::Green)
                } else {
                    cell.fg(Color::Yellow)
                }
            }
            ColumnKind::Text => cell,
        }
    }

    fn render_items<S: ItemSource>(&self, section: &SectionView<S>, items: &[usize]) -> Table {
        let source = section.source();
        let mut table = self.new_table();
        table.set_header(
            section
                .headers()
                .iter()
                .map(|label| self.header_cell(label))
                .collect::<Vec<_>>(),
        );
        for &index in items {
            let row: Vec<Cell> = (0..source.column_count())
                .map(|column| {
                    let text = source.item_text(index, column).unwrap_or_default();
                    self.value_cell(source.column_kind(column), &text)
                })
                .collect();
            table.add_row(row);
        }
        table
    }

    /// Section title line: `▼ Hide Findings [podIssues]`
    pub fn render_section_title<S: ItemSource>(&self, section: &SectionView<S>) -> String {
        let marker = if section.is_open() { "▼" } else { "▶" };
        format!("{} {} [{}]", marker, section.summary_label(), section.id())
    }

    /// Render one findings section at its current page.
    pub fn render_section(
        &self,
        section: &SectionView<RowTable>,
        page: &SectionPage,
        printing: bool,
    ) -> Result<String, AppError> {
        let mut output = self.render_section_title(section);
        if !section.is_open() && !printing {
            return Ok(output);
        }
        output.push('\n');
        if page.page.total_items == 0 {
            output.push_str(&page.page.info());
            return Ok(output);
        }
        output.push_str(&self.render_items(section, &page.items).to_string());
        output.push('\n');
        output.push_str(&page.page.info());
        if let Some(controls) = &page.page.controls {
            output.push('\n');
            output.push_str(&self.render_controls(controls));
        }
        Ok(output)
    }

    /// Render the node-card grid with each node's CPU trend.
    pub fn render_node_grid(
        &self,
        grid: &SectionView<NodeCardGrid>,
        page: &SectionPage,
    ) -> Result<String, AppError> {
        let source = grid.source();
        let mut output = String::new();
        if page.page.total_items == 0 {
            output.push_str(&page.page.info());
            return Ok(output);
        }

        let table = self.render_items(grid, &page.items);
        let mut trends = self.new_table();
        trends.set_header(vec![self.header_cell("Node"), self.header_cell("CPU trend")]);
        for &index in &page.items {
            if let Some(card) = source.cards().get(index) {
                trends.add_row(vec![
                    Cell::new(&card.name),
                    Cell::new(sparkline(&card.cpu_trend)),
                ]);
            }
        }

        output.push_str(&table.to_string());
        if page
            .items
            .iter()
            .any(|&i| source.cards().get(i).is_some_and(|c| !c.cpu_trend.is_empty()))
        {
            output.push('\n');
            output.push_str(&trends.to_string());
        }
        output.push('\n');
        output.push_str(&page.page.info());
        if let Some(controls) = &page.page.controls {
            output.push('\n');
            output.push_str(&self.render_controls(controls));
        }
        Ok(output)
    }

    /// Page buttons and size selector, e.g.
    /// `(←) [1] 2 3 ... 9 → | 10 per page (10/25/50)`
    pub fn render_controls(&self, controls: &PaginationControls) -> String {
        let buttons: Vec<String> = controls
            .buttons
            .iter()
            .map(|control| match control {
                PageControl::Previous { disabled: true } | PageControl::Next { disabled: true } => {
                    format!("({})", control.label())
                }
                PageControl::Page { active: true, .. } => format!("[{}]", control.label()),
                _ => control.label(),
            })
            .collect();
        let options = controls
            .page_size
            .options
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{} | {} per page ({})",
            buttons.join(" "),
            controls.page_size.selected,
            options
        )
    }

    /// Cluster name, generation time and the colored score bar.
    pub fn render_summary(&self, view: &ReportView) -> String {
        let mut output = format!("Cluster: {}", view.cluster_name);
        if let Some(generated_at) = &view.generated_at {
            output.push_str(&format!("\nGenerated: {}", generated_at));
        }
        if let Some(score) = view.score {
            let band = ScoreBand::from_score(score);
            let bar = score_bar(score, 20);
            let mut table = self.new_table();
            table.load_preset(presets::NOTHING);
            let bar_cell = if self.use_colors {
                Cell::new(bar).fg(band.color())
            } else {
                Cell::new(bar)
            };
            table.add_row(vec![
                Cell::new("Health score"),
                bar_cell,
                Cell::new(format!("{:.0}/100 ({})", score, band.label())),
            ]);
            output.push('\n');
            output.push_str(&table.to_string());
        }
        output
    }

    /// Tab bar with the active tab in brackets.
    pub fn render_tab_bar(&self, view: &ReportView) -> String {
        view.tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                if index == view.active_tab_index() {
                    format!("[{}]", tab.title)
                } else {
                    format!(" {} ", tab.title)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn render_charts(&self, charts: &[(MetricPanel, ChartOutcome)]) -> String {
        charts
            .iter()
            .map(|(panel, outcome)| match outcome {
                ChartOutcome::Rendered(data) => render_chart(&panel.label, &panel.unit, data),
                ChartOutcome::Warning(message) => message.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_warnings(&self, warnings: &[String]) -> String {
        warnings.join("\n")
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}
