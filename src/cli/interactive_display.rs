//! Full-screen report browser.
//!
//! Key handling is split into a pure [`map_key`] and [`Browser::apply`] so the
//! state machine can be driven without a terminal. `run` only owns the
//! crossterm event loop.

use crate::core::filter::{FilterDebouncer, ItemFilter};
use crate::core::items::RowTable;
use crate::core::pagination::PageRequest;
use crate::core::report_view::ReportView;
use crate::core::section::SectionView;
use crate::display::TableDisplay;
use crate::error::{AppError, DisplayError};
use crate::report::export::export_section;
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode, size,
    },
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// Which item source the browser is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sections,
    Nodes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    Quit,
    NextTab,
    PreviousTab,
    NextSection,
    PreviousSection,
    ToggleSection,
    Page(PageRequest),
    CyclePageSize,
    /// Sort by 0-based column
    Sort(usize),
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    FilterCommit,
    FilterCancel,
    Export,
    SwitchPane,
    ScrollUp,
    ScrollDown,
    Help,
}

/// Translate a key press. `editing_filter` switches to text-entry bindings.
pub fn map_key(key: KeyEvent, editing_filter: bool) -> Option<BrowserAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(BrowserAction::Quit);
    }

    if editing_filter {
        return match key.code {
            KeyCode::Enter => Some(BrowserAction::FilterCommit),
            KeyCode::Esc => Some(BrowserAction::FilterCancel),
            KeyCode::Backspace => Some(BrowserAction::FilterBackspace),
            KeyCode::Char(c) => Some(BrowserAction::FilterInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(BrowserAction::Quit),
        KeyCode::Tab => Some(BrowserAction::NextTab),
        KeyCode::BackTab => Some(BrowserAction::PreviousTab),
        KeyCode::Down | KeyCode::Char('j') => Some(BrowserAction::NextSection),
        KeyCode::Up | KeyCode::Char('k') => Some(BrowserAction::PreviousSection),
        KeyCode::Enter | KeyCode::Char(' ') => Some(BrowserAction::ToggleSection),
        KeyCode::Right | KeyCode::Char('n') => Some(BrowserAction::Page(PageRequest::Next)),
        KeyCode::Left | KeyCode::Char('p') => Some(BrowserAction::Page(PageRequest::Previous)),
        KeyCode::Home => Some(BrowserAction::Page(PageRequest::First)),
        KeyCode::End => Some(BrowserAction::Page(PageRequest::Last)),
        KeyCode::Char('s') => Some(BrowserAction::CyclePageSize),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|d| BrowserAction::Sort(d as usize - 1)),
        KeyCode::Char('/') => Some(BrowserAction::StartFilter),
        KeyCode::Char('e') => Some(BrowserAction::Export),
        KeyCode::Char('v') => Some(BrowserAction::SwitchPane),
        KeyCode::PageUp => Some(BrowserAction::ScrollUp),
        KeyCode::PageDown => Some(BrowserAction::ScrollDown),
        KeyCode::Char('h') | KeyCode::Char('?') => Some(BrowserAction::Help),
        _ => None,
    }
}

/// Parse filter input: a `profile:<name>` token selects a sizing profile,
/// everything else is free text.
pub fn parse_filter_input(input: &str) -> ItemFilter {
    let mut profile = None;
    let mut words = Vec::new();
    for word in input.split_whitespace() {
        match word.strip_prefix("profile:") {
            Some(name) if !name.is_empty() => profile = Some(name.to_string()),
            _ => words.push(word),
        }
    }
    let text = (!words.is_empty()).then(|| words.join(" "));
    ItemFilter::new(text, profile)
}

pub struct Browser {
    view: ReportView,
    pane: Pane,
    selected: usize,
    filter_input: Option<String>,
    debouncer: FilterDebouncer,
    export_dir: PathBuf,
    status: Option<String>,
    scroll: usize,
    show_help: bool,
}

impl Browser {
    pub fn new(view: ReportView, debounce: Duration, export_dir: PathBuf) -> Self {
        Self {
            view,
            pane: Pane::Sections,
            selected: 0,
            filter_input: None,
            debouncer: FilterDebouncer::new(debounce),
            export_dir,
            status: None,
            scroll: 0,
            show_help: false,
        }
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_editing_filter(&self) -> bool {
        self.filter_input.is_some()
    }

    fn section_count(&self) -> usize {
        self.view.active_tab().map_or(0, |tab| tab.sections.len())
    }

    fn selected_section_mut(&mut self) -> Option<&mut SectionView<RowTable>> {
        let selected = self.selected;
        self.view
            .active_tab_mut()
            .and_then(|tab| tab.sections.get_mut(selected))
    }

    fn apply_filter(&mut self, filter: ItemFilter) {
        match self.pane {
            Pane::Nodes => self.view.node_grid_mut().set_filter(filter),
            Pane::Sections => {
                if let Some(section) = self.selected_section_mut() {
                    section.set_filter(filter);
                }
            }
        }
    }

    fn report_error(&mut self, error: AppError) {
        log::warn!("{}", error);
        self.status = Some(format!("{} {}", error.severity().emoji(), error.display_friendly()));
    }

    /// Apply one action. Returns `false` when the browser should exit.
    pub fn apply(&mut self, action: BrowserAction, now: Instant) -> bool {
        if !matches!(action, BrowserAction::Help) {
            self.show_help = false;
        }
        match action {
            BrowserAction::Quit => return false,
            BrowserAction::NextTab | BrowserAction::PreviousTab => {
                self.view.cycle_tab(action == BrowserAction::NextTab);
                self.selected = 0;
                self.scroll = 0;
                self.pane = Pane::Sections;
            }
            BrowserAction::NextSection => {
                if self.selected + 1 < self.section_count() {
                    self.selected += 1;
                }
            }
            BrowserAction::PreviousSection => self.selected = self.selected.saturating_sub(1),
            BrowserAction::ToggleSection => {
                if let Some(section) = self.selected_section_mut() {
                    section.toggle();
                }
            }
            BrowserAction::Page(request) => match self.pane {
                Pane::Nodes => {
                    self.view.node_grid_mut().on_change_page(request);
                }
                Pane::Sections => {
                    if let Some(section) = self.selected_section_mut() {
                        section.on_change_page(request);
                    }
                }
            },
            BrowserAction::CyclePageSize => {
                let result = match self.pane {
                    Pane::Nodes => Some(self.view.node_grid_mut().cycle_page_size()),
                    Pane::Sections => self
                        .selected_section_mut()
                        .map(|section| section.cycle_page_size()),
                };
                match result {
                    Some(Ok(size)) => self.status = Some(format!("{} per page", size)),
                    Some(Err(e)) => self.report_error(e),
                    None => {}
                }
            }
            BrowserAction::Sort(column) => {
                let result = match self.pane {
                    Pane::Nodes => Some(self.view.node_grid_mut().on_sort_column(column)),
                    Pane::Sections => self
                        .selected_section_mut()
                        .filter(|section| section.is_open())
                        .map(|section| section.on_sort_column(column)),
                };
                if let Some(Err(e)) = result {
                    self.report_error(e.into());
                }
            }
            BrowserAction::StartFilter => {
                self.filter_input = Some(String::new());
            }
            BrowserAction::FilterInput(c) => {
                if let Some(input) = self.filter_input.as_mut() {
                    input.push(c);
                    let value = input.clone();
                    self.debouncer.input(value, now);
                }
            }
            BrowserAction::FilterBackspace => {
                if let Some(input) = self.filter_input.as_mut() {
                    input.pop();
                    let value = input.clone();
                    self.debouncer.input(value, now);
                }
            }
            BrowserAction::FilterCommit => {
                self.debouncer.cancel();
                if let Some(input) = self.filter_input.take() {
                    self.apply_filter(parse_filter_input(&input));
                }
            }
            BrowserAction::FilterCancel => {
                self.debouncer.cancel();
                self.filter_input = None;
                self.apply_filter(ItemFilter::default());
            }
            BrowserAction::Export => self.export_selected(),
            BrowserAction::SwitchPane => {
                self.pane = match self.pane {
                    Pane::Sections => Pane::Nodes,
                    Pane::Nodes => Pane::Sections,
                };
                self.scroll = 0;
            }
            BrowserAction::ScrollUp => self.scroll = self.scroll.saturating_sub(10),
            BrowserAction::ScrollDown => self.scroll += 10,
            BrowserAction::Help => self.show_help = !self.show_help,
        }
        true
    }

    /// Apply a debounced filter once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(input) = self.debouncer.poll(now) {
            log::debug!("Applying filter '{}'", input);
            self.apply_filter(parse_filter_input(&input));
        }
    }

    fn export_selected(&mut self) {
        let cluster_name = self.view.cluster_name.clone();
        let export_dir = self.export_dir.clone();
        let result = match self.selected_section_mut() {
            Some(section) => export_section(section, &cluster_name, &export_dir, Local::now()),
            None => return,
        };
        match result {
            Ok(path) => self.status = Some(format!("✅ Exported to {}", path.display())),
            Err(e) => self.report_error(e),
        }
    }

    /// Screen contents for the current state, one entry per line.
    pub fn render_lines(&mut self, display: &TableDisplay) -> Result<Vec<String>, AppError> {
        if self.show_help {
            return Ok(HELP.lines().map(str::to_string).collect());
        }

        let mut text = display.render_summary(&self.view);
        text.push('\n');
        text.push_str(&display.render_tab_bar(&self.view));
        text.push('\n');

        match self.pane {
            Pane::Nodes => {
                let grid = self.view.node_grid_mut();
                let page = grid.render(false);
                text.push_str("\nNodes\n");
                text.push_str(&display.render_node_grid(grid, &page)?);
            }
            Pane::Sections => {
                let selected = self.selected;
                if let Some(tab) = self.view.active_tab_mut() {
                    if tab.sections.is_empty() {
                        text.push_str("\nNo findings sections on this tab");
                    }
                    for (index, section) in tab.sections.iter_mut().enumerate() {
                        let page = section.render(false);
                        let marker = if index == selected { "> " } else { "  " };
                        text.push('\n');
                        text.push_str(marker);
                        text.push_str(&display.render_section(section, &page, false)?);
                        text.push('\n');
                    }
                }
            }
        }

        let charts = display.render_charts(self.view.charts());
        if !charts.is_empty() && self.pane == Pane::Sections {
            text.push('\n');
            text.push_str(&charts);
        }
        Ok(text.lines().map(str::to_string).collect())
    }

    fn footer(&self) -> String {
        match &self.filter_input {
            Some(input) => format!("Filter: {}_  (Enter apply, Esc clear)", input),
            None => match &self.status {
                Some(status) => status.clone(),
                None => {
                    "Tab=tabs | ↑↓=section | Enter=toggle | ←→=page | s=size | 1-9=sort | /=filter | e=export | v=nodes | q=quit"
                        .to_string()
                }
            },
        }
    }

    fn draw(&mut self, display: &TableDisplay) -> Result<(), AppError> {
        let (_width, height) = size().unwrap_or((80, 24));
        let body_height = height.saturating_sub(2) as usize;
        let lines = self.render_lines(display)?;
        self.scroll = self.scroll.min(lines.len().saturating_sub(body_height));

        let mut stdout = io::stdout();
        let draw_error = |e: io::Error| DisplayError::TerminalOutput(e.to_string());
        execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0)).map_err(draw_error)?;
        for line in lines.iter().skip(self.scroll).take(body_height) {
            execute!(stdout, Print(line), Print("\r\n")).map_err(draw_error)?;
        }
        execute!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::Green),
            Print(self.footer()),
            ResetColor
        )
        .map_err(draw_error)?;
        stdout.flush().map_err(draw_error)?;
        Ok(())
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self, display: &TableDisplay) -> Result<(), AppError> {
        // RAII cleanup structures
        struct RawModeCleanup;
        impl Drop for RawModeCleanup {
            fn drop(&mut self) {
                let _ = disable_raw_mode();
            }
        }

        struct ScreenCleanup;
        impl Drop for ScreenCleanup {
            fn drop(&mut self) {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            }
        }

        let terminal_error = |e: io::Error| DisplayError::TerminalOutput(e.to_string());
        enable_raw_mode().map_err(terminal_error)?;
        let _cleanup = RawModeCleanup;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide).map_err(terminal_error)?;
        let _screen_cleanup = ScreenCleanup;

        loop {
            self.draw(display)?;

            let timeout = self
                .debouncer
                .remaining(Instant::now())
                .unwrap_or(IDLE_POLL);
            if event::poll(timeout).map_err(terminal_error)? {
                if let Event::Key(key) = event::read().map_err(terminal_error)? {
                    if let Some(action) = map_key(key, self.is_editing_filter()) {
                        if !self.apply(action, Instant::now()) {
                            break;
                        }
                    }
                }
            }
            self.tick(Instant::now());
        }
        Ok(())
    }
}

const HELP: &str = "Keyboard Navigation Help

Tabs and sections:
  Tab / Shift+Tab : Next / previous tab
  ↑, k / ↓, j     : Select section
  Enter, Space    : Show / hide section
  v               : Switch between findings and node cards

Pages:
  ←, p / →, n     : Previous / next page
  Home / End      : First / last page
  s               : Cycle page size

Other:
  1-9             : Sort by column (again to reverse)
  /               : Filter (profile:<name> selects a sizing profile)
  e               : Export section as CSV
  Page Up/Down    : Scroll
  q, Esc, Ctrl+C  : Quit
  h, ?            : Toggle this help";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report_view::ViewConfig;
    use crate::report::model::Report;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn browser(export_dir: PathBuf) -> Browser {
        let rows: Vec<Vec<String>> = (0..23)
            .map(|i| vec![format!("pod-{:02}", i), (i % 4).to_string()])
            .collect();
        let cards: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "name": format!("node-{}", i),
                    "status": "Ready",
                    "sizing_profile": if i < 3 { "balanced" } else { "memory-heavy" }
                })
            })
            .collect();
        let report: Report = serde_json::from_value(serde_json::json!({
            "cluster_name": "prod",
            "tabs": [
                {"id": "pods", "title": "Pods", "sections": [
                    {"id": "podIssues", "title": "Show Findings", "headers": ["Pod", "Restarts"], "rows": rows},
                    {"id": "empty", "title": "Show Findings", "headers": ["Pod"], "rows": []}
                ]},
                {"id": "nodes", "title": "Nodes", "sections": []}
            ],
            "node_cards": cards
        }))
        .expect("valid report");
        Browser::new(
            ReportView::new(report, &ViewConfig::default()),
            Duration::from_millis(300),
            export_dir,
        )
    }

    #[test]
    fn test_map_key_modes() {
        assert_eq!(map_key(key(KeyCode::Char('q')), false), Some(BrowserAction::Quit));
        assert_eq!(
            map_key(key(KeyCode::Char('q')), true),
            Some(BrowserAction::FilterInput('q'))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('3')), false),
            Some(BrowserAction::Sort(2))
        );
        assert_eq!(
            map_key(key(KeyCode::End), false),
            Some(BrowserAction::Page(PageRequest::Last))
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, true), Some(BrowserAction::Quit));
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('n'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(map_key(release, false), None);
    }

    #[test]
    fn test_parse_filter_input() {
        let filter = parse_filter_input("profile:balanced  node 1 ");
        assert_eq!(filter, ItemFilter::new(Some("node 1".to_string()), Some("balanced".to_string())));
        assert!(!parse_filter_input("   ").is_active());
    }

    #[test]
    fn test_toggle_page_and_sort() {
        let dir = tempdir().expect("temp dir");
        let mut browser = browser(dir.path().to_path_buf());
        let now = Instant::now();

        assert!(browser.apply(BrowserAction::ToggleSection, now));
        assert!(browser.apply(BrowserAction::Page(PageRequest::Last), now));
        let section = browser.view().find_section("podIssues").expect("section exists");
        assert_eq!(section.page_state().current_page, 3);

        browser.apply(BrowserAction::Sort(1), now);
        let section = browser.view().find_section("podIssues").expect("section exists");
        assert_eq!(section.page_state().current_page, 1);
        assert_eq!(section.source().rows()[0].cells[1], "0");

        browser.apply(BrowserAction::Sort(9), now);
        assert!(browser.status().is_some());

        assert!(!browser.apply(BrowserAction::Quit, now));
    }

    #[test]
    fn test_debounced_node_filter() {
        let dir = tempdir().expect("temp dir");
        let mut browser = browser(dir.path().to_path_buf());
        let start = Instant::now();

        browser.apply(BrowserAction::SwitchPane, start);
        assert_eq!(browser.pane(), Pane::Nodes);
        browser.apply(BrowserAction::StartFilter, start);
        assert!(browser.is_editing_filter());
        for c in "profile:balanced".chars() {
            browser.apply(BrowserAction::FilterInput(c), start);
        }

        browser.tick(start + Duration::from_millis(100));
        assert!(!browser.view().node_grid().filter().is_active());

        browser.tick(start + Duration::from_millis(300));
        assert_eq!(browser.view().node_grid().matching_count(), 3);

        browser.apply(BrowserAction::FilterCancel, start);
        assert_eq!(browser.view().node_grid().matching_count(), 8);
    }

    #[test]
    fn test_export_and_render() {
        let dir = tempdir().expect("temp dir");
        let mut browser = browser(dir.path().to_path_buf());
        browser.apply(BrowserAction::Export, Instant::now());
        assert!(browser.status().is_some_and(|s| s.starts_with("✅")));
        let exported = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(exported, 1);

        browser.apply(BrowserAction::ToggleSection, Instant::now());
        let display = TableDisplay::new().with_colors(false).with_max_width(100);
        let lines = browser.render_lines(&display).expect("render works");
        assert!(lines.iter().any(|l| l.contains("> ▼ Hide Findings [podIssues]")));
        assert!(lines.iter().any(|l| l.contains("Page 1/3")));

        browser.apply(BrowserAction::NextTab, Instant::now());
        let lines = browser.render_lines(&display).expect("render works");
        assert!(lines.iter().any(|l| l.contains("No findings sections")));
    }
}
