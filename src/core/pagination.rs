use crate::error::{AppError, DisplayError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// What happens to the current page when the page size changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSizeChange {
    /// Jump back to page 1
    #[default]
    Reset,
    /// Stay on the current page, clamped to the new last page
    Clamp,
}

/// Struct to manage pagination configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PagerConfig {
    /// Item count below which pagination is skipped
    pub threshold: usize,
    pub default_page_size: usize,
    /// Candidate sizes offered by the page-size selector
    pub page_size_options: Vec<usize>,
    /// Number of page buttons in the sliding window
    pub window: usize,
    pub page_size_change: PageSizeChange,
}

impl PagerConfig {
    /// Defaults for findings tables
    pub fn table_rows() -> Self {
        Self {
            threshold: 10,
            default_page_size: 10,
            page_size_options: vec![10, 25, 50],
            window: 5,
            page_size_change: PageSizeChange::Reset,
        }
    }

    /// Defaults for the node-card grid
    pub fn node_cards() -> Self {
        Self {
            threshold: 5,
            default_page_size: 5,
            page_size_options: vec![5, 10, 25, 50],
            window: 5,
            page_size_change: PageSizeChange::Clamp,
        }
    }
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self::table_rows()
    }
}

/// Struct to manage pagination state (pages are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page_size: usize,
    pub current_page: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn total_pages(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size).max(1)
    }

    /// Restore the invariant `1 <= current_page <= total_pages`
    pub fn clamp(&mut self, item_count: usize) {
        let total = self.total_pages(item_count);
        self.current_page = self.current_page.clamp(1, total);
    }

    /// Index range of the current page within `item_count` items
    pub fn slice(&self, item_count: usize) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(item_count);
        let end = (start + self.page_size).min(item_count);
        start..end
    }

    /// Change the page size, validating against the configured options
    pub fn set_page_size(
        &mut self,
        page_size: usize,
        item_count: usize,
        config: &PagerConfig,
    ) -> Result<(), AppError> {
        if page_size == 0 {
            return Err(AppError::Display(DisplayError::Pagination(
                "Page size must be greater than 0".to_string(),
            )));
        }
        if !config.page_size_options.contains(&page_size) {
            return Err(AppError::Display(DisplayError::Pagination(format!(
                "Page size {} is not one of {:?}",
                page_size, config.page_size_options
            ))));
        }

        self.page_size = page_size;
        match config.page_size_change {
            PageSizeChange::Reset => self.current_page = 1,
            PageSizeChange::Clamp => self.clamp(item_count),
        }
        Ok(())
    }

    /// Next candidate size after the current one, wrapping around
    pub fn next_page_size(&self, config: &PagerConfig) -> usize {
        let options = &config.page_size_options;
        match options.iter().position(|&size| size == self.page_size) {
            Some(pos) => options[(pos + 1) % options.len()],
            None => options.first().copied().unwrap_or(self.page_size),
        }
    }

    pub fn apply(&mut self, request: PageRequest, item_count: usize) -> bool {
        let total = self.total_pages(item_count);
        let target = match request {
            PageRequest::Previous => self.current_page.saturating_sub(1).max(1),
            PageRequest::Next => (self.current_page + 1).min(total),
            PageRequest::First => 1,
            PageRequest::Last => total,
            PageRequest::Page(page) => page.clamp(1, total),
        };
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }
}

/// Page navigation requests issued by controls or keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Previous,
    Next,
    First,
    Last,
    Page(usize),
}

/// One element of the page selector, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageControl {
    Previous { disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { disabled: bool },
}

impl PageControl {
    pub fn label(&self) -> String {
        match self {
            PageControl::Previous { .. } => "←".to_string(),
            PageControl::Next { .. } => "→".to_string(),
            PageControl::Page { number, .. } => number.to_string(),
            PageControl::Ellipsis => "...".to_string(),
        }
    }

    pub fn aria_label(&self) -> String {
        match self {
            PageControl::Previous { .. } => "Previous page".to_string(),
            PageControl::Next { .. } => "Next page".to_string(),
            PageControl::Page { number, .. } => format!("Go to page {}", number),
            PageControl::Ellipsis => String::new(),
        }
    }

    /// Request issued when the control is activated, if it is clickable
    pub fn request(&self) -> Option<PageRequest> {
        match self {
            PageControl::Previous { disabled: false } => Some(PageRequest::Previous),
            PageControl::Next { disabled: false } => Some(PageRequest::Next),
            PageControl::Page { number, .. } => Some(PageRequest::Page(*number)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeSelector {
    pub options: Vec<usize>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub buttons: Vec<PageControl>,
    pub page_size: PageSizeSelector,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Result of paginating a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Positions (within the filtered item list) that are visible
    pub visible: Range<usize>,
    pub total_items: usize,
    pub controls: Option<PaginationControls>,
}

impl PageView {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Generate pagination information string
    pub fn info(&self) -> String {
        if self.total_items == 0 {
            return "No records found".to_string();
        }
        match &self.controls {
            Some(controls) => format!(
                "Showing {}-{} of {} records (Page {}/{})",
                self.visible.start + 1,
                self.visible.end,
                self.total_items,
                controls.current_page,
                controls.total_pages
            ),
            None => format!("Showing all {} records", self.total_items),
        }
    }
}

/// First and last page number of the sliding window
pub fn page_window(current_page: usize, total_pages: usize, window: usize) -> (usize, usize) {
    let window = window.max(1);
    if total_pages <= window {
        return (1, total_pages.max(1));
    }

    let half = window / 2;
    let mut start = current_page.saturating_sub(half).max(1);
    let mut end = start + window - 1;
    if end > total_pages {
        end = total_pages;
        start = (end + 1).saturating_sub(window).max(1);
    }
    (start, end)
}

/// Build the page selector for `current_page` of `total_pages`
pub fn build_controls(
    current_page: usize,
    total_pages: usize,
    page_size: usize,
    config: &PagerConfig,
) -> PaginationControls {
    let (start, end) = page_window(current_page, total_pages, config.window);
    let mut buttons = vec![PageControl::Previous {
        disabled: current_page == 1,
    }];

    if start > 1 {
        buttons.push(PageControl::Page {
            number: 1,
            active: false,
        });
        if start > 2 {
            buttons.push(PageControl::Ellipsis);
        }
    }

    for number in start..=end {
        buttons.push(PageControl::Page {
            number,
            active: number == current_page,
        });
    }

    if end < total_pages {
        if end < total_pages - 1 {
            buttons.push(PageControl::Ellipsis);
        }
        buttons.push(PageControl::Page {
            number: total_pages,
            active: current_page == total_pages,
        });
    }

    buttons.push(PageControl::Next {
        disabled: current_page == total_pages,
    });

    PaginationControls {
        buttons,
        page_size: PageSizeSelector {
            options: config.page_size_options.clone(),
            selected: page_size,
        },
        current_page,
        total_pages,
    }
}

/// Compute the visible slice and controls for `item_count` items.
///
/// `printing` bypasses pagination entirely. Below the threshold every item is
/// visible and no controls are produced. Otherwise `state` is clamped first so
/// the invariant holds even after the item count changed.
pub fn paginate(
    item_count: usize,
    state: &mut PageState,
    config: &PagerConfig,
    printing: bool,
) -> PageView {
    if printing {
        return PageView {
            visible: 0..item_count,
            total_items: item_count,
            controls: None,
        };
    }

    if item_count < config.threshold {
        state.current_page = 1;
        return PageView {
            visible: 0..item_count,
            total_items: item_count,
            controls: None,
        };
    }

    state.clamp(item_count);
    let total_pages = state.total_pages(item_count);
    PageView {
        visible: state.slice(item_count),
        total_items: item_count,
        controls: Some(build_controls(
            state.current_page,
            total_pages,
            state.page_size,
            config,
        )),
    }
}
