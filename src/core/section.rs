//! Collapsible section view model.
//!
//! A section owns one item source plus its sort, page and filter state and
//! exposes the handlers the front end calls on user input. Rendering asks for
//! a [`SectionPage`], which also recomputes each item's visibility flag.

use super::filter::ItemFilter;
use super::items::ItemSource;
use super::pagination::{PageRequest, PageState, PageView, PagerConfig, paginate};
use super::sort::{SortOutcome, SortState, sort_by_column};
use crate::error::{AppError, ReportError};

/// Items to show for one render of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPage {
    pub page: PageView,
    /// Source indices of the visible items, in display order
    pub items: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SectionView<S> {
    id: String,
    title: String,
    source: S,
    config: PagerConfig,
    open: bool,
    sort: SortState,
    page: PageState,
    filter: ItemFilter,
}

impl<S: ItemSource> SectionView<S> {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        source: S,
        config: PagerConfig,
    ) -> Self {
        let page = PageState::new(config.default_page_size);
        Self {
            id: id.into(),
            title: title.into(),
            source,
            config,
            open: false,
            sort: SortState::default(),
            page,
            filter: ItemFilter::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the section. Opening a closed section re-initializes its sort and
    /// page state; the item order is kept.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.sort = SortState::default();
        self.page = PageState::new(self.config.default_page_size);
        log::debug!("Section {} opened", self.id);
    }

    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            log::debug!("Section {} closed", self.id);
        }
    }

    /// Flip the open state and return the new one.
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    /// Summary text with "Show"/"Hide" matching the open state.
    pub fn summary_label(&self) -> String {
        let base = self
            .title
            .strip_prefix("Show ")
            .or_else(|| self.title.strip_prefix("Hide "))
            .unwrap_or(&self.title);
        if self.open {
            format!("Hide {}", base)
        } else {
            format!("Show {}", base)
        }
    }

    /// Header labels with the sort indicator on the active column.
    pub fn headers(&self) -> Vec<String> {
        (0..self.source.column_count())
            .map(|column| {
                let label = self.source.column_label(column).unwrap_or_default();
                self.sort.decorate_header(column, &label)
            })
            .collect()
    }

    /// Header click handler. A successful sort returns to the first page.
    pub fn on_sort_column(&mut self, column: usize) -> Result<SortOutcome, ReportError> {
        let outcome = sort_by_column(&mut self.source, &mut self.sort, column)?;
        if matches!(outcome, SortOutcome::Sorted(_)) {
            self.page.current_page = 1;
        }
        Ok(outcome)
    }

    /// Page button handler. Returns whether the page changed.
    pub fn on_change_page(&mut self, request: PageRequest) -> bool {
        let count = self.matching_count();
        self.page.apply(request, count)
    }

    /// Page-size selector handler.
    pub fn on_change_page_size(&mut self, page_size: usize) -> Result<(), AppError> {
        let count = self.matching_count();
        self.page.set_page_size(page_size, count, &self.config)?;
        log::debug!(
            "Section {} page size set to {}, page {}",
            self.id,
            page_size,
            self.page.current_page
        );
        Ok(())
    }

    /// Advance the page-size selector to its next option.
    pub fn cycle_page_size(&mut self) -> Result<usize, AppError> {
        let next = self.page.next_page_size(&self.config);
        self.on_change_page_size(next)?;
        Ok(next)
    }

    /// Replace the filter; the current page is clamped to the new item count.
    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = filter;
        let count = self.matching_count();
        self.page.clamp(count);
    }

    pub fn matching_indices(&self) -> Vec<usize> {
        if self.filter.is_active() {
            self.filter.matching_indices(&self.source)
        } else {
            (0..self.source.len()).collect()
        }
    }

    pub fn matching_count(&self) -> usize {
        if self.filter.is_active() {
            self.matching_indices().len()
        } else {
            self.source.len()
        }
    }

    /// Compute the current page and update item visibility.
    ///
    /// A closed section shows nothing unless `printing` is set, which expands
    /// every section and shows every matching item.
    pub fn render(&mut self, printing: bool) -> SectionPage {
        let matching = self.matching_indices();

        if !self.open && !printing {
            for index in 0..self.source.len() {
                self.source.set_visible(index, false);
            }
            return SectionPage {
                page: PageView {
                    visible: 0..0,
                    total_items: matching.len(),
                    controls: None,
                },
                items: Vec::new(),
            };
        }

        let page = paginate(matching.len(), &mut self.page, &self.config, printing);
        let items: Vec<usize> = matching[page.visible.clone()].to_vec();

        let mut shown = vec![false; self.source.len()];
        for &index in &items {
            shown[index] = true;
        }
        for (index, visible) in shown.into_iter().enumerate() {
            self.source.set_visible(index, visible);
        }

        SectionPage { page, items }
    }
}
