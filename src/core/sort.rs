//! Column sorting for findings tables and node cards.
//!
//! Sorting is index-based: a permutation is computed from the extracted cell
//! text and then applied to the item source in one pass.

use super::items::{ColumnKind, ItemSource};
use crate::error::ReportError;
use std::cmp::Ordering;

const ARROW_UP: &str = "↑";
const ARROW_DOWN: &str = "↓";

/// Current sort column and direction of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<usize>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Same column flips the direction, a new column starts ascending.
    pub fn toggle(&mut self, column: usize) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    /// Arrow shown next to the header of `column`, if it is the active one.
    pub fn indicator(&self, column: usize) -> Option<&'static str> {
        match self.column {
            Some(active) if active == column => Some(if self.ascending {
                ARROW_UP
            } else {
                ARROW_DOWN
            }),
            _ => None,
        }
    }

    /// Header label with the sort indicator applied.
    pub fn decorate_header(&self, column: usize, label: &str) -> String {
        match self.indicator(column) {
            Some(arrow) => format!("{} {}", label, arrow),
            None => label.to_string(),
        }
    }
}

/// Result of a sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    Sorted(SortState),
    /// Nothing to sort; state left untouched.
    Empty,
}

/// Rank of a severity label. Unknown labels rank lowest.
pub fn severity_rank(text: &str) -> u8 {
    match text {
        "High" => 3,
        "Medium" => 2,
        "Low" => 1,
        _ => 0,
    }
}

/// Rank of a status cell: PASS, then FAIL, then anything else.
fn status_rank(text: &str) -> u8 {
    if text.contains("PASS") {
        0
    } else if text.contains("FAIL") {
        1
    } else {
        2
    }
}

/// Parse the longest numeric prefix of `text`, the way lenient float parsers
/// read values such as `"12 pods"` or `"85.5%"`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when complete.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Case-insensitive comparison with lowercase ordered before uppercase on ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }
    b.cmp(a)
}

/// Natural (ascending) ordering of two cells of a column of kind `kind`.
///
/// Numeric cells order before text cells so the comparison stays a total order
/// on columns that mix both.
pub fn compare_cells(kind: ColumnKind, a: &str, b: &str) -> Ordering {
    match kind {
        ColumnKind::Status => {
            let ranked = status_rank(a).cmp(&status_rank(b));
            if ranked != Ordering::Equal {
                return ranked;
            }
        }
        ColumnKind::Severity => return severity_rank(a).cmp(&severity_rank(b)),
        ColumnKind::Text => {}
    }

    match (parse_leading_number(a), parse_leading_number(b)) {
        (Some(num_a), Some(num_b)) => num_a.total_cmp(&num_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_compare(a, b),
    }
}

/// Stable sort of `source` by `column` in the given direction.
///
/// Items carrying a sort key order before items without one.
pub fn sort_items<S: ItemSource + ?Sized>(source: &mut S, column: usize, ascending: bool) {
    let kind = source.column_kind(column);
    let mut order: Vec<usize> = (0..source.len()).collect();

    order.sort_by(|&a, &b| {
        let cmp = match (source.sort_key(a, column), source.sort_key(b, column)) {
            (Some(key_a), Some(key_b)) => key_a.cmp(&key_b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => {
                let text_a = source.item_text(a, column).unwrap_or_default();
                let text_b = source.item_text(b, column).unwrap_or_default();
                compare_cells(kind, &text_a, &text_b)
            }
        };
        if ascending { cmp } else { cmp.reverse() }
    });

    source.reorder(&order);
}

/// Apply a header click: toggle `state` for `column` and reorder `source`.
pub fn sort_by_column<S: ItemSource + ?Sized>(
    source: &mut S,
    state: &mut SortState,
    column: usize,
) -> Result<SortOutcome, ReportError> {
    let columns = source.column_count();
    if column >= columns {
        return Err(ReportError::ColumnOutOfRange { column, columns });
    }
    if source.is_empty() {
        log::debug!("Sort on column {} skipped: no items", column);
        return Ok(SortOutcome::Empty);
    }

    state.toggle(column);
    sort_items(source, column, state.ascending);
    log::debug!(
        "Sorted {} items by column {}, ascending: {}",
        source.len(),
        column,
        state.ascending
    );
    Ok(SortOutcome::Sorted(*state))
}
