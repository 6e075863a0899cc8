//! Item filtering and input debouncing.

use super::items::ItemSource;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Text and sizing-profile filter over an item source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against every column
    pub text: Option<String>,
    /// Exact (case-insensitive) sizing profile
    pub profile: Option<String>,
}

impl ItemFilter {
    pub fn new(text: Option<String>, profile: Option<String>) -> Self {
        let normalize = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            text: normalize(text),
            profile: normalize(profile),
        }
    }

    pub fn is_active(&self) -> bool {
        self.text.is_some() || self.profile.is_some()
    }

    pub fn matches<S: ItemSource + ?Sized>(&self, source: &S, index: usize) -> bool {
        if let Some(profile) = &self.profile {
            match source.category(index) {
                Some(category) if category.eq_ignore_ascii_case(profile) => {}
                _ => return false,
            }
        }

        match &self.text {
            Some(needle) => {
                let needle = needle.to_lowercase();
                (0..source.column_count()).any(|column| {
                    source
                        .item_text(index, column)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
            None => true,
        }
    }

    /// Indices of matching items, in source order.
    pub fn matching_indices<S: ItemSource + ?Sized>(&self, source: &S) -> Vec<usize> {
        (0..source.len())
            .filter(|&index| self.matches(source, index))
            .collect()
    }
}

/// Delays filter input until typing pauses.
///
/// Each keystroke restarts the delay; the pending value is released once the
/// delay has elapsed without further input.
#[derive(Debug, Clone)]
pub struct FilterDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl FilterDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record new input at `now`, cancelling any pending value.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value is released.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for FilterDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
