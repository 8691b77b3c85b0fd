//! Entry selection by title marker

use crate::{ServiceConfig, TimetableEntry};

/// Keep the items matching `pred`, preserving order.
pub fn filter_by<T, F>(items: &[T], pred: F) -> Vec<&T>
where
    F: Fn(&T) -> bool,
{
    items.iter().filter(|item| pred(*item)).collect()
}

/// Entries whose title contains `marker` (case-sensitive), in original order.
pub fn select<'a>(entries: &'a [TimetableEntry], marker: &str) -> Vec<&'a TimetableEntry> {
    filter_by(entries, |e| e.title.contains(marker))
}

/// Entries split into the two day groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySelection<'a> {
    pub today: Vec<&'a TimetableEntry>,
    pub tomorrow: Vec<&'a TimetableEntry>,
}

impl DaySelection<'_> {
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.tomorrow.is_empty()
    }
}

/// Split entries into today/tomorrow using the configured markers.
///
/// The groups are selected independently, so an entry whose title carries
/// both markers lands in both.
pub fn split_days<'a>(entries: &'a [TimetableEntry], config: &ServiceConfig) -> DaySelection<'a> {
    DaySelection {
        today: select(entries, &config.today_marker),
        tomorrow: select(entries, &config.tomorrow_marker),
    }
}
