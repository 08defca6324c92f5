//! Pre-fetched weekly schedule listings
//!
//! The calendar collaborator supplies already-paginated episodic data: the
//! whole listing for a selection arrives with page 1, so any later page is
//! always empty and the accumulator exhausts right after the first commit.

use chrono::Weekday;
use mcb_common::config::ScheduleEntry;
use mcb_common::ContentItem;
use tracing::warn;

/// Weekly schedule data, loaded once at startup
pub struct Calendar {
    entries: Vec<(Weekday, ContentItem)>,
}

impl Calendar {
    /// Build the schedule from configuration entries.
    ///
    /// Entries with an unrecognized weekday are skipped with a diagnostic.
    pub fn from_config(entries: &[ScheduleEntry]) -> Self {
        let mut parsed = Vec::new();
        for entry in entries {
            match entry.weekday.parse::<Weekday>() {
                Ok(day) => parsed.push((day, entry.item.clone())),
                Err(_) => warn!(
                    weekday = %entry.weekday,
                    title = %entry.item.title,
                    "Schedule entry has unrecognized weekday, skipping"
                ),
            }
        }
        Self { entries: parsed }
    }

    /// One page of the schedule.
    ///
    /// Page 1 returns the listing for `weekday` (the whole week when the
    /// filter is empty or unrecognized); every later page is empty.
    pub fn page(&self, weekday: &str, page: u32) -> Vec<ContentItem> {
        if page > 1 {
            return Vec::new();
        }
        match weekday.parse::<Weekday>() {
            Ok(day) => self
                .entries
                .iter()
                .filter(|(d, _)| *d == day)
                .map(|(_, item)| item.clone())
                .collect(),
            Err(_) => self.entries.iter().map(|(_, item)| item.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
