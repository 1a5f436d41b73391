// src/window.rs
//! # Per-company history window
//! Newest-first bounded store of previously screened stories, plus the
//! registry mapping company identifiers to their windows.
//!
//! Pruning is lazy: entries older than the look-back horizon are dropped only
//! while traversing the window for the next story of the same company, never
//! on a timer. A company with no recent activity may therefore hold a stale
//! window until its next story arrives; callers must not assume the window
//! is current without a fresh probe.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::story::TokenizedStory;

/// Time-ordered sequence of shared story references, newest first.
#[derive(Debug, Default)]
pub struct HistoryWindow {
    entries: VecDeque<Arc<TokenizedStory>>,
}

impl HistoryWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend the just-screened story. Callers insert after classification,
    /// so a story never sees itself as a neighbor.
    pub fn push_front(&mut self, story: Arc<TokenizedStory>) {
        self.entries.push_front(story);
    }

    /// Entry at `idx`, counted from the newest.
    pub fn get(&self, idx: usize) -> Option<&Arc<TokenizedStory>> {
        self.entries.get(idx)
    }

    /// Drop everything at index `from` and older. Returns the number of
    /// entries removed. This tail trim is the only way a window shrinks.
    pub fn truncate_tail(&mut self, from: usize) -> usize {
        let pruned = self.entries.len().saturating_sub(from);
        self.entries.truncate(from);
        pruned
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TokenizedStory>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Company identifier → window. Keys are created lazily on first reference
/// and never removed; the registry owns every window for the process
/// lifetime (or until the registry itself is dropped).
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<String, HistoryWindow>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the company's window, creating an empty one on first reference.
    pub fn window_mut(&mut self, company: &str) -> &mut HistoryWindow {
        match self.windows.entry(company.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(HistoryWindow::new()),
        }
    }

    pub fn get(&self, company: &str) -> Option<&HistoryWindow> {
        self.windows.get(company)
    }

    /// Number of companies seen so far.
    pub fn company_count(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::RawStory;
    use chrono::{TimeZone, Utc};

    fn story(id: &str, hour: u32) -> Arc<TokenizedStory> {
        TokenizedStory::from_raw(RawStory {
            id: id.into(),
            timestamp: Utc.with_ymd_and_hms(2001, 10, 4, hour, 0, 0).unwrap(),
            companies: vec!["ACME".into()],
            text: "acme earnings".into(),
        })
    }

    #[test]
    fn push_front_keeps_newest_first() {
        let mut w = HistoryWindow::new();
        w.push_front(story("A", 1));
        w.push_front(story("B", 2));
        let ids: Vec<_> = w.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn truncate_tail_reports_pruned_count() {
        let mut w = HistoryWindow::new();
        for (i, h) in [1, 2, 3, 4].iter().enumerate() {
            w.push_front(story(&format!("S{i}"), *h));
        }
        assert_eq!(w.truncate_tail(1), 3);
        assert_eq!(w.len(), 1);
        assert_eq!(w.get(0).unwrap().id, "S3");
    }

    #[test]
    fn registry_creates_windows_lazily_and_keeps_keys() {
        let mut reg = WindowRegistry::new();
        assert!(reg.get("ACME").is_none());
        reg.window_mut("ACME").push_front(story("A", 1));
        assert_eq!(reg.company_count(), 1);
        assert_eq!(reg.get("ACME").unwrap().len(), 1);
        // Re-fetch returns the same window, not a fresh one.
        assert_eq!(reg.window_mut("ACME").len(), 1);
    }
}
