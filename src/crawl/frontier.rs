// src/crawl/frontier.rs
// =============================================================================
// The frontier is the crawl's single source of truth for "have we seen this?"
//
// It tracks two sets:
// - discovered: every URL that normalized successfully, in first-seen order.
//   This is what gets reported at the end.
// - visited: pages that have been handed to the fetcher, keyed without the
//   fragment so "page#a" and "page#b" are only fetched once.
//
// Both live behind one mutex, so a membership check and the insert that
// follows it happen as one step even when several fetches finish at once.
//
// Rust concepts:
// - Interior mutability: methods take &self, the Mutex hands out &mut access
// - IndexSet: a HashSet that also remembers insertion order
// =============================================================================

use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::HashSet;
use url::Url;

use super::normalize::without_fragment;

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

#[derive(Debug, Default)]
struct FrontierState {
    discovered: IndexSet<Url>,
    visited: HashSet<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as discovered.
    ///
    /// Returns true if this is the first time the URL was seen, false (and
    /// leaves the frontier untouched) if it was already discovered.
    pub fn try_add(&self, url: &Url) -> bool {
        let mut state = self.state.lock();
        if state.discovered.contains(url) {
            return false;
        }
        state.discovered.insert(url.clone())
    }

    /// Claims the page behind `url` for fetching. Returns false if it was
    /// already claimed (possibly under a different fragment).
    pub fn mark_visited(&self, url: &Url) -> bool {
        let key = without_fragment(url);
        self.state.lock().visited.insert(key)
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.state.lock().visited.contains(&without_fragment(url))
    }

    /// All discovered URLs in first-insertion order. Non-destructive.
    pub fn snapshot_ordered(&self) -> Vec<Url> {
        self.state.lock().discovered.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().discovered.len()
    }

    pub fn visited_count(&self) -> usize {
        self.state.lock().visited.len()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why parking_lot::Mutex instead of std::sync::Mutex?
//    - lock() returns the guard directly, there is no poisoning to unwrap
//    - The critical sections here are tiny and never hold the lock across
//      an .await, so a blocking mutex is the right tool
//
// 2. Why is try_add a single method instead of contains() + insert()?
//    - Two separate calls would let two workers both see "not present"
//      and both fetch the same page
//    - Doing the check and the insert under one lock guard rules that out
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_try_add_is_idempotent() {
        let frontier = Frontier::new();
        let u = url("https://x.com/a");

        assert!(frontier.try_add(&u));
        assert!(!frontier.try_add(&u));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_first_insertion_order() {
        let frontier = Frontier::new();
        frontier.try_add(&url("https://x.com/c"));
        frontier.try_add(&url("https://x.com/a"));
        frontier.try_add(&url("https://x.com/c"));
        frontier.try_add(&url("https://x.com/b"));

        let snapshot: Vec<String> = frontier
            .snapshot_ordered()
            .iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            snapshot,
            vec!["https://x.com/c", "https://x.com/a", "https://x.com/b"]
        );
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let frontier = Frontier::new();
        frontier.try_add(&url("https://x.com/1"));
        frontier.try_add(&url("https://x.com/2"));

        assert_eq!(frontier.snapshot_ordered(), frontier.snapshot_ordered());
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_case_differences_are_distinct_urls() {
        let frontier = Frontier::new();
        assert!(frontier.try_add(&url("https://x.com/A")));
        assert!(frontier.try_add(&url("https://x.com/a")));
    }

    #[test]
    fn test_mark_visited_ignores_fragment() {
        let frontier = Frontier::new();
        assert!(frontier.mark_visited(&url("https://x.com/page#one")));
        assert!(!frontier.mark_visited(&url("https://x.com/page#two")));
        assert!(!frontier.mark_visited(&url("https://x.com/page")));
        assert_eq!(frontier.visited_count(), 1);
        assert!(frontier.is_visited(&url("https://x.com/page#three")));
        assert!(!frontier.is_visited(&url("https://x.com/other")));
        // Visiting doesn't touch the discovered list
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn test_concurrent_try_add_admits_each_url_once() {
        let frontier = Arc::new(Frontier::new());
        let urls: Arc<Vec<Url>> = Arc::new(
            (0..100)
                .map(|i| url(&format!("https://x.com/page/{}", i)))
                .collect(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                let urls = Arc::clone(&urls);
                thread::spawn(move || urls.iter().filter(|u| frontier.try_add(u)).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 100);
        assert_eq!(frontier.len(), 100);
    }
}
