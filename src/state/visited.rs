use crate::state::PageState;
use std::collections::HashMap;

/// Every URL dispatched during one crawl run
///
/// Membership is keyed on the exact absolute URL string. Entries are never
/// removed, so a URL can be dispatched at most once per run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    pages: HashMap<String, PageState>,

    /// Dispatch order, for reporting
    order: Vec<String>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the URL has already been dispatched
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Moves a URL from unvisited to dispatched
    ///
    /// This is the only membership test-and-set. Returns false, leaving the
    /// set untouched, if the URL was already present.
    pub fn dispatch(&mut self, url: &str) -> bool {
        if self.pages.contains_key(url) {
            return false;
        }
        self.pages.insert(url.to_string(), PageState::Dispatched);
        self.order.push(url.to_string());
        true
    }

    /// Records the outcome of a dispatched URL
    ///
    /// Returns false if the URL was never dispatched or the transition is not
    /// allowed; the stored state is left unchanged in that case.
    pub fn complete(&mut self, url: &str, outcome: PageState) -> bool {
        match self.pages.get_mut(url) {
            Some(state) if state.can_transition_to(outcome) => {
                *state = outcome;
                true
            }
            Some(state) => {
                tracing::warn!("Refusing state change for {}: {} -> {}", url, state, outcome);
                false
            }
            None => false,
        }
    }

    /// Gets the state of a URL, if it was dispatched
    pub fn state(&self, url: &str) -> Option<PageState> {
        self.pages.get(url).copied()
    }

    /// Number of dispatched URLs
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns whether nothing has been dispatched
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of URLs currently in the given state
    pub fn count(&self, state: PageState) -> usize {
        self.pages.values().filter(|s| **s == state).count()
    }

    /// Dispatched URLs in dispatch order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
