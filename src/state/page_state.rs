//! Page state definitions for tracking crawl progress
//!
//! A URL that has never been dispatched has no state at all; it is simply
//! absent from the [`VisitedSet`](crate::state::VisitedSet).

use std::fmt;

/// Represents the state of a dispatched URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Handed to the fetcher; no response yet
    Dispatched,

    /// Fetched, parsed and handed to the sink
    Succeeded,

    /// The fetch failed; the URL is not processed further
    Failed,
}

impl PageState {
    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Dispatched, Self::Succeeded) | (Self::Dispatched, Self::Failed)
        )
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dispatched => "dispatched",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
