//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: where a dispatched URL stands (dispatched, succeeded, failed)
//! - `VisitedSet`: every URL dispatched during one run, with its current state

mod page_state;
mod visited;

// Re-export main types
pub use page_state::PageState;
pub use visited::VisitedSet;
