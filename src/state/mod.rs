//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Page`: one node of the crawl tree with its inherited `seen` set and its
//!   own `frontier`
//! - `PageState`: the per-page state machine driven by the orchestrator

mod page;
mod page_state;

// Re-export main types
pub use page::{Page, UrlSet};
pub use page_state::PageState;
