/// Page state definitions for tracking crawl progress
///
/// A page moves through `Pending → Fetching → Classifying → (Terminal |
/// Expanding) → Completed`, or ends in `Failed` when its fetch fails.
use crate::CrawlError;
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has been created by its parent and waits for an admission slot
    Pending,

    /// Page holds an admission slot and its HTTP request is in flight
    Fetching,

    /// Body received; links are being classified and artifacts detected
    Classifying,

    /// Nothing to expand and nothing to convert
    Terminal,

    /// Children and/or artifact production are running
    Expanding,

    // ===== Terminal States =====
    /// Page and its whole subtree have settled
    Completed,

    /// Fetch failed (transport error, timeout, or non-2xx status)
    Failed,
}

impl PageState {
    /// Returns true if this is a final state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the page is still being processed
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the page finished without a fetch failure
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the state machine allows moving to `next`
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Classifying)
                | (Fetching, Failed)
                | (Classifying, Terminal)
                | (Classifying, Expanding)
                | (Classifying, Failed)
                | (Terminal, Completed)
                | (Expanding, Completed)
        )
    }

    /// Moves to `next`, rejecting transitions the state machine forbids
    pub fn transition(self, next: PageState) -> Result<PageState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::Terminal => "terminal",
            Self::Expanding => "expanding",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 7] {
        [
            Self::Pending,
            Self::Fetching,
            Self::Classifying,
            Self::Terminal,
            Self::Expanding,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
