/// Walk state definitions for one category's listing traversal
use std::fmt;

use crate::CatalogError;

/// Represents the current state of a category walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkState {
    /// Navigating to the category URL and waiting for it to settle
    Loading,

    /// A listing page is rendered and its items can be queried
    Ready,

    /// Items of the current page are being turned into records
    Extracting,

    /// No more pages; the category is done
    Exhausted,
}

impl WalkState {
    /// Returns true if no further processing is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns true if the walker may move from `self` to `next`
    ///
    /// `Loading -> Exhausted` covers a category skipped after a failed load,
    /// `Ready -> Exhausted` an empty listing page.
    pub fn can_transition_to(&self, next: WalkState) -> bool {
        matches!(
            (self, next),
            (Self::Loading, Self::Ready)
                | (Self::Loading, Self::Exhausted)
                | (Self::Ready, Self::Extracting)
                | (Self::Ready, Self::Exhausted)
                | (Self::Extracting, Self::Ready)
                | (Self::Extracting, Self::Exhausted)
        )
    }

    /// Moves to `next`, rejecting transitions outside the state machine
    pub fn transition(self, next: WalkState) -> Result<WalkState, CatalogError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CatalogError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Extracting => "extracting",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
