//! Search lifecycle.
//!
//! `Idle -> Searching -> {Populated | Empty | Failed}`, and from `Populated`
//! on to `OpinionRequested -> OpinionReady`. A new search may start from any
//! settled state.

use crate::{SdkError, SearchResults};

/// Where a search currently stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// Nothing searched yet
    #[default]
    Idle,
    /// Four lookups in flight for the given input
    Searching {
        /// Input as typed
        input: String,
    },
    /// At least one source produced an entry
    Populated(SearchResults),
    /// Every source failed ("not found")
    Empty(SearchResults),
    /// Search could not run (invalid input)
    Failed {
        /// Why the search failed
        reason: String,
    },
    /// Consolidated opinion in flight
    OpinionRequested(SearchResults),
    /// Consolidated opinion received (possibly the failure text)
    OpinionReady {
        /// Results the opinion covers
        results: SearchResults,
        /// Opinion text
        opinion: String,
    },
}

impl SearchState {
    /// Short state name, used in transition errors
    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Searching { .. } => "searching",
            SearchState::Populated(_) => "populated",
            SearchState::Empty(_) => "empty",
            SearchState::Failed { .. } => "failed",
            SearchState::OpinionRequested(_) => "opinion requested",
            SearchState::OpinionReady { .. } => "opinion ready",
        }
    }

    /// Results of the last completed search, if any
    pub fn results(&self) -> Option<&SearchResults> {
        match self {
            SearchState::Populated(results)
            | SearchState::Empty(results)
            | SearchState::OpinionRequested(results)
            | SearchState::OpinionReady { results, .. } => Some(results),
            _ => None,
        }
    }

    /// Consolidated opinion, once received
    pub fn opinion(&self) -> Option<&str> {
        match self {
            SearchState::OpinionReady { opinion, .. } => Some(opinion),
            _ => None,
        }
    }

    /// Whether a request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SearchState::Searching { .. } | SearchState::OpinionRequested(_)
        )
    }

    /// Start a search; rejected while another request is in flight
    pub fn begin_search(&mut self, input: impl Into<String>) -> Result<(), SdkError> {
        if self.is_busy() {
            return Err(self.invalid("start a search"));
        }
        *self = SearchState::Searching {
            input: input.into(),
        };
        Ok(())
    }

    /// Settle a search with its results
    pub fn finish_search(&mut self, results: SearchResults) -> Result<(), SdkError> {
        if !matches!(self, SearchState::Searching { .. }) {
            return Err(self.invalid("finish a search"));
        }
        *self = if results.is_empty() {
            SearchState::Empty(results)
        } else {
            SearchState::Populated(results)
        };
        Ok(())
    }

    /// Settle a search that could not run
    pub fn fail_search(&mut self, reason: impl Into<String>) -> Result<(), SdkError> {
        if !matches!(self, SearchState::Searching { .. }) {
            return Err(self.invalid("fail a search"));
        }
        *self = SearchState::Failed {
            reason: reason.into(),
        };
        Ok(())
    }

    /// Ask for the consolidated opinion over populated results
    pub fn request_opinion(&mut self) -> Result<(), SdkError> {
        match std::mem::take(self) {
            SearchState::Populated(results) | SearchState::OpinionReady { results, .. } => {
                *self = SearchState::OpinionRequested(results);
                Ok(())
            }
            other => {
                *self = other;
                Err(self.invalid("request an opinion"))
            }
        }
    }

    /// Record the consolidated opinion
    pub fn finish_opinion(&mut self, opinion: impl Into<String>) -> Result<(), SdkError> {
        match std::mem::take(self) {
            SearchState::OpinionRequested(results) => {
                *self = SearchState::OpinionReady {
                    results,
                    opinion: opinion.into(),
                };
                Ok(())
            }
            other => {
                *self = other;
                Err(self.invalid("finish an opinion"))
            }
        }
    }

    fn invalid(&self, action: &'static str) -> SdkError {
        SdkError::InvalidTransition {
            from: self.name(),
            action,
        }
    }
}
