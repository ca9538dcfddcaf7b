//! Search errors.

use cimille_core::PositionError;

use crate::search::SearchState;

/// Contract violations that abort a search job.
///
/// Time expiry and cancellation are not errors; they end the search normally.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Apply/undo bookkeeping on the position went wrong.
    #[error("position bookkeeping failed: {source}")]
    Position {
        /// The underlying adapter error.
        #[from]
        source: PositionError,
    },

    /// `run` was called on a searcher whose job already ran.
    #[error("search job already used (state {state:?})")]
    JobReused {
        /// State the searcher was in when `run` was called again.
        state: SearchState,
    },
}
