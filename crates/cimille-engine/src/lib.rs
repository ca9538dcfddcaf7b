//! Search and evaluation for cimille.

pub mod error;
pub mod eval;
pub mod score;
pub mod search;
pub mod time;

pub use error::SearchError;
pub use eval::evaluate;
pub use score::Score;
pub use search::job::{SearchJob, SearchLimits};
pub use search::{ProgressRecord, ScoredMove, SearchResult, SearchState, Searcher};
pub use time::{TimeConfig, TimeInputs, compute_limits};
