//! Search and evaluation for tessera.

mod error;
pub mod eval;
pub mod search;

pub use eval::{evaluate, evaluate_for};
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY};
pub use search::{
    MAX_DEPTH, SearchConfig, SearchLimits, SearchResult, SearchStats, Searcher, format_pv,
    get_best_move, mate_distance,
};
