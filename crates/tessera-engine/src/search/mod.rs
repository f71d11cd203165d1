//! Iterative-deepening search driver.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::time::Duration;

use tessera_core::{Color, Move, Position, generate_legal_moves, king_in_check};
use tracing::{debug, info, warn};

use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{MATE_SCORE, MATE_THRESHOLD, MAX_PLY, PvTable, SearchContext, aspiration_search};
use ordering::MovePicker;
use tt::TranspositionTable;

/// Deepest iteration the driver will start, leaving room for quiescence.
pub const MAX_DEPTH: u8 = 64;

/// Tunable search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Transposition table size in megabytes.
    pub tt_mb: usize,
    /// Half-width of the aspiration window around the previous score.
    pub aspiration_margin: i32,
    /// Extra plies quiescence may add beyond the nominal depth; 0 disables it.
    pub quiescence_plies: u8,
    /// Quiescence plies in which quiet checking moves are also tried.
    pub quiescence_check_plies: u8,
    /// Captures whose exchange loses more than this are skipped in quiescence.
    pub see_margin: i32,
    /// Keep the transposition table between searches.
    pub keep_tt: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tt_mb: 16,
            aspiration_margin: 50,
            quiescence_plies: 6,
            quiescence_check_plies: 2,
            see_margin: 100,
            keep_tt: false,
        }
    }
}

/// Budget for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Nominal depth of the last iteration.
    pub depth: u8,
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
}

impl SearchLimits {
    /// Search to `depth` with no time or node budget.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            time_limit: None,
            node_limit: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Every visited node, quiescence included.
    pub nodes: u64,
    /// Quiescence nodes, the horizon node included.
    pub qnodes: u64,
    pub tt_hits: u64,
    pub beta_cutoffs: u64,
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration; `None` only when the
    /// side to move has no legal move.
    pub best_move: Option<Move>,
    /// Score in centipawns from the searching side's perspective.
    pub score: i32,
    /// Depth of the deepest completed iteration (0 if none completed).
    pub depth: u8,
    /// Principal variation of that iteration.
    pub pv: Vec<Move>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Signed number of plies to mate for a mate score, `None` otherwise.
///
/// Positive when the searching side mates.
pub fn mate_distance(score: i32) -> Option<i32> {
    if score > MATE_THRESHOLD {
        Some(MATE_SCORE - score)
    } else if score < -MATE_THRESHOLD {
        Some(-(MATE_SCORE + score))
    } else {
        None
    }
}

/// Iterative-deepening searcher owning its transposition table and move
/// ordering heuristics.
pub struct Searcher {
    config: SearchConfig,
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
}

impl Searcher {
    /// Create a searcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Forget everything learned by previous searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    /// Search `pos` for `side` within `limits`.
    pub fn search(&mut self, pos: &mut Position, side: Color, limits: &SearchLimits) -> SearchResult {
        self.search_with(pos, side, limits, |_, _, _, _| {})
    }

    /// Search like [`search`](Self::search), calling
    /// `on_iter(depth, score, stats, pv)` after each completed iteration.
    ///
    /// `pos` is mutated during the search and restored before returning.
    pub fn search_with<F>(
        &mut self,
        pos: &mut Position,
        side: Color,
        limits: &SearchLimits,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, &SearchStats, &[Move]),
    {
        if !self.config.keep_tt {
            self.tt.clear();
        }
        self.tt.new_generation();
        self.killers.clear();
        self.history.clear();

        let control = SearchControl::new(limits.time_limit, limits.node_limit);
        let root_moves = generate_legal_moves(pos, side);
        if root_moves.is_empty() {
            let score = if king_in_check(pos, side) { -MATE_SCORE } else { 0 };
            info!(%side, score, "no legal moves");
            return SearchResult {
                best_move: None,
                score,
                depth: 0,
                pv: Vec::new(),
                stats: SearchStats::default(),
                elapsed: control.elapsed(),
            };
        }

        let root_hash = pos.hash();
        let max_depth = limits.depth.clamp(1, MAX_DEPTH);
        debug_assert!(max_depth as usize + self.config.quiescence_plies as usize <= MAX_PLY);

        let mut ctx = SearchContext {
            tt: &mut self.tt,
            killers: &mut self.killers,
            history: &mut self.history,
            config: &self.config,
            control,
            pv: PvTable::new(),
            stats: SearchStats::default(),
        };

        let mut completed: Option<(i32, u8, Vec<Move>)> = None;
        let mut prev_score = 0;

        for depth in 1..=max_depth {
            if ctx.control.should_stop(ctx.stats.nodes) {
                break;
            }
            let Ok(score) = aspiration_search(pos, side, depth, prev_score, &mut ctx) else {
                debug!(depth, nodes = ctx.stats.nodes, "iteration aborted");
                break;
            };
            debug_assert_eq!(pos.hash(), root_hash, "search left the position modified");

            let pv = ctx.pv.root_pv().to_vec();
            debug_assert!(pv.first().is_some_and(|m| root_moves.contains(*m)));
            debug!(
                depth,
                score,
                nodes = ctx.stats.nodes,
                elapsed_ms = ctx.control.elapsed().as_millis() as u64,
                pv = %format_pv(&pv),
                "iteration complete"
            );
            on_iter(depth, score, &ctx.stats, &pv);
            prev_score = score;
            completed = Some((score, depth, pv));
        }

        let stats = ctx.stats;
        let elapsed = ctx.control.elapsed();

        let (best_move, score, depth, pv) = match completed {
            Some((score, depth, pv)) if !pv.is_empty() => (pv[0], score, depth, pv),
            _ => {
                let mut picker = MovePicker::new(&root_moves, pos, Move::NULL, &self.killers, &self.history, 0);
                let fallback = picker.pick_next().unwrap_or(root_moves[0]);
                warn!(%fallback, "no iteration completed, playing the first ordered move");
                (fallback, 0, 0, vec![fallback])
            }
        };

        info!(
            %side,
            best = %best_move,
            score,
            depth,
            nodes = stats.nodes,
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );

        SearchResult {
            best_move: Some(best_move),
            score,
            depth,
            pv,
            stats,
            elapsed,
        }
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("tt", &self.tt)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Space-separated coordinate notation.
pub fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|m| m.to_coord()).collect::<Vec<_>>().join(" ")
}

/// Find the best move for `side` searching up to `depth` plies.
///
/// Stops deepening once `time_limit` has elapsed and answers with the
/// deepest completed iteration. Every call uses fresh tables. Returns `None`
/// only when `side` has no legal move.
pub fn get_best_move(
    position: &mut Position,
    depth: u8,
    time_limit: Option<Duration>,
    side: Color,
) -> Option<Move> {
    let limits = SearchLimits {
        depth,
        time_limit,
        node_limit: None,
    };
    Searcher::new().search(position, side, &limits).best_move
}
