//! Negamax alpha-beta search with quiescence.

use tessera_core::{Color, Move, Position, generate_legal_moves, king_in_check};
use tracing::trace;

use crate::error::Aborted;
use crate::eval::evaluate_for;
use crate::search::SearchConfig;
use crate::search::SearchStats;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::see::see;
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 30_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 29_000;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

/// Search state threaded through negamax calls.
pub(crate) struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub config: &'a SearchConfig,
    pub control: SearchControl,
    pub pv: PvTable,
    pub stats: SearchStats,
}

impl SearchContext<'_> {
    /// Count a node and check the budget.
    fn visit(&mut self) -> Result<(), Aborted> {
        self.stats.nodes += 1;
        if self.control.should_stop(self.stats.nodes) {
            return Err(Aborted);
        }
        Ok(())
    }
}

/// Search the root with an aspiration window around `prev_score`.
///
/// From depth 2 the window is `prev_score ± aspiration_margin`; a score on or
/// outside either edge is re-searched once with the full window.
pub(crate) fn aspiration_search(
    pos: &mut Position,
    side: Color,
    depth: u8,
    prev_score: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, Aborted> {
    if depth >= 2 {
        let margin = ctx.config.aspiration_margin;
        let alpha = (prev_score - margin).max(-INF);
        let beta = (prev_score + margin).min(INF);
        let score = negamax(pos, side, depth, 0, alpha, beta, ctx)?;
        if score > alpha && score < beta {
            return Ok(score);
        }
        trace!(depth, score, alpha, beta, "aspiration window missed, re-searching");
    }
    negamax(pos, side, depth, 0, -INF, INF, ctx)
}

/// Negamax alpha-beta search.
///
/// Returns the best score for `side`. The principal variation is collected
/// into `ctx.pv`. On `Err(Aborted)` the position has already been restored.
pub(crate) fn negamax(
    pos: &mut Position,
    side: Color,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    mut beta: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, Aborted> {
    ctx.pv.clear_ply(ply as usize);
    ctx.visit()?;

    if depth == 0 {
        return qsearch(pos, side, ply, 0, alpha, beta, ctx);
    }
    if ply as usize >= MAX_PLY - 1 {
        return Ok(evaluate_for(pos, side));
    }

    // bounds are classified against the window the caller asked for
    let original_alpha = alpha;
    let original_beta = beta;
    let hash = pos.hash();
    let mut tt_move = Move::NULL;
    if let Some(entry) = ctx.tt.probe(hash, ply) {
        ctx.stats.tt_hits += 1;
        tt_move = entry.best_move;
        // the root always searches so that it reports a move and a line
        if ply > 0 && entry.depth >= depth {
            match entry.bound {
                Bound::Exact => return Ok(entry.score),
                Bound::LowerBound => alpha = alpha.max(entry.score),
                Bound::UpperBound => beta = beta.min(entry.score),
                Bound::None => {}
            }
            if alpha >= beta {
                return Ok(entry.score);
            }
        }
    }

    let moves = generate_legal_moves(pos, side);
    if moves.is_empty() {
        return Ok(if king_in_check(pos, side) {
            -(MATE_SCORE - ply as i32)
        } else {
            0
        });
    }

    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut picker = MovePicker::new(&moves, pos, tt_move, ctx.killers, ctx.history, ply as usize);

    while let Some(mv) = picker.pick_next() {
        let quiet = !pos.is_capture(mv) && !mv.is_promotion();
        let undo = pos.make_move(mv, side);
        let result = negamax(pos, side.flip(), depth - 1, ply + 1, -beta, -alpha, ctx);
        pos.undo_move(undo);
        let score = -result?;

        if score > best_score {
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply as usize, mv);
            }
        }

        if alpha >= beta {
            ctx.stats.beta_cutoffs += 1;
            if quiet {
                ctx.killers.store(ply as usize, mv);
                ctx.history.reward(undo.moved().kind, mv.dest(), depth);
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= original_beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    // a fail-low node has no trustworthy best move
    let store_move = if bound == Bound::UpperBound { Move::NULL } else { best_move };
    ctx.tt.store(hash, depth, best_score, store_move, bound, ply);

    Ok(best_score)
}

/// Quiescence search: resolve tactics before trusting the static evaluation.
///
/// Out of check the side may stand pat and only tries captures that do not
/// lose more than `see_margin`, promotions, and during the first
/// `quiescence_check_plies` plies quiet checking moves. In check there is no
/// stand-pat: every evasion is searched and no evasion means mate.
fn qsearch(
    pos: &mut Position,
    side: Color,
    ply: u8,
    qply: u8,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, Aborted> {
    if qply > 0 {
        ctx.visit()?;
    }
    ctx.stats.qnodes += 1;

    if qply >= ctx.config.quiescence_plies || ply as usize >= MAX_PLY - 1 {
        return Ok(evaluate_for(pos, side));
    }

    let in_check = king_in_check(pos, side);
    let moves = generate_legal_moves(pos, side);
    if in_check && moves.is_empty() {
        return Ok(-(MATE_SCORE - ply as i32));
    }

    let mut best = -INF;
    if !in_check {
        let stand_pat = evaluate_for(pos, side);
        if stand_pat >= beta {
            return Ok(stand_pat);
        }
        best = stand_pat;
        alpha = alpha.max(stand_pat);
    }

    let allow_checks = qply < ctx.config.quiescence_check_plies;
    let mut picker = MovePicker::new_qsearch(&moves, pos);

    while let Some(mv) = picker.pick_next() {
        let tactical = pos.is_capture(mv) || mv.is_promotion();
        if !in_check {
            // the picker yields every tactical move before any quiet one
            if !tactical && !allow_checks {
                break;
            }
            if tactical && !mv.is_promotion() && see(pos, mv, side) < -ctx.config.see_margin {
                continue;
            }
        }

        let undo = pos.make_move(mv, side);
        if !in_check && !tactical && !king_in_check(pos, side.flip()) {
            pos.undo_move(undo);
            continue;
        }
        let result = qsearch(pos, side.flip(), ply + 1, qply + 1, -beta, -alpha, ctx);
        pos.undo_move(undo);
        let score = -result?;

        if score >= beta {
            return Ok(score);
        }
        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(best)
}

/// Triangular PV table for collecting principal variation lines.
///
/// Stored inline (~33 KB). Each row `ply` contains the PV continuation from
/// that ply onward.
pub struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    /// Create a zeroed PV table.
    pub fn new() -> Self {
        Self {
            moves: [[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    /// Clear the PV line at `ply` (called at the top of each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Set `mv` as the best move at `ply` followed by the line from `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = mv;

        let child_ply = ply + 1;
        if child_ply < MAX_PLY {
            let copy_len = self.len[child_ply].min(MAX_PLY - 1);
            let (top, bottom) = self.moves.split_at_mut(child_ply);
            top[ply][1..1 + copy_len].copy_from_slice(&bottom[0][..copy_len]);
            self.len[ply] = 1 + copy_len;
        } else {
            self.len[ply] = 1;
        }
    }

    /// The principal variation from the root.
    pub fn root_pv(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}
