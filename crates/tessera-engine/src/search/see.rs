//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square on a scratch copy of the
//! grid, each side recapturing with its least valuable attacker, and lets
//! either side stop when continuing would lose material.

use tessera_core::{Color, Grid, Move, PieceKind, Position, Square, least_valuable_attacker};

/// Longest exchange tracked; a square has at most 32 pieces to trade.
const MAX_EXCHANGE: usize = 32;

fn clear(grid: &mut Grid, sq: Square) {
    grid[sq.row() as usize][sq.col() as usize] = None;
}

/// Move whatever stands on `from` onto `to`.
fn relocate(grid: &mut Grid, from: Square, to: Square) {
    let piece = grid[from.row() as usize][from.col() as usize].take();
    grid[to.row() as usize][to.col() as usize] = piece;
}

/// Material gain for `side` after `mv` and the best recapture sequence.
///
/// Non-captures score 0 unless the moved piece can then be taken. The
/// value is above zero for winning captures and below zero for losing ones.
pub fn see(pos: &Position, mv: Move, side: Color) -> i32 {
    let (from, to) = (mv.source(), mv.dest());
    let Some(attacker) = pos.piece_at(from) else {
        return 0;
    };
    let mut grid = *pos.grid();

    let victim_value = if pos.is_en_passant(mv) {
        clear(&mut grid, Square::new(from.row(), to.col()));
        PieceKind::Pawn.value()
    } else {
        pos.piece_at(to).map_or(0, |p| p.kind.value())
    };

    // a promoting pawn stands on the square as the promoted piece
    let mut next_victim_value = match mv.promotion() {
        Some(kind) if attacker.kind == PieceKind::Pawn => kind.value(),
        _ => attacker.kind.value(),
    };
    relocate(&mut grid, from, to);

    let mut gain = [0i32; MAX_EXCHANGE];
    gain[0] = victim_value;
    let mut depth = 0usize;
    let mut to_move = side.flip();

    // sliders are found by scanning the live scratch grid, so removing a
    // capturer exposes any x-ray attacker behind it
    while let Some((sq, kind)) = least_valuable_attacker(&grid, to, to_move) {
        depth += 1;
        if depth >= MAX_EXCHANGE {
            depth -= 1;
            break;
        }
        gain[depth] = next_victim_value - gain[depth - 1];
        next_victim_value = kind.value();
        relocate(&mut grid, sq, to);
        to_move = to_move.flip();
    }

    while depth > 0 {
        depth -= 1;
        gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
    }
    gain[0]
}
