//! Perft (performance test) for move generation correctness verification.

use crate::color::Color;
use crate::movegen::generate_legal_moves;
use crate::position::Position;

/// Count the leaf nodes of the legal move tree at the given depth.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number
/// of legal moves without recursing.
pub fn perft(pos: &mut Position, side: Color, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(pos, side);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &mv in &moves {
        let undo = pos.make_move(mv, side);
        nodes += perft(pos, side.flip(), depth - 1);
        pos.undo_move(undo);
    }
    nodes
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns `(coordinate_move, node_count)` pairs sorted alphabetically.
pub fn divide(pos: &mut Position, side: Color, depth: usize) -> Vec<(String, u64)> {
    let moves = generate_legal_moves(pos, side);
    let mut results: Vec<(String, u64)> = moves
        .as_slice()
        .iter()
        .map(|&mv| {
            let undo = pos.make_move(mv, side);
            let count = if depth <= 1 {
                1
            } else {
                perft(pos, side.flip(), depth - 1)
            };
            pos.undo_move(undo);
            (mv.to_coord(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
