//! Castling move generation.

use crate::attacks::{king_in_check, square_attacked};
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Emit two-file king moves for each available castle.
///
/// The landing square is left to the legality filter, which rejects any
/// move that ends with the king attacked.
pub(super) fn gen_castles(pos: &Position, color: Color, list: &mut MoveList) {
    let row = color.home_row();
    let king_sq = Square::new(row, 4);
    let king_ready = pos
        .piece_at(king_sq)
        .is_some_and(|k| k.kind == PieceKind::King && k.color == color && !k.moved);
    if !king_ready {
        return;
    }

    let mut in_check: Option<bool> = None;
    for side in CastleSide::ALL {
        if !pos.castling().has(color, side) {
            continue;
        }
        let rook_col = side.rook_col();
        let rook_ready = pos
            .piece_at(Square::new(row, rook_col))
            .is_some_and(|r| r.kind == PieceKind::Rook && r.color == color && !r.moved);
        if !rook_ready {
            continue;
        }

        let (lo, hi) = if rook_col < 4 { (rook_col + 1, 4) } else { (5, rook_col) };
        if (lo..hi).any(|col| !pos.is_empty(Square::new(row, col))) {
            continue;
        }

        if *in_check.get_or_insert_with(|| king_in_check(pos, color)) {
            return;
        }
        let passing = Square::new(row, side.rook_dest_col());
        if square_attacked(pos, passing, color.flip()) {
            continue;
        }

        list.push(Move::new(king_sq, Square::new(row, side.king_dest_col())));
    }
}
