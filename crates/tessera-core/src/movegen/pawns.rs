//! Pawn move generation.

use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal moves for the pawn on `from`.
pub(super) fn gen_pawn(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    let fwd = color.forward();

    if let Some(one) = from.offset(fwd, 0)
        && pos.is_empty(one)
    {
        push_pawn_move(from, one, color, list);
        if from.row() == color.pawn_row()
            && let Some(two) = one.offset(fwd, 0)
            && pos.is_empty(two)
        {
            list.push(Move::new(from, two));
        }
    }

    for dc in [-1, 1] {
        let Some(to) = from.offset(fwd, dc) else {
            continue;
        };
        if pos.has_enemy(to, color) {
            push_pawn_move(from, to, color, list);
        } else if pos.is_empty(to)
            && let Some(beside) = from.offset(0, dc)
            && pos.piece_at(beside).is_some_and(|p| {
                p.kind == PieceKind::Pawn && p.color != color && p.en_passant
            })
        {
            list.push(Move::new(from, to));
        }
    }
}

/// Last-rank destinations always promote to a queen.
#[inline]
fn push_pawn_move(from: Square, to: Square, color: Color, list: &mut MoveList) {
    if to.row() == color.promotion_row() {
        list.push(Move::new_promotion(from, to, PieceKind::Queen));
    } else {
        list.push(Move::new(from, to));
    }
}
