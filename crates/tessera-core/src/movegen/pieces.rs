//! Knight, king and slider move generation.

use crate::attacks::{DIAGONAL, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL};
use crate::chess_move::Move;
use crate::color::Color;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Moves to each in-range offset not occupied by a friendly piece.
pub(super) fn gen_steps(
    pos: &Position,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc)
            && !pos.has_own(to, color)
        {
            list.push(Move::new(from, to));
        }
    }
}

/// Ray-cast along each direction: empty squares continue the ray, an enemy
/// piece ends it inclusively, a friendly piece ends it exclusively.
pub(super) fn gen_rays(
    pos: &Position,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match pos.piece_at(to) {
                None => list.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != color {
                        list.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

pub(super) fn gen_knight(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    gen_steps(pos, from, color, &KNIGHT_OFFSETS, list);
}

pub(super) fn gen_king(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    gen_steps(pos, from, color, &KING_OFFSETS, list);
}

pub(super) fn gen_bishop(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    gen_rays(pos, from, color, &DIAGONAL, list);
}

pub(super) fn gen_rook(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    gen_rays(pos, from, color, &ORTHOGONAL, list);
}

pub(super) fn gen_queen(pos: &Position, from: Square, color: Color, list: &mut MoveList) {
    gen_rays(pos, from, color, &ORTHOGONAL, list);
    gen_rays(pos, from, color, &DIAGONAL, list);
}
