//! Pseudo-legal and legal move generation.

mod castling;
mod pawns;
mod pieces;

use crate::attacks::king_in_check;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;

use self::castling::gen_castles;
use self::pawns::gen_pawn;
use self::pieces::{gen_bishop, gen_king, gen_knight, gen_queen, gen_rook};

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; 256],
            len: 0,
        }
    }

    /// Push a move onto the list.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Return a mutable slice of the moves, for in-place ordering.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len as usize]
    }

    /// Return `true` if `mv` is in the list.
    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Generate every pseudo-legal move for `color`: moves that follow piece
/// movement rules but may leave the mover's king attacked.
pub fn generate_pseudo_moves(pos: &Position, color: Color) -> MoveList {
    let mut list = MoveList::new();
    for (from, piece) in pos.occupied() {
        if piece.color != color {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => gen_pawn(pos, from, color, &mut list),
            PieceKind::Knight => gen_knight(pos, from, color, &mut list),
            PieceKind::Bishop => gen_bishop(pos, from, color, &mut list),
            PieceKind::Rook => gen_rook(pos, from, color, &mut list),
            PieceKind::Queen => gen_queen(pos, from, color, &mut list),
            PieceKind::King => gen_king(pos, from, color, &mut list),
        }
    }
    gen_castles(pos, color, &mut list);
    list
}

/// Generate the legal moves for `color`.
///
/// Each pseudo-legal move is made, kept if the king is not attacked
/// afterwards, and undone. `pos` is unchanged on return.
pub fn generate_legal_moves(pos: &mut Position, color: Color) -> MoveList {
    let pseudo = generate_pseudo_moves(pos, color);
    let mut legal = MoveList::new();
    for &mv in &pseudo {
        let undo = pos.make_move(mv, color);
        if !king_in_check(pos, color) {
            legal.push(mv);
        }
        pos.undo_move(undo);
    }
    legal
}

/// Return `true` if `color` has at least one legal move.
pub fn has_legal_move(pos: &mut Position, color: Color) -> bool {
    let pseudo = generate_pseudo_moves(pos, color);
    pseudo.as_slice().iter().any(|&mv| {
        let undo = pos.make_move(mv, color);
        let legal = !king_in_check(pos, color);
        pos.undo_move(undo);
        legal
    })
}
