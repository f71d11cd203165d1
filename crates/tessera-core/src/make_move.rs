//! Reversible move execution with incremental Zobrist hashing.

use tracing::{debug, warn};

use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::MoveError;
use crate::movegen::generate_legal_moves;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Everything needed to revert one [`Position::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    mv: Move,
    /// The mover exactly as it stood on the source square.
    moved: Piece,
    /// Captured piece and the square it stood on (differs from the
    /// destination for en passant).
    captured: Option<(Square, Piece)>,
    /// Castling rook: origin, destination and previous `moved` flag.
    rook: Option<(Square, Square, bool)>,
    prev_castling: CastleRights,
    prev_en_passant: Option<Square>,
    prev_hash: u64,
}

impl UndoRecord {
    /// The move this record reverts.
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// The mover as it stood before the move (a pawn for promotions).
    #[inline]
    pub fn moved(&self) -> Piece {
        self.moved
    }

    /// The piece removed by the move, if any.
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        self.captured.map(|(_, p)| p)
    }

    /// Return `true` if the move captured something.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl Position {
    /// Play `mv` for `color` in place and return the record that undoes it.
    ///
    /// `mv` must be pseudo-legal for `color`; legality is not checked here.
    ///
    /// # Panics
    ///
    /// Panics if the source square is empty.
    pub fn make_move(&mut self, mv: Move, color: Color) -> UndoRecord {
        let from = mv.source();
        let to = mv.dest();
        let prev_castling = self.castling();
        let prev_en_passant = self.en_passant();
        let prev_hash = self.hash();

        let moved = self.take(from).expect("make_move from an empty square");
        debug_assert_eq!(moved.color, color, "make_move with the wrong color");

        let is_pawn = moved.kind == PieceKind::Pawn;
        let captured = if is_pawn && mv.col_delta() != 0 && self.is_empty(to) {
            let victim_sq = Square::new(from.row(), to.col());
            self.take(victim_sq).map(|p| (victim_sq, p))
        } else {
            self.take(to).map(|p| (to, p))
        };

        let landed = if is_pawn && to.row() == color.promotion_row() {
            Piece::new(mv.promotion().unwrap_or(PieceKind::Queen), color).with_moved(true)
        } else {
            Piece {
                moved: true,
                en_passant: false,
                ..moved
            }
        };
        self.place(to, landed);

        let rook = if moved.kind == PieceKind::King && mv.col_delta().abs() == 2 {
            let side = CastleSide::from_king_delta(mv.col_delta());
            let rook_from = Square::new(from.row(), side.rook_col());
            let rook_to = Square::new(from.row(), side.rook_dest_col());
            self.take(rook_from).map(|r| {
                self.place(rook_to, r.with_moved(true));
                (rook_from, rook_to, r.moved)
            })
        } else {
            None
        };

        let double_step = is_pawn && mv.row_delta().abs() == 2;
        self.set_en_passant(None);
        if double_step {
            self.set_en_passant(Some(to));
        }

        self.set_castling(prev_castling.touched(from).touched(to));
        self.flip_side_hash();

        UndoRecord {
            mv,
            moved,
            captured,
            rook,
            prev_castling,
            prev_en_passant,
            prev_hash,
        }
    }

    /// Revert the move described by `undo`, restoring the exact prior state.
    ///
    /// Records must be undone in reverse order of creation.
    pub fn undo_move(&mut self, undo: UndoRecord) {
        let from = undo.mv.source();
        let to = undo.mv.dest();
        let color = undo.moved.color;

        self.set_square_raw(to, None);
        self.set_square_raw(from, Some(undo.moved));
        if undo.moved.kind == PieceKind::King {
            self.set_king_location(color, from);
        }

        if let Some((rook_from, rook_to, was_moved)) = undo.rook {
            self.set_square_raw(rook_to, None);
            self.set_square_raw(
                rook_from,
                Some(Piece::new(PieceKind::Rook, color).with_moved(was_moved)),
            );
        }

        if let Some((sq, piece)) = undo.captured {
            self.set_square_raw(sq, Some(piece));
            if piece.kind == PieceKind::King {
                self.set_king_location(piece.color, sq);
            }
        }

        if let Some(ep) = undo.prev_en_passant
            && let Some(pawn) = self.piece_mut(ep)
        {
            pawn.en_passant = true;
        }

        self.restore_raw(undo.prev_castling, undo.prev_en_passant, undo.prev_hash);
    }
}

/// Commit `mv` permanently, as a user-facing game would.
///
/// The mover's color is taken from the piece on the source square and the
/// move must match one of its legal moves; a missing promotion kind means
/// Queen. Returns whether a piece was captured. The position is left
/// untouched on error.
pub fn apply_move(position: &mut Position, mv: Move) -> Result<bool, MoveError> {
    let piece = position
        .piece_at(mv.source())
        .ok_or(MoveError::EmptySource(mv.source()))?;
    let color = piece.color;

    let legal = generate_legal_moves(position, color);
    let Some(&matched) = legal
        .as_slice()
        .iter()
        .find(|m| m.source() == mv.source() && m.dest() == mv.dest())
    else {
        warn!(%mv, %color, "rejected illegal move");
        return Err(MoveError::Illegal(mv));
    };
    // generation only yields queen promotions; an explicit under-promotion
    // replaces it, a promotion kind on a non-promoting move is ignored
    let played = match mv.promotion() {
        Some(kind) if matched.is_promotion() => {
            if matches!(kind, PieceKind::Pawn | PieceKind::King) {
                warn!(%mv, %color, "rejected promotion kind");
                return Err(MoveError::Illegal(mv));
            }
            mv
        }
        _ => matched,
    };

    let captured = position.is_capture(played);
    position.make_move(played, color);
    position.set_last_move(Some(played));
    debug!(mv = %played, %color, captured, "applied move");
    Ok(captured)
}
