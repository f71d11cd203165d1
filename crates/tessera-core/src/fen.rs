//! FEN parsing and serialization for [`Position`].
//!
//! FEN does not carry the per-piece `moved` flags, so they are inferred:
//! pawns are unmoved only on their starting row, kings and rooks only on
//! home squares backed by a castling right. Move counters are accepted but
//! not stored.

use crate::castle_rights::{CastleRights, CastleSide};
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a FEN string into a position and the side to move.
    pub fn from_fen(fen: &str) -> Result<(Position, Color), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pos = Position::empty();
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN ranks go from 8 to 1 (top to bottom)
            let row = 7 - rank_index as u8;
            let mut col: usize = 0;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    col += digit as usize;
                    continue;
                }
                if col >= 8 {
                    return Err(FenError::BadRankLength {
                        rank_index,
                        length: col + 1,
                    });
                }
                let piece =
                    Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                pos.place(Square::new(row, col as u8), piece);
                col += 1;
            }
            if col != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: col,
                });
            }
        }

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let rights = consistent_rights(&pos, CastleRights::from_fen(fields[2])?);
        infer_moved_flags(&mut pos, rights);
        pos.set_castling(rights);

        if fields[3] != "-" {
            let pawn_sq = en_passant_pawn(&pos, fields[3], side).ok_or_else(|| {
                FenError::InvalidEnPassant {
                    found: fields[3].to_string(),
                }
            })?;
            pos.set_en_passant(Some(pawn_sq));
        }

        if side == Color::Black {
            pos.flip_side_hash();
        }

        pos.validate(side)?;
        Ok((pos, side))
    }

    /// Serialize the position with `side` to move. Counters are written as `0 1`.
    pub fn to_fen(&self, side: Color) -> String {
        let ep = self.en_passant().map_or("-".to_string(), |pawn_sq| {
            let behind = self
                .piece_at(pawn_sq)
                .and_then(|p| pawn_sq.offset(-p.color.forward(), 0));
            behind.map_or("-".to_string(), |sq| sq.to_string())
        });
        format!("{} {side} {} {ep} 0 1", self.placement_fen(), self.castling())
    }

    /// The piece placement field alone.
    pub(crate) fn placement_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in (0u8..8).rev() {
            let mut empty = 0;
            for col in 0u8..8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if row > 0 {
                out.push('/');
            }
        }
        out
    }
}

/// Drop rights whose king or rook is not on its home square.
fn consistent_rights(pos: &Position, rights: CastleRights) -> CastleRights {
    let mut kept = rights;
    for color in Color::ALL {
        let row = color.home_row();
        let king_home = pos
            .piece_at(Square::new(row, 4))
            .is_some_and(|p| p.kind == PieceKind::King && p.color == color);
        for side in CastleSide::ALL {
            let rook_home = pos
                .piece_at(Square::new(row, side.rook_col()))
                .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color);
            if !(king_home && rook_home) {
                kept = kept.remove(CastleRights::flag(color, side));
            }
        }
    }
    kept
}

fn infer_moved_flags(pos: &mut Position, rights: CastleRights) {
    let squares: Vec<(Square, Piece)> = pos.occupied().collect();
    for (sq, piece) in squares {
        let row = piece.color.home_row();
        let unmoved = match piece.kind {
            PieceKind::Pawn => sq.row() == piece.color.pawn_row(),
            PieceKind::King => {
                sq == Square::new(row, 4)
                    && CastleSide::ALL
                        .iter()
                        .any(|&side| rights.has(piece.color, side))
            }
            PieceKind::Rook => CastleSide::ALL.iter().any(|&side| {
                sq == Square::new(row, side.rook_col()) && rights.has(piece.color, side)
            }),
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
        };
        if let Some(p) = pos.piece_mut(sq) {
            p.moved = !unmoved;
        }
    }
}

/// Map a FEN en passant target to the square of the pawn that just double-stepped.
fn en_passant_pawn(pos: &Position, target: &str, side: Color) -> Option<Square> {
    let target = Square::from_algebraic(target)?;
    let pawn_sq = target.offset(-side.forward(), 0)?;
    let pawn = pos.piece_at(pawn_sq)?;
    let double_step_row = (pawn.color.pawn_row() as i8 + 2 * pawn.color.forward()) as u8;
    let ok = pawn.kind == PieceKind::Pawn
        && pawn.color == side.flip()
        && pawn_sq.row() == double_step_row
        && pos.is_empty(target);
    ok.then_some(pawn_sq)
}
