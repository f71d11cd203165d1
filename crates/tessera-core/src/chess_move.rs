//! Move representation, bit-packed into a u16.

use std::fmt;
use std::str::FromStr;

use crate::piece_kind::PieceKind;
use crate::square::Square;

const SRC_MASK: u16 = 0x003F;
const DST_MASK: u16 = 0x0FC0;
const PROMO_MASK: u16 = 0x7000;
const DST_SHIFT: u32 = 6;
const PROMO_SHIFT: u32 = 12;

/// A move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  source square      (0-63)
/// bits  6-11: destination square (0-63)
/// bits 12-14: promotion kind + 1 (0 = no promotion)
/// ```
///
/// Castling is a king move of two files and en passant is a diagonal pawn
/// move onto an empty square; both are recognised from the board, not from
/// extra bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel (a1a1). Never a legal move.
    pub const NULL: Move = Move(0);

    /// Create a move without promotion.
    #[inline]
    pub const fn new(source: Square, dest: Square) -> Move {
        Move((source.index() as u16) | ((dest.index() as u16) << DST_SHIFT))
    }

    /// Create a move that promotes to `kind`.
    #[inline]
    pub const fn new_promotion(source: Square, dest: Square, kind: PieceKind) -> Move {
        let base = Move::new(source, dest).0;
        Move(base | (((kind as u16) + 1) << PROMO_SHIFT))
    }

    /// Extract the source square.
    #[inline]
    pub const fn source(self) -> Square {
        Square::new(((self.0 & SRC_MASK) / 8) as u8, ((self.0 & SRC_MASK) % 8) as u8)
    }

    /// Extract the destination square.
    #[inline]
    pub const fn dest(self) -> Square {
        let idx = (self.0 & DST_MASK) >> DST_SHIFT;
        Square::new((idx / 8) as u8, (idx % 8) as u8)
    }

    /// The promotion kind, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        let bits = ((self.0 & PROMO_MASK) >> PROMO_SHIFT) as usize;
        if bits == 0 {
            None
        } else {
            PieceKind::from_index(bits - 1)
        }
    }

    /// Return `true` if this move carries a promotion kind.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMO_MASK != 0
    }

    /// Return `true` if this is the null move sentinel.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Signed column distance travelled.
    #[inline]
    pub const fn col_delta(self) -> i8 {
        self.dest().col() as i8 - self.source().col() as i8
    }

    /// Signed row distance travelled.
    #[inline]
    pub const fn row_delta(self) -> i8 {
        self.dest().row() as i8 - self.source().row() as i8
    }

    /// Coordinate notation, e.g. `e2e4` or `a7a8q`.
    pub fn to_coord(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.source(), self.dest(), kind.fen_char()),
            None => format!("{}{}", self.source(), self.dest()),
        }
    }
}

impl FromStr for Move {
    type Err = String;

    /// Parse coordinate notation. A trailing promotion letter is optional.
    fn from_str(s: &str) -> Result<Move, String> {
        let bad = || format!("invalid move: \"{s}\"");
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let source = Square::from_algebraic(&s[0..2]).ok_or_else(bad)?;
        let dest = Square::from_algebraic(&s[2..4]).ok_or_else(bad)?;
        match s[4..].chars().next() {
            None => Ok(Move::new(source, dest)),
            Some(c) => match PieceKind::from_fen_char(c) {
                Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                    Ok(Move::new_promotion(source, dest, kind))
                }
                _ => Err(bad()),
            },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_coord())
    }
}
