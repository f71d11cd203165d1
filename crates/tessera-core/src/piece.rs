//! A piece on the board: identity plus the two per-piece state flags.

use std::fmt;

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// A concrete piece standing on a square.
///
/// `kind` and `color` never change while the piece is on the board (a
/// promoting pawn is replaced by a new piece). `moved` records whether this
/// exact piece has ever moved. `en_passant` is set only on the single pawn
/// that double-stepped on the previous ply.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub moved: bool,
    pub en_passant: bool,
}

impl Piece {
    /// Number of distinct (kind, color) pairs.
    pub const COUNT: usize = 12;

    /// A piece that has not moved yet.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece {
            kind,
            color,
            moved: false,
            en_passant: false,
        }
    }

    /// Builder-style setter for the `moved` flag.
    #[inline]
    pub const fn with_moved(mut self, moved: bool) -> Piece {
        self.moved = moved;
        self
    }

    /// Index 0-11: White P,N,B,R,Q,K then Black P,N,B,R,Q,K.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Parse a FEN character. Uppercase is White, lowercase is Black.
    #[inline]
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }

    /// FEN character: uppercase for White, lowercase for Black.
    #[inline]
    pub const fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({}", self.fen_char())?;
        if self.moved {
            write!(f, ", moved")?;
        }
        if self.en_passant {
            write!(f, ", en_passant")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::Piece;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; Piece::COUNT];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let idx = Piece::new(kind, color).index();
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn fen_chars() {
        let p = Piece::from_fen_char('N').unwrap();
        assert_eq!(p.kind, PieceKind::Knight);
        assert_eq!(p.color, Color::White);
        assert_eq!(p.fen_char(), 'N');
        assert_eq!(Piece::from_fen_char('q').unwrap().color, Color::Black);
        assert!(Piece::from_fen_char('1').is_none());
    }

    #[test]
    fn fresh_piece_has_clear_flags() {
        let p = Piece::new(PieceKind::Pawn, Color::Black);
        assert!(!p.moved);
        assert!(!p.en_passant);
        assert!(p.with_moved(true).moved);
    }

    #[test]
    fn debug_shows_flags() {
        let mut p = Piece::new(PieceKind::Pawn, Color::White).with_moved(true);
        p.en_passant = true;
        assert_eq!(format!("{p:?}"), "Piece(P, moved, en_passant)");
    }
}
