//! Board squares addressed by (row, column).

use std::fmt;
use std::str::FromStr;

/// A square on the board, stored as `row * 8 + col`.
///
/// Row 0 is White's back rank (rank 1) and column 0 is file a, so `a1 = 0`,
/// `h1 = 7`, `a8 = 56`, `h8 = 63`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Total number of squares.
    pub const COUNT: usize = 64;

    /// Create a square from row and column.
    ///
    /// # Panics
    ///
    /// Debug-asserts that both are below 8.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Square {
        debug_assert!(row < 8 && col < 8);
        Square(row * 8 + col)
    }

    /// Create a square from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    /// Parse an algebraic notation string (e.g. "e4") into a square.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }

        let file_byte = bytes[0];
        let rank_byte = bytes[1];

        if !(b'a'..=b'h').contains(&file_byte) || !(b'1'..=b'8').contains(&rank_byte) {
            return None;
        }

        Some(Square::new(rank_byte - b'1', file_byte - b'a'))
    }

    /// Return the zero-based index (0..63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row (0 = rank 1).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Column (0 = file a).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// The square `dr` rows and `dc` columns away, or `None` off the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if row < 0 || row > 7 || col < 0 || col > 7 {
            None
        } else {
            Some(Square::new(row as u8, col as u8))
        }
    }

    /// The same square seen from the other side (row mirrored).
    #[inline]
    pub const fn flip_vertical(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Iterate over all 64 squares in index order (a1, b1, ..., h8).
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Square, String> {
        Square::from_algebraic(s).ok_or_else(|| format!("invalid square: \"{s}\""))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}
