//! Side colors and their board orientation.

use std::fmt;
use std::ops::Not;

/// A side: White or Black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Total number of colors.
    pub const COUNT: usize = 2;

    /// All colors in index order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Return the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite color.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn push.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row holding this side's king and rooks at the start.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row this side's pawns start on; double pushes are only made from here.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Row on which this side's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// `+1` for White, `-1` for Black. Converts White-relative scores.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "w"),
            Color::Black => write!(f, "b"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn flip_roundtrip() {
        assert_eq!(Color::White.flip(), Color::Black);
        assert_eq!(!Color::Black, Color::White);
        assert_eq!(Color::White.flip().flip(), Color::White);
    }

    #[test]
    fn rows_are_mirrored() {
        for color in Color::ALL {
            assert_eq!(color.home_row(), 7 - color.flip().home_row());
            assert_eq!(color.pawn_row(), 7 - color.flip().pawn_row());
            assert_eq!(color.promotion_row(), color.flip().home_row());
        }
    }

    #[test]
    fn pawn_row_is_one_step_from_home() {
        for color in Color::ALL {
            let next = color.home_row() as i8 + color.forward();
            assert_eq!(next as u8, color.pawn_row());
        }
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "w");
        assert_eq!(format!("{}", Color::Black), "b");
    }
}
