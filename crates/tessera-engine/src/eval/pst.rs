//! Piece-square tables for all six piece kinds.
//!
//! Tables are written from White's point of view with row 0 (rank 1)
//! first, so index = `row * 8 + col`. Black looks up the vertically
//! mirrored square. Every row is left-right symmetric.

use tessera_core::{Color, PieceKind, Square};

#[rustfmt::skip]
const PAWN: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10, -20, -20,  10,  10,   5,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,   5,  10,  25,  25,  10,   5,   5,
     10,  10,  20,  30,  30,  20,  10,  10,
     50,  50,  50,  50,  50,  50,  50,  50,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
      0,   0,   0,   5,   5,   0,   0,   0,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      5,  10,  10,  10,  10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   5,   0,   0,   5,   0, -10,
    -10,   5,   5,   5,   5,   5,   5, -10,
      0,   0,   5,   5,   5,   5,   0,   0,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

/// Rewards a castled king and penalizes an exposed one.
#[rustfmt::skip]
const KING: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

const TABLES: [&[i32; 64]; PieceKind::COUNT] = [&PAWN, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING];

/// Positional bonus for a piece of `color` and `kind` on `sq`.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> i32 {
    let sq = match color {
        Color::White => sq,
        Color::Black => sq.flip_vertical(),
    };
    TABLES[kind.index()][sq.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_left_right_symmetric() {
        for table in TABLES {
            for row in 0..8 {
                for col in 0..4 {
                    assert_eq!(table[row * 8 + col], table[row * 8 + 7 - col]);
                }
            }
        }
    }

    #[test]
    fn black_mirrors_white() {
        for kind in PieceKind::ALL {
            for sq in Square::all() {
                assert_eq!(
                    pst_value(kind, Color::White, sq),
                    pst_value(kind, Color::Black, sq.flip_vertical())
                );
            }
        }
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let d4: Square = "d4".parse().unwrap();
        let a4: Square = "a4".parse().unwrap();
        assert!(pst_value(PieceKind::Knight, Color::White, d4) > pst_value(PieceKind::Knight, Color::White, a4));
    }
}
